//! Validation helpers for client-supplied fields.

use validator::ValidationError;

/// Longest nickname accepted on a roster.
const NICKNAME_MAX_LENGTH: usize = 24;

/// Validates that a join code is exactly 6 ASCII digits.
pub fn validate_join_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("join_code_format");
        err.message = Some("Join code must be exactly 6 digits".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a nickname is non-blank and at most 24 characters.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim().is_empty() {
        let mut err = ValidationError::new("nickname_blank");
        err.message = Some("Nickname must not be blank".into());
        return Err(err);
    }

    if nickname.chars().count() > NICKNAME_MAX_LENGTH {
        let mut err = ValidationError::new("nickname_length");
        err.message = Some(
            format!(
                "Nickname must be at most {} characters (got {})",
                NICKNAME_MAX_LENGTH,
                nickname.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}
