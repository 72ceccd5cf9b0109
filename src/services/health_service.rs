use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health payload, pinging the session store.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.session_store().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "session store health check failed");
            HealthResponse::degraded()
        }
    }
}
