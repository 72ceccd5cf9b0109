use rand::Rng;

use crate::{
    dao::storage::StorageError,
    dto::validation::validate_nickname,
    error::ServiceError,
    state::{
        SharedState,
        game::{self, Answer, GameState, GameStatus, Player, Question},
    },
};

/// Namespace prefix for session store keys.
const SESSION_KEY_PREFIX: &str = "session:";
/// Attempts at reserving a fresh join code before giving up.
const MAX_JOIN_CODE_ATTEMPTS: usize = 32;

/// Outcome returned to the player who submitted an answer.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOutcome {
    /// Whether the picked option was the correct one.
    pub correct: bool,
    /// Points this answer earned.
    pub points: u32,
}

/// What advancing the game landed on.
#[derive(Debug)]
pub struct QuestionAdvance {
    /// Session state after the advance.
    pub state: GameState,
    /// The question that went live, or `None` when the quiz is exhausted
    /// and the game ended instead.
    pub question: Option<Question>,
    /// Total number of questions in the quiz.
    pub total_questions: usize,
}

/// Aggregates revealed when a question's results are shown.
#[derive(Debug)]
pub struct RoundResults {
    /// Session state after the reveal.
    pub state: GameState,
    /// Index of the correct option.
    pub correct_option_index: usize,
    /// Answers counted per option, sized to the question's option count.
    pub answer_distribution: Vec<usize>,
    /// How many answers hit the correct option.
    pub correct_count: usize,
}

/// Create a fresh waiting session for `quiz_id` and return its join code.
///
/// The code is reserved through an atomic insert against the store, so two
/// concurrent creates can never end up sharing one; on a collision with a
/// live session a new code is generated.
pub async fn create_session(
    state: &SharedState,
    quiz_id: &str,
    host_id: &str,
) -> Result<String, ServiceError> {
    let game = GameState::new(quiz_id.to_owned(), host_id.to_owned());
    let payload = serde_json::to_string(&game)?;

    let mut reserved = None;
    for _ in 0..MAX_JOIN_CODE_ATTEMPTS {
        let candidate = generate_join_code();
        if state
            .session_store()
            .put_if_absent(&session_key(&candidate), payload.clone())
            .await?
        {
            reserved = Some(candidate);
            break;
        }
    }

    let Some(join_code) = reserved else {
        return Err(ServiceError::Unavailable(StorageError::unavailable(
            "join code space exhausted".into(),
            std::io::Error::other("every generated code was already taken"),
        )));
    };

    state
        .session_ledger()
        .record_created(&join_code, quiz_id, host_id)
        .await?;

    Ok(join_code)
}

/// Add a player to a waiting session and return the resulting state.
///
/// Re-joining with an already known player id resets that player's score to
/// zero; it does not merge. Joining is only legal before the game starts.
pub async fn join_session(
    state: &SharedState,
    join_code: &str,
    nickname: &str,
    player_id: &str,
) -> Result<GameState, ServiceError> {
    if let Err(err) = validate_nickname(nickname) {
        let reason = err
            .message
            .as_ref()
            .map(|message| message.to_string())
            .unwrap_or_else(|| err.code.to_string());
        return Err(ServiceError::InvalidInput(reason));
    }

    let _guard = state.lock_session(join_code).await;
    let mut game = require_session(state, join_code).await?;

    if !game.status.accepts_joins() {
        return Err(ServiceError::InvalidPhase("Game already started".into()));
    }

    game.players.insert(
        player_id.to_owned(),
        Player {
            id: player_id.to_owned(),
            nickname: nickname.to_owned(),
            score: 0,
        },
    );
    persist_session(state, join_code, &game).await?;

    Ok(game)
}

/// Pure read of a session's state; `None` when the code is unknown.
pub async fn get_session(
    state: &SharedState,
    join_code: &str,
) -> Result<Option<GameState>, ServiceError> {
    load_session(state, join_code).await
}

/// Move a waiting session into the active stage.
///
/// Returns `None` when no session exists for the code; the caller decides
/// whether that absence is an error.
pub async fn start_game(
    state: &SharedState,
    join_code: &str,
) -> Result<Option<GameState>, ServiceError> {
    let _guard = state.lock_session(join_code).await;
    let Some(mut game) = load_session(state, join_code).await? else {
        return Ok(None);
    };

    if game.status != GameStatus::Waiting {
        return Err(ServiceError::InvalidPhase("Game already started".into()));
    }

    game.status = GameStatus::Active;
    game.start_time = Some(game::unix_time_ms());
    game.current_question_index = -1;
    persist_session(state, join_code, &game).await?;
    state.session_ledger().record_started(join_code).await?;

    Ok(Some(game))
}

/// Advance to the next question, or end the game when the quiz is exhausted.
///
/// Clears the previous question's answers, stamps the question start time,
/// and mirrors the terminal transition to the ledger when it happens.
pub async fn next_question(
    state: &SharedState,
    join_code: &str,
) -> Result<QuestionAdvance, ServiceError> {
    let _guard = state.lock_session(join_code).await;
    let mut game = require_session(state, join_code).await?;

    if !game.status.can_advance_question() {
        let message = if game.status.is_terminal() {
            "Game already ended"
        } else {
            "Game has not started"
        };
        return Err(ServiceError::InvalidPhase(message.into()));
    }

    let questions = state
        .quiz_catalog()
        .ordered_questions(&game.quiz_id)
        .await?;
    let total_questions = questions.len();

    game.current_question_index += 1;
    game.answers.clear();

    let question = usize::try_from(game.current_question_index)
        .ok()
        .and_then(|index| questions.get(index).cloned());

    match &question {
        Some(_) => {
            game.status = GameStatus::ShowingQuestion;
            game.question_start_time = Some(game::unix_time_ms());
        }
        None => {
            game.status = GameStatus::Ended;
            game.question_start_time = None;
        }
    }

    persist_session(state, join_code, &game).await?;
    if game.status.is_terminal() {
        state.session_ledger().record_ended(join_code).await?;
    }

    Ok(QuestionAdvance {
        state: game,
        question,
        total_questions,
    })
}

/// Record a player's answer for the live question and score it.
///
/// At most one answer per player per question is kept. An answer from a
/// player who is no longer on the roster stays on record for distribution
/// stats but credits no score.
pub async fn submit_answer(
    state: &SharedState,
    join_code: &str,
    player_id: &str,
    option_index: usize,
) -> Result<AnswerOutcome, ServiceError> {
    let _guard = state.lock_session(join_code).await;
    let mut game = require_session(state, join_code).await?;

    if !game.status.accepts_answers() {
        return Err(ServiceError::InvalidPhase("Not accepting answers".into()));
    }
    if game.answers.contains_key(player_id) {
        return Err(ServiceError::DuplicateAnswer);
    }

    let questions = state
        .quiz_catalog()
        .ordered_questions(&game.quiz_id)
        .await?;
    let question = usize::try_from(game.current_question_index)
        .ok()
        .and_then(|index| questions.get(index))
        .ok_or(ServiceError::NoCurrentQuestion)?;
    let started = game
        .question_start_time
        .ok_or(ServiceError::NoCurrentQuestion)?;

    let response_time_ms = game::unix_time_ms().saturating_sub(started);
    let (correct, points) = question.judge(option_index, response_time_ms);

    game.answers.insert(
        player_id.to_owned(),
        Answer {
            player_id: player_id.to_owned(),
            option_index,
            response_time_ms,
        },
    );
    if let Some(player) = game.players.get_mut(player_id) {
        player.score += points;
    }

    persist_session(state, join_code, &game).await?;

    Ok(AnswerOutcome { correct, points })
}

/// Close the answer window and aggregate the current question's answers.
///
/// Accepted late and accepted twice: a repeat call re-derives the same
/// aggregates without touching any score. Answers arriving after the
/// persist are rejected by the phase check in [`submit_answer`].
pub async fn show_results(
    state: &SharedState,
    join_code: &str,
) -> Result<RoundResults, ServiceError> {
    let _guard = state.lock_session(join_code).await;
    let mut game = require_session(state, join_code).await?;

    let questions = state
        .quiz_catalog()
        .ordered_questions(&game.quiz_id)
        .await?;
    let question = usize::try_from(game.current_question_index)
        .ok()
        .and_then(|index| questions.get(index))
        .ok_or(ServiceError::NoCurrentQuestion)?;
    let correct_option_index = question.correct_option_index;
    let option_count = question.options.len();

    game.status = GameStatus::ShowingResults;
    persist_session(state, join_code, &game).await?;

    let (answer_distribution, correct_count) =
        game.answer_distribution(option_count, correct_option_index);

    Ok(RoundResults {
        state: game,
        correct_option_index,
        answer_distribution,
        correct_count,
    })
}

/// Players ranked by score descending, truncated to the top 10.
///
/// An unknown join code yields an empty ranking rather than an error so
/// late reads after eviction stay harmless.
pub async fn get_leaderboard(
    state: &SharedState,
    join_code: &str,
) -> Result<Vec<Player>, ServiceError> {
    Ok(load_session(state, join_code)
        .await?
        .map(|game| game.leaderboard())
        .unwrap_or_default())
}

/// Force a session into its terminal stage, e.g. when the host bails out.
///
/// No-op when the code is unknown.
pub async fn end_game(state: &SharedState, join_code: &str) -> Result<(), ServiceError> {
    let _guard = state.lock_session(join_code).await;
    let Some(mut game) = load_session(state, join_code).await? else {
        return Ok(());
    };

    game.status = GameStatus::Ended;
    game.question_start_time = None;
    persist_session(state, join_code, &game).await?;
    state.session_ledger().record_ended(join_code).await?;

    Ok(())
}

fn session_key(join_code: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{join_code}")
}

fn generate_join_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000u32..=999_999).to_string()
}

async fn load_session(
    state: &SharedState,
    join_code: &str,
) -> Result<Option<GameState>, ServiceError> {
    let payload = state.session_store().get(&session_key(join_code)).await?;
    payload
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

async fn require_session(state: &SharedState, join_code: &str) -> Result<GameState, ServiceError> {
    load_session(state, join_code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(join_code.to_owned()))
}

async fn persist_session(
    state: &SharedState,
    join_code: &str,
    game: &GameState,
) -> Result<(), ServiceError> {
    let payload = serde_json::to_string(game)?;
    state
        .session_store()
        .put(&session_key(join_code), payload)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::{
            quiz_catalog::MemoryQuizCatalog,
            session_ledger::{LedgerStatus, MemorySessionLedger},
            session_store::memory::MemorySessionStore,
        },
        state::AppState,
    };

    fn question(text: &str, correct: usize, order: u32) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: text.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option_index: correct,
            time_limit: 20,
            order,
        }
    }

    fn test_state() -> (SharedState, Arc<MemorySessionLedger>) {
        let catalog = MemoryQuizCatalog::new();
        catalog.insert_quiz(
            "capitals",
            vec![question("capital of France?", 1, 1), question("capital of Japan?", 0, 2)],
        );

        let ledger = Arc::new(MemorySessionLedger::new());
        let state = AppState::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(catalog),
            ledger.clone(),
        );
        (state, ledger)
    }

    async fn started_session(state: &SharedState) -> String {
        let join_code = create_session(state, "capitals", "host-1").await.unwrap();
        join_session(state, &join_code, "Alice", "p1").await.unwrap();
        join_session(state, &join_code, "Bob", "p2").await.unwrap();
        start_game(state, &join_code).await.unwrap();
        join_code
    }

    #[tokio::test]
    async fn create_session_initializes_waiting_state() {
        let (state, ledger) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        assert_eq!(join_code.len(), 6);
        assert!(join_code.chars().all(|c| c.is_ascii_digit()));

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.current_question_index, -1);
        assert!(game.players.is_empty());
        assert!(game.answers.is_empty());
        assert!(game.start_time.is_none());

        let record = ledger.find(&join_code).unwrap();
        assert_eq!(record.status, LedgerStatus::Waiting);
        assert_eq!(record.quiz_id, "capitals");
    }

    #[tokio::test]
    async fn join_unknown_code_fails_not_found() {
        let (state, _) = test_state();
        let err = join_session(&state, "000000", "Alice", "p1").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn join_after_start_fails_invalid_phase() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();
        start_game(&state, &join_code).await.unwrap();

        let err = join_session(&state, &join_code, "Late", "p9").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPhase(_)));
    }

    #[tokio::test]
    async fn sequential_joins_are_both_kept() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        join_session(&state, &join_code, "Alice", "p1").await.unwrap();
        let game = join_session(&state, &join_code, "Bob", "p2").await.unwrap();

        assert_eq!(game.players.len(), 2);
        assert!(game.players.values().all(|player| player.score == 0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_joins_lose_no_player() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let state = state.clone();
            let join_code = join_code.clone();
            handles.push(tokio::spawn(async move {
                join_session(&state, &join_code, &format!("Player {i}"), &format!("p{i}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.players.len(), 10);
    }

    #[tokio::test]
    async fn rejoining_resets_the_score() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        join_session(&state, &join_code, "Alice", "p1").await.unwrap();
        {
            // Pretend an earlier round already awarded points.
            let mut game = load_session(&state, &join_code).await.unwrap().unwrap();
            game.players.get_mut("p1").unwrap().score = 700;
            persist_session(&state, &join_code, &game).await.unwrap();
        }

        let game = join_session(&state, &join_code, "Alice again", "p1").await.unwrap();
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.players["p1"].score, 0);
        assert_eq!(game.players["p1"].nickname, "Alice again");
    }

    #[tokio::test]
    async fn blank_nickname_is_rejected() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();
        let err = join_session(&state, &join_code, "   ", "p1").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn start_game_on_unknown_code_returns_none() {
        let (state, _) = test_state();
        assert!(start_game(&state, "000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn start_game_twice_fails_invalid_phase() {
        let (state, ledger) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        let game = start_game(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.status, GameStatus::Active);
        assert!(game.start_time.is_some());
        assert_eq!(ledger.find(&join_code).unwrap().status, LedgerStatus::Active);

        let err = start_game(&state, &join_code).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPhase(_)));
    }

    #[tokio::test]
    async fn next_question_walks_the_quiz_then_ends() {
        let (state, ledger) = test_state();
        let join_code = started_session(&state).await;

        for expected_index in 0..2 {
            let advance = next_question(&state, &join_code).await.unwrap();
            assert_eq!(advance.state.status, GameStatus::ShowingQuestion);
            assert_eq!(advance.state.current_question_index, expected_index);
            assert_eq!(advance.total_questions, 2);
            assert!(advance.question.is_some());
            assert!(advance.state.question_start_time.is_some());
        }

        let advance = next_question(&state, &join_code).await.unwrap();
        assert!(advance.question.is_none());
        assert_eq!(advance.state.status, GameStatus::Ended);
        assert_eq!(ledger.find(&join_code).unwrap().status, LedgerStatus::Ended);

        let err = next_question(&state, &join_code).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPhase(_)));
    }

    #[tokio::test]
    async fn next_question_before_start_is_rejected() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();
        let err = next_question(&state, &join_code).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPhase(_)));
    }

    #[tokio::test]
    async fn next_question_on_empty_quiz_ends_immediately() {
        let (state, ledger) = test_state();
        let join_code = create_session(&state, "unknown-quiz", "host-1").await.unwrap();
        start_game(&state, &join_code).await.unwrap();

        let advance = next_question(&state, &join_code).await.unwrap();
        assert!(advance.question.is_none());
        assert_eq!(advance.total_questions, 0);
        assert_eq!(advance.state.status, GameStatus::Ended);
        assert_eq!(ledger.find(&join_code).unwrap().status, LedgerStatus::Ended);
    }

    #[tokio::test]
    async fn instant_correct_answer_scores_with_speed_bonus() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;
        next_question(&state, &join_code).await.unwrap();

        let outcome = submit_answer(&state, &join_code, "p1", 1).await.unwrap();
        assert!(outcome.correct);
        assert!((1400..=1500).contains(&outcome.points));

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.players["p1"].score, outcome.points);
    }

    #[tokio::test]
    async fn incorrect_answer_scores_zero() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;
        next_question(&state, &join_code).await.unwrap();

        let outcome = submit_answer(&state, &join_code, "p2", 3).await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.points, 0);

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.players["p2"].score, 0);
        assert_eq!(game.answers.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_answer_is_rejected() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;
        next_question(&state, &join_code).await.unwrap();

        let first = submit_answer(&state, &join_code, "p1", 1).await.unwrap();
        let err = submit_answer(&state, &join_code, "p1", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateAnswer));

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.players["p1"].score, first.points);
        assert_eq!(game.answers.len(), 1);
    }

    #[tokio::test]
    async fn answer_outside_question_phase_is_rejected() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;

        let err = submit_answer(&state, &join_code, "p1", 0).await.unwrap_err();
        match err {
            ServiceError::InvalidPhase(message) => assert_eq!(message, "Not accepting answers"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn answer_from_unknown_player_is_recorded_without_credit() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;
        next_question(&state, &join_code).await.unwrap();

        let outcome = submit_answer(&state, &join_code, "ghost", 1).await.unwrap();
        assert!(outcome.correct);

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert!(game.answers.contains_key("ghost"));
        assert!(!game.players.contains_key("ghost"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_answers_lose_no_submission() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();
        for i in 0..8 {
            join_session(&state, &join_code, &format!("Player {i}"), &format!("p{i}"))
                .await
                .unwrap();
        }
        start_game(&state, &join_code).await.unwrap();
        next_question(&state, &join_code).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let state = state.clone();
            let join_code = join_code.clone();
            handles.push(tokio::spawn(async move {
                submit_answer(&state, &join_code, &format!("p{i}"), i % 4).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.answers.len(), 8);
    }

    #[tokio::test]
    async fn show_results_aggregates_distribution() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();
        for (player_id, nickname) in [("p1", "Alice"), ("p2", "Bob"), ("p3", "Carol")] {
            join_session(&state, &join_code, nickname, player_id).await.unwrap();
        }
        start_game(&state, &join_code).await.unwrap();
        next_question(&state, &join_code).await.unwrap();

        submit_answer(&state, &join_code, "p1", 0).await.unwrap();
        submit_answer(&state, &join_code, "p2", 1).await.unwrap();
        submit_answer(&state, &join_code, "p3", 1).await.unwrap();

        let results = show_results(&state, &join_code).await.unwrap();
        assert_eq!(results.state.status, GameStatus::ShowingResults);
        assert_eq!(results.correct_option_index, 1);
        assert_eq!(results.answer_distribution, vec![1, 2, 0, 0]);
        assert_eq!(results.correct_count, 2);

        // Repeating the reveal re-derives the same aggregates.
        let again = show_results(&state, &join_code).await.unwrap();
        assert_eq!(again.answer_distribution, vec![1, 2, 0, 0]);
        assert_eq!(again.correct_count, 2);
    }

    #[tokio::test]
    async fn show_results_without_question_fails() {
        let (state, _) = test_state();
        let join_code = create_session(&state, "capitals", "host-1").await.unwrap();

        let err = show_results(&state, &join_code).await.unwrap_err();
        assert!(matches!(err, ServiceError::NoCurrentQuestion));
    }

    #[tokio::test]
    async fn leaderboard_for_unknown_code_is_empty() {
        let (state, _) = test_state();
        assert!(get_leaderboard(&state, "000000").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn end_game_forces_terminal_state() {
        let (state, ledger) = test_state();
        let join_code = started_session(&state).await;
        next_question(&state, &join_code).await.unwrap();

        end_game(&state, &join_code).await.unwrap();

        let game = get_session(&state, &join_code).await.unwrap().unwrap();
        assert_eq!(game.status, GameStatus::Ended);
        assert_eq!(ledger.find(&join_code).unwrap().status, LedgerStatus::Ended);

        let err = submit_answer(&state, &join_code, "p1", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPhase(_)));

        // Unknown codes are a silent no-op.
        end_game(&state, "000000").await.unwrap();
    }

    #[tokio::test]
    async fn full_game_flow_ranks_players_by_score() {
        let (state, _) = test_state();
        let join_code = started_session(&state).await;

        // Question 0: Alice correct, Bob wrong.
        next_question(&state, &join_code).await.unwrap();
        submit_answer(&state, &join_code, "p1", 1).await.unwrap();
        submit_answer(&state, &join_code, "p2", 2).await.unwrap();
        let results = show_results(&state, &join_code).await.unwrap();
        assert_eq!(results.answer_distribution.iter().sum::<usize>(), 2);
        assert_eq!(results.correct_count, 1);

        // Question 1: both correct.
        next_question(&state, &join_code).await.unwrap();
        submit_answer(&state, &join_code, "p1", 0).await.unwrap();
        submit_answer(&state, &join_code, "p2", 0).await.unwrap();
        show_results(&state, &join_code).await.unwrap();

        let advance = next_question(&state, &join_code).await.unwrap();
        assert!(advance.question.is_none());
        assert_eq!(advance.state.status, GameStatus::Ended);

        let leaderboard = get_leaderboard(&state, &join_code).await.unwrap();
        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].id, "p1");
        assert!(leaderboard[0].score > leaderboard[1].score);
        assert!(leaderboard[1].score >= 1000);
    }
}
