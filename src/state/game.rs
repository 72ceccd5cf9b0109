use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of entries returned by a leaderboard read.
pub const LEADERBOARD_SIZE: usize = 10;

/// Base points awarded for any correct answer.
const BASE_POINTS: f64 = 1000.0;
/// Extra points available on top of the base for an instant answer.
const SPEED_POINTS: f64 = 500.0;

/// Stage of the session state machine.
///
/// Every engine operation asserts its legal source statuses explicitly, so
/// the five stages form a closed progression:
/// `Waiting → Active → ShowingQuestion ⇄ ShowingResults → Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Session created; players may join.
    Waiting,
    /// Game started, no question shown yet.
    Active,
    /// A question is live and accepting answers.
    ShowingQuestion,
    /// Per-question results are on screen.
    ShowingResults,
    /// Game over; only leaderboard reads are legal.
    Ended,
}

impl GameStatus {
    /// Whether players may still join the session.
    pub fn accepts_joins(self) -> bool {
        matches!(self, GameStatus::Waiting)
    }

    /// Whether answer submissions are legal right now.
    pub fn accepts_answers(self) -> bool {
        matches!(self, GameStatus::ShowingQuestion)
    }

    /// Whether the host may advance to the next question.
    pub fn can_advance_question(self) -> bool {
        matches!(
            self,
            GameStatus::Active | GameStatus::ShowingQuestion | GameStatus::ShowingResults
        )
    }

    /// Whether the session reached its terminal stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Ended)
    }
}

/// One quiz question as served by the quiz catalog, immutable per game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier of the question.
    pub id: Uuid,
    /// Prompt shown to every participant.
    pub text: String,
    /// Ordered answer options (2 to 4 entries).
    pub options: Vec<String>,
    /// Index into `options` marking the correct answer. Never sent to players.
    pub correct_option_index: usize,
    /// Seconds players have to answer.
    pub time_limit: u32,
    /// Position of the question within its quiz.
    pub order: u32,
}

impl Question {
    /// Judge a submitted option, returning correctness and awarded points.
    ///
    /// A correct answer earns `round(1000 + bonus * 500)` points where the
    /// bonus falls linearly from 1 at zero response time to 0 at the time
    /// limit, so correct scores always land in `[1000, 1500]`. Incorrect or
    /// out-of-range options earn nothing.
    pub fn judge(&self, option_index: usize, response_time_ms: u64) -> (bool, u32) {
        if option_index != self.correct_option_index {
            return (false, 0);
        }

        let limit_ms = u64::from(self.time_limit) * 1000;
        let time_bonus = if limit_ms == 0 {
            0.0
        } else {
            (1.0 - response_time_ms as f64 / limit_ms as f64).max(0.0)
        };

        (true, (BASE_POINTS + time_bonus * SPEED_POINTS).round() as u32)
    }
}

/// Player info tracked during a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Caller-supplied identifier of the player.
    pub id: String,
    /// Display name chosen by the player.
    pub nickname: String,
    /// Cumulative score; only ever grows, via the scoring rule.
    pub score: u32,
}

/// One recorded answer for the current question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Player who answered.
    pub player_id: String,
    /// Option the player picked.
    pub option_index: usize,
    /// Milliseconds between question start and this submission.
    pub response_time_ms: u64,
}

/// Aggregated state of one live session, keyed by its join code.
///
/// One instance exists per active join code; it is owned by the session
/// store and mutated exclusively through engine operations running under
/// the per-join-code lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Opaque identifier correlating to the session ledger record.
    pub session_id: Uuid,
    /// Quiz whose questions drive this session. Immutable after creation.
    pub quiz_id: String,
    /// Host that created the session. Immutable after creation.
    pub host_id: String,
    /// Current stage of the state machine.
    pub status: GameStatus,
    /// Index of the live question; starts at -1 and only ever grows.
    pub current_question_index: i32,
    /// Roster keyed by player id, in join order.
    pub players: IndexMap<String, Player>,
    /// Answers for the current question keyed by player id, in arrival order.
    /// Cleared whenever a new question starts.
    pub answers: IndexMap<String, Answer>,
    /// Unix milliseconds when the current question went live.
    pub question_start_time: Option<u64>,
    /// Unix milliseconds when the game left the waiting stage.
    pub start_time: Option<u64>,
}

impl GameState {
    /// Build the initial waiting-state session for a fresh join code.
    pub fn new(quiz_id: String, host_id: String) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            quiz_id,
            host_id,
            status: GameStatus::Waiting,
            current_question_index: -1,
            players: IndexMap::new(),
            answers: IndexMap::new(),
            question_start_time: None,
            start_time: None,
        }
    }

    /// Players ranked by score descending, truncated to the top 10.
    ///
    /// Ties keep roster insertion order (the sort is stable).
    pub fn leaderboard(&self) -> Vec<Player> {
        let mut ranking: Vec<Player> = self.players.values().cloned().collect();
        ranking.sort_by(|a, b| b.score.cmp(&a.score));
        ranking.truncate(LEADERBOARD_SIZE);
        ranking
    }

    /// Count recorded answers per option plus how many hit the correct one.
    ///
    /// The distribution is sized to the actual option count; answers whose
    /// option index falls outside it are not counted in any bucket.
    pub fn answer_distribution(
        &self,
        option_count: usize,
        correct_option_index: usize,
    ) -> (Vec<usize>, usize) {
        let mut distribution = vec![0usize; option_count];
        let mut correct_count = 0;

        for answer in self.answers.values() {
            if let Some(bucket) = distribution.get_mut(answer.option_index) {
                *bucket += 1;
            }
            if answer.option_index == correct_option_index {
                correct_count += 1;
            }
        }

        (distribution, correct_count)
    }
}

/// Current wall-clock time in Unix milliseconds.
pub fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
