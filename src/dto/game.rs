use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::game::{GameState, GameStatus, Player};

/// Public projection of a player exposed in replies and broadcasts.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Caller-supplied player identifier.
    pub id: String,
    /// Display name chosen by the player.
    pub nickname: String,
    /// Cumulative score.
    pub score: u32,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            nickname: player.nickname.clone(),
            score: player.score,
        }
    }
}

/// Public projection of a session returned to a joining player.
///
/// Carries no answer records and no question content, so nothing in it can
/// leak a correct option.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// Opaque session identifier.
    pub session_id: Uuid,
    /// Quiz the session is playing.
    pub quiz_id: String,
    /// Host that created the session.
    pub host_id: String,
    /// Current stage of the session state machine.
    pub status: GameStatus,
    /// Index of the live question, -1 before the first one.
    pub current_question_index: i32,
    /// Roster in join order.
    pub players: Vec<PlayerView>,
    /// Unix milliseconds when the game started, if it did.
    pub start_time: Option<u64>,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        Self {
            session_id: state.session_id,
            quiz_id: state.quiz_id.clone(),
            host_id: state.host_id.clone(),
            status: state.status,
            current_question_index: state.current_question_index,
            players: state.players.values().map(PlayerView::from).collect(),
            start_time: state.start_time,
        }
    }
}
