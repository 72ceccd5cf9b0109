use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::game::PlayerView;

/// Commands accepted from WebSocket clients.
///
/// Host and player clients share one channel; the engine decides per command
/// whether it is legal in the session's current phase.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "cmd", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Host creates a fresh session for a quiz.
    CreateGame {
        /// Quiz whose questions the session will play.
        quiz_id: String,
        /// Identity of the creating host.
        host_id: String,
    },
    /// Player joins a waiting session.
    JoinGame {
        /// Code of the session to join.
        join_code: String,
        /// Display name for the roster.
        nickname: String,
        /// Caller-supplied player identifier.
        player_id: String,
    },
    /// Host starts the game.
    StartGame {
        /// Code of the session to start.
        join_code: String,
    },
    /// Host advances to the next question (or ends the game).
    NextQuestion {
        /// Code of the session to advance.
        join_code: String,
    },
    /// Player submits an answer for the live question.
    SubmitAnswer {
        /// Code of the session being played.
        join_code: String,
        /// Player submitting the answer.
        player_id: String,
        /// Picked option index.
        option_index: usize,
    },
    /// Host closes the answer window and reveals results.
    ShowResults {
        /// Code of the session to reveal results for.
        join_code: String,
    },
    /// Anyone requests the current leaderboard.
    GetLeaderboard {
        /// Code of the session to rank.
        join_code: String,
    },
}

impl ClientCommand {
    /// Wire name of the command, echoed in its acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            ClientCommand::CreateGame { .. } => "create_game",
            ClientCommand::JoinGame { .. } => "join_game",
            ClientCommand::StartGame { .. } => "start_game",
            ClientCommand::NextQuestion { .. } => "next_question",
            ClientCommand::SubmitAnswer { .. } => "submit_answer",
            ClientCommand::ShowResults { .. } => "show_results",
            ClientCommand::GetLeaderboard { .. } => "get_leaderboard",
        }
    }
}

/// Single acknowledgment sent back for every inbound command.
///
/// Successful acknowledgments flatten their payload fields next to
/// `success`; failures carry the human-readable reason instead.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommandAck {
    /// Wire name of the command this acknowledges.
    pub cmd: String,
    /// Whether the command was applied.
    pub success: bool,
    /// Failure reason, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Payload fields flattened into the acknowledgment object.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

impl CommandAck {
    /// Successful acknowledgment carrying the fields of `payload`.
    ///
    /// Non-object payloads collapse to an empty payload; every caller passes
    /// a JSON object literal.
    pub fn ok(cmd: &str, payload: Value) -> Self {
        let data = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            cmd: cmd.to_owned(),
            success: true,
            error: None,
            data,
        }
    }

    /// Failed acknowledgment carrying the human-readable reason.
    pub fn err(cmd: &str, message: impl Into<String>) -> Self {
        Self {
            cmd: cmd.to_owned(),
            success: false,
            error: Some(message.into()),
            data: Map::new(),
        }
    }
}

/// Events broadcast to every subscriber of a join-code room.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RoomEvent {
    /// A player entered the waiting room.
    PlayerJoined {
        /// Identifier of the new player.
        player_id: String,
        /// Display name of the new player.
        nickname: String,
        /// Starting score, always 0.
        score: u32,
    },
    /// The host started the game.
    GameStarted,
    /// A new question went live. Never carries the correct option.
    QuestionStart {
        /// Index of the question within the quiz.
        question_index: i32,
        /// Total number of questions in the quiz.
        total_questions: usize,
        /// Prompt text.
        text: String,
        /// Ordered answer options.
        options: Vec<String>,
        /// Seconds players have to answer.
        time_limit: u32,
    },
    /// Another answer arrived for the live question.
    AnswerCountUpdate {
        /// Answers recorded so far.
        answer_count: usize,
        /// Players currently on the roster.
        total_players: usize,
    },
    /// The answer window closed; per-question results are out.
    QuestionResults {
        /// Index of the correct option.
        correct_option_index: usize,
        /// Answers counted per option.
        answer_distribution: Vec<usize>,
        /// How many answers hit the correct option.
        correct_count: usize,
    },
    /// Fresh leaderboard standings.
    LeaderboardUpdate {
        /// Top players by score, descending.
        leaderboard: Vec<PlayerView>,
    },
    /// The game is over; final standings attached.
    GameEnded {
        /// Final top players by score, descending.
        leaderboard: Vec<PlayerView>,
    },
    /// A player's connection dropped. Roster and scores are unaffected.
    PlayerDisconnected {
        /// Identifier of the disconnected player.
        player_id: String,
    },
}

impl RoomEvent {
    /// Wire name of the event, also used as the SSE event field.
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::PlayerJoined { .. } => "player_joined",
            RoomEvent::GameStarted => "game_started",
            RoomEvent::QuestionStart { .. } => "question_start",
            RoomEvent::AnswerCountUpdate { .. } => "answer_count_update",
            RoomEvent::QuestionResults { .. } => "question_results",
            RoomEvent::LeaderboardUpdate { .. } => "leaderboard_update",
            RoomEvent::GameEnded { .. } => "game_ended",
            RoomEvent::PlayerDisconnected { .. } => "player_disconnected",
        }
    }
}

/// Events delivered to a single connection rather than a room.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DirectEvent {
    /// Greeting sent right after the WebSocket upgrade.
    Connected {
        /// Server-assigned identifier of this connection.
        connection_id: Uuid,
    },
    /// Outcome of the submitting player's own answer.
    ///
    /// Mirrors the `submit_answer` acknowledgment payload; player clients
    /// listening on events rather than replies rely on this duplicate.
    AnswerResult {
        /// Whether the answer was correct.
        correct: bool,
        /// Points earned by this answer.
        score: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let parsed: ClientCommand = serde_json::from_str(
            r#"{"cmd":"submit_answer","joinCode":"123456","playerId":"p1","optionIndex":2}"#,
        )
        .unwrap();

        match parsed {
            ClientCommand::SubmitAnswer {
                join_code,
                player_id,
                option_index,
            } => {
                assert_eq!(join_code, "123456");
                assert_eq!(player_id, "p1");
                assert_eq!(option_index, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ack_flattens_payload_fields() {
        let ack = CommandAck::ok("create_game", serde_json::json!({"joinCode": "123456"}));
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["cmd"], "create_game");
        assert_eq!(json["success"], true);
        assert_eq!(json["joinCode"], "123456");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failed_ack_carries_the_reason() {
        let ack = CommandAck::err("join_game", "Game already started");
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Game already started");
    }

    #[test]
    fn question_start_never_serializes_a_correct_option() {
        let event = RoomEvent::QuestionStart {
            question_index: 0,
            total_questions: 3,
            text: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            time_limit: 20,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("correctOptionIndex"));
        assert!(json.contains("\"event\":\"question_start\""));
    }
}
