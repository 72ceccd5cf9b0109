use crate::{
    dto::{game::PlayerView, ws::RoomEvent},
    state::{SharedState, game::Question},
};

/// Announce a new roster entry to the room.
pub fn broadcast_player_joined(
    state: &SharedState,
    join_code: &str,
    player_id: &str,
    nickname: &str,
) {
    state.rooms().broadcast(
        join_code,
        RoomEvent::PlayerJoined {
            player_id: player_id.to_owned(),
            nickname: nickname.to_owned(),
            score: 0,
        },
    );
}

/// Announce that the host started the game.
pub fn broadcast_game_started(state: &SharedState, join_code: &str) {
    state.rooms().broadcast(join_code, RoomEvent::GameStarted);
}

/// Push a freshly activated question to the room.
///
/// Only the public fields of the question go out; the correct option index
/// never leaves the server through this event.
pub fn broadcast_question_start(
    state: &SharedState,
    join_code: &str,
    question_index: i32,
    total_questions: usize,
    question: &Question,
) {
    state.rooms().broadcast(
        join_code,
        RoomEvent::QuestionStart {
            question_index,
            total_questions,
            text: question.text.clone(),
            options: question.options.clone(),
            time_limit: question.time_limit,
        },
    );
}

/// Refresh the room's live answer counter.
pub fn broadcast_answer_count(
    state: &SharedState,
    join_code: &str,
    answer_count: usize,
    total_players: usize,
) {
    state.rooms().broadcast(
        join_code,
        RoomEvent::AnswerCountUpdate {
            answer_count,
            total_players,
        },
    );
}

/// Reveal the aggregated results of the current question to the room.
pub fn broadcast_question_results(
    state: &SharedState,
    join_code: &str,
    correct_option_index: usize,
    answer_distribution: Vec<usize>,
    correct_count: usize,
) {
    state.rooms().broadcast(
        join_code,
        RoomEvent::QuestionResults {
            correct_option_index,
            answer_distribution,
            correct_count,
        },
    );
}

/// Push current standings to the room.
pub fn broadcast_leaderboard(state: &SharedState, join_code: &str, leaderboard: Vec<PlayerView>) {
    state
        .rooms()
        .broadcast(join_code, RoomEvent::LeaderboardUpdate { leaderboard });
}

/// Tell the room the game is over, with final standings attached.
pub fn broadcast_game_ended(state: &SharedState, join_code: &str, leaderboard: Vec<PlayerView>) {
    state
        .rooms()
        .broadcast(join_code, RoomEvent::GameEnded { leaderboard });
}

/// Tell the room a player's connection dropped.
pub fn broadcast_player_disconnected(state: &SharedState, join_code: &str, player_id: &str) {
    state.rooms().broadcast(
        join_code,
        RoomEvent::PlayerDisconnected {
            player_id: player_id.to_owned(),
        },
    );
}
