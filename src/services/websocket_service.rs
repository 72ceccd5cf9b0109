use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::json;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        game::{GameStateView, PlayerView},
        ws::{ClientCommand, CommandAck, DirectEvent},
    },
    error::ServiceError,
    services::{game_service, room_events},
    state::SharedState,
};

/// Room membership tracked on one connection.
///
/// A connection belongs to at most one join-code room at a time; entering
/// another room tears the previous subscription down.
struct RoomMembership {
    join_code: String,
    /// Present when the connection joined as a player; drives the
    /// disconnect broadcast.
    player_id: Option<String>,
    forwarder: JoinHandle<()>,
}

/// Handle the full lifecycle of one host or player WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we
    // await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let connection_id = Uuid::new_v4();
    let _ = send_json(&outbound_tx, &DirectEvent::Connected { connection_id });
    info!(%connection_id, "client connected");

    let mut membership: Option<RoomMembership> = None;

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientCommand>(&text) {
                Ok(command) => {
                    handle_command(&state, &mut membership, &outbound_tx, command).await;
                }
                Err(err) => {
                    warn!(%connection_id, error = %err, "unparseable command");
                    let _ = send_json(
                        &outbound_tx,
                        &CommandAck::err("unknown", format!("invalid command: {err}")),
                    );
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    // Disconnect is presentation-only: the roster and recorded scores stay
    // untouched, the room is merely told the player's connection dropped.
    if let Some(room) = membership.take() {
        room.forwarder.abort();
        if let Some(player_id) = room.player_id {
            info!(%connection_id, join_code = %room.join_code, %player_id, "player disconnected");
            room_events::broadcast_player_disconnected(&state, &room.join_code, &player_id);
        }
    }
    info!(%connection_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Translate one inbound command into engine calls, room broadcasts, and the
/// single acknowledgment, in that order on the wire.
async fn handle_command(
    state: &SharedState,
    membership: &mut Option<RoomMembership>,
    outbound_tx: &mpsc::UnboundedSender<Message>,
    command: ClientCommand,
) {
    let cmd = command.name();

    match command {
        ClientCommand::CreateGame { quiz_id, host_id } => {
            match game_service::create_session(state, &quiz_id, &host_id).await {
                Ok(join_code) => {
                    enter_room(state, membership, outbound_tx, join_code.clone(), None);
                    let _ = send_json(
                        outbound_tx,
                        &CommandAck::ok(cmd, json!({ "joinCode": join_code })),
                    );
                }
                Err(err) => send_failure(outbound_tx, cmd, &err),
            }
        }
        ClientCommand::JoinGame {
            join_code,
            nickname,
            player_id,
        } => match game_service::join_session(state, &join_code, &nickname, &player_id).await {
            Ok(game) => {
                enter_room(
                    state,
                    membership,
                    outbound_tx,
                    join_code.clone(),
                    Some(player_id.clone()),
                );
                room_events::broadcast_player_joined(state, &join_code, &player_id, &nickname);
                let _ = send_json(
                    outbound_tx,
                    &CommandAck::ok(cmd, json!({ "state": GameStateView::from(&game) })),
                );
            }
            Err(err) => send_failure(outbound_tx, cmd, &err),
        },
        ClientCommand::StartGame { join_code } => {
            match game_service::start_game(state, &join_code).await {
                Ok(Some(_)) => {
                    room_events::broadcast_game_started(state, &join_code);
                    let _ = send_json(outbound_tx, &CommandAck::ok(cmd, json!({})));
                }
                Ok(None) => {
                    let _ = send_json(
                        outbound_tx,
                        &CommandAck::err(cmd, format!("session `{join_code}` not found")),
                    );
                }
                Err(err) => send_failure(outbound_tx, cmd, &err),
            }
        }
        ClientCommand::NextQuestion { join_code } => {
            match game_service::next_question(state, &join_code).await {
                Ok(advance) => match advance.question {
                    Some(question) => {
                        room_events::broadcast_question_start(
                            state,
                            &join_code,
                            advance.state.current_question_index,
                            advance.total_questions,
                            &question,
                        );
                        let _ = send_json(
                            outbound_tx,
                            &CommandAck::ok(
                                cmd,
                                json!({
                                    "ended": false,
                                    "questionIndex": advance.state.current_question_index,
                                    "totalQuestions": advance.total_questions,
                                    "text": question.text,
                                    "options": question.options,
                                    "timeLimit": question.time_limit,
                                }),
                            ),
                        );
                    }
                    None => match game_service::get_leaderboard(state, &join_code).await {
                        Ok(players) => {
                            let leaderboard: Vec<PlayerView> =
                                players.iter().map(PlayerView::from).collect();
                            room_events::broadcast_game_ended(
                                state,
                                &join_code,
                                leaderboard.clone(),
                            );
                            let _ = send_json(
                                outbound_tx,
                                &CommandAck::ok(
                                    cmd,
                                    json!({ "ended": true, "leaderboard": leaderboard }),
                                ),
                            );
                        }
                        Err(err) => send_failure(outbound_tx, cmd, &err),
                    },
                },
                Err(err) => send_failure(outbound_tx, cmd, &err),
            }
        }
        ClientCommand::SubmitAnswer {
            join_code,
            player_id,
            option_index,
        } => match game_service::submit_answer(state, &join_code, &player_id, option_index).await {
            Ok(outcome) => {
                // Counts derive from the state as persisted after this answer.
                match game_service::get_session(state, &join_code).await {
                    Ok(Some(game)) => room_events::broadcast_answer_count(
                        state,
                        &join_code,
                        game.answers.len(),
                        game.players.len(),
                    ),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(%join_code, error = %err, "failed to derive answer counts")
                    }
                }
                let _ = send_json(
                    outbound_tx,
                    &CommandAck::ok(
                        cmd,
                        json!({ "correct": outcome.correct, "score": outcome.points }),
                    ),
                );
                // Second delivery channel kept for player clients that listen
                // on the event rather than the acknowledgment.
                let _ = send_json(
                    outbound_tx,
                    &DirectEvent::AnswerResult {
                        correct: outcome.correct,
                        score: outcome.points,
                    },
                );
            }
            Err(err) => send_failure(outbound_tx, cmd, &err),
        },
        ClientCommand::ShowResults { join_code } => {
            match game_service::show_results(state, &join_code).await {
                Ok(results) => {
                    room_events::broadcast_question_results(
                        state,
                        &join_code,
                        results.correct_option_index,
                        results.answer_distribution.clone(),
                        results.correct_count,
                    );
                    let _ = send_json(
                        outbound_tx,
                        &CommandAck::ok(
                            cmd,
                            json!({
                                "correctOptionIndex": results.correct_option_index,
                                "answerDistribution": results.answer_distribution,
                                "correctCount": results.correct_count,
                            }),
                        ),
                    );
                }
                Err(err) => send_failure(outbound_tx, cmd, &err),
            }
        }
        ClientCommand::GetLeaderboard { join_code } => {
            match game_service::get_leaderboard(state, &join_code).await {
                Ok(players) => {
                    let leaderboard: Vec<PlayerView> =
                        players.iter().map(PlayerView::from).collect();
                    room_events::broadcast_leaderboard(state, &join_code, leaderboard.clone());
                    let _ = send_json(
                        outbound_tx,
                        &CommandAck::ok(cmd, json!({ "leaderboard": leaderboard })),
                    );
                }
                Err(err) => send_failure(outbound_tx, cmd, &err),
            }
        }
    }
}

/// Subscribe the connection to a join-code room, replacing any previous
/// membership, and pump room events into the connection's writer.
fn enter_room(
    state: &SharedState,
    membership: &mut Option<RoomMembership>,
    outbound_tx: &mpsc::UnboundedSender<Message>,
    join_code: String,
    player_id: Option<String>,
) {
    if let Some(previous) = membership.take() {
        previous.forwarder.abort();
    }

    let mut room_rx = state.rooms().subscribe(&join_code);
    let tx = outbound_tx.clone();
    let forwarder = tokio::spawn(async move {
        loop {
            match room_rx.recv().await {
                Ok(event) => {
                    if send_json(&tx, &event).is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
                // Skip events the connection was too slow to consume.
                Err(RecvError::Lagged(_)) => continue,
            }
        }
    });

    *membership = Some(RoomMembership {
        join_code,
        player_id,
        forwarder,
    });
}

/// Serialize a payload and push it onto the connection's writer channel.
///
/// Serialization failures are logged and swallowed (retrying cannot fix
/// them); a closed writer comes back as `Err` so callers can stop early.
fn send_json<T>(tx: &mpsc::UnboundedSender<Message>, value: &T) -> Result<(), ()>
where
    T: ?Sized + Serialize,
{
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize outbound message");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into())).map_err(|_| ())
}

fn send_failure(tx: &mpsc::UnboundedSender<Message>, cmd: &str, err: &ServiceError) {
    warn!(command = cmd, error = %err, "command failed");
    let _ = send_json(tx, &CommandAck::err(cmd, err.to_string()));
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
