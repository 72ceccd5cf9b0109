use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::state::SharedState;

/// Convert a room subscription into an SSE response for spectators.
///
/// Spectators (projector screens, score displays) get the same events the
/// room's WebSocket members see, with no command surface. A forwarder task
/// pumps the broadcast channel into the response stream and winds down when
/// the client disconnects.
pub fn room_stream(
    state: &SharedState,
    join_code: &str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let mut receiver = state.rooms().subscribe(join_code);
    let join_code = join_code.to_owned();

    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(event) => {
                            let data = match serde_json::to_string(&event) {
                                Ok(data) => data,
                                Err(err) => {
                                    warn!(error = %err, "failed to serialize SSE payload");
                                    continue;
                                }
                            };

                            let sse_event = Event::default().event(event.name()).data(data);
                            if tx.send(Ok(sse_event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged events but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        info!(%join_code, "spectator stream disconnected");
    });

    // response stream reads from mpsc; when the client disconnects axum
    // drops this stream and the forwarder stops on the next tick
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
