use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::validation::validate_join_code,
    error::AppError,
    services::{game_service, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/sessions/{join_code}",
    tag = "sse",
    params(("join_code" = String, Path, description = "Join code of the session to watch")),
    responses((status = 200, description = "Spectator event stream", content_type = "text/event-stream", body = String))
)]
/// Stream a session's room events to a read-only spectator.
pub async fn session_events(
    State(state): State<SharedState>,
    Path(join_code): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    if let Err(err) = validate_join_code(&join_code) {
        let reason = err
            .message
            .as_ref()
            .map(|message| message.to_string())
            .unwrap_or_else(|| err.code.to_string());
        return Err(AppError::BadRequest(reason));
    }

    if game_service::get_session(&state, &join_code).await?.is_none() {
        return Err(AppError::NotFound(format!("session `{join_code}` not found")));
    }

    info!(%join_code, "new spectator stream");
    Ok(sse_service::room_stream(&state, &join_code))
}

/// Configure the spectator SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/sessions/{join_code}", get(session_events))
}
