use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Quiz Rush Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::session_events,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ws::ClientCommand,
            crate::dto::ws::CommandAck,
            crate::dto::ws::RoomEvent,
            crate::dto::ws::DirectEvent,
            crate::dto::game::GameStateView,
            crate::dto::game::PlayerView,
            crate::state::game::GameStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Spectator event streams"),
        (name = "game", description = "WebSocket operations for hosts and players"),
    )
)]
pub struct ApiDoc;
