/// OpenAPI documentation generation.
pub mod documentation;
/// Core game session engine: state machine transitions and scoring.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Room broadcast event builders.
pub mod room_events;
/// Server-Sent Events spectator streams.
pub mod sse_service;
/// WebSocket connection and command handling.
pub mod websocket_service;
