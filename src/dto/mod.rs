/// Session state projections exposed to clients.
pub mod game;
/// Health check payloads.
pub mod health;
/// Validation helpers for client-supplied fields.
pub mod validation;
/// WebSocket command, acknowledgment, and event contracts.
pub mod ws;
