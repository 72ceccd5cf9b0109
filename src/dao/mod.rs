/// Quiz catalog collaborator consulted for ordered question lists.
pub mod quiz_catalog;
/// Append-only session audit ledger collaborator.
pub mod session_ledger;
/// Session state storage and retrieval operations.
pub mod session_store;
/// Storage abstraction layer shared by backends.
pub mod storage;
