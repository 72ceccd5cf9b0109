/// In-process store implementation.
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

/// Abstraction over the key-value store holding live session state.
///
/// Keys are namespaced strings (`"session:" + join code`), values are the
/// JSON-serialized session payloads. The store itself knows nothing about
/// game semantics; per-key write serialization is owned by the engine.
pub trait SessionStore: Send + Sync {
    /// Fetch the raw payload stored under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Write `value` under `key`, replacing any previous payload.
    fn put(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Write `value` under `key` only when the key is vacant.
    ///
    /// Returns `true` when the value was inserted, `false` when the key was
    /// already taken. The check-and-insert is atomic, which lets callers
    /// reserve fresh keys without racing each other.
    fn put_if_absent(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Probe the backend for liveness.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
