/// Session state machine data model.
pub mod game;
/// Per-join-code broadcast fan-out.
pub mod rooms;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::dao::{
    quiz_catalog::QuizCatalog, session_ledger::SessionLedger, session_store::SessionStore,
};

pub use self::rooms::RoomHub;

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Pending events a room channel buffers for a slow subscriber.
const ROOM_CHANNEL_CAPACITY: usize = 64;

/// Central application state shared by every connection handler.
///
/// Holds the session store (single source of truth for live game state), the
/// external collaborators, the room fan-out hub, and the per-join-code locks
/// that serialize engine mutations.
pub struct AppState {
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn QuizCatalog>,
    ledger: Arc<dyn SessionLedger>,
    rooms: RoomHub,
    session_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct the application state wrapped in an [`Arc`] so it can be
    /// cloned cheaply into every handler.
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn QuizCatalog>,
        ledger: Arc<dyn SessionLedger>,
    ) -> SharedState {
        Arc::new(Self {
            store,
            catalog,
            ledger,
            rooms: RoomHub::new(ROOM_CHANNEL_CAPACITY),
            session_locks: DashMap::new(),
        })
    }

    /// Key-value store holding one serialized session per join code.
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Read-only quiz catalog collaborator.
    pub fn quiz_catalog(&self) -> &Arc<dyn QuizCatalog> {
        &self.catalog
    }

    /// Append-only session audit ledger collaborator.
    pub fn session_ledger(&self) -> &Arc<dyn SessionLedger> {
        &self.ledger
    }

    /// Broadcast hub fanning events out to join-code rooms.
    pub fn rooms(&self) -> &RoomHub {
        &self.rooms
    }

    /// Acquire the mutation lock for one join code.
    ///
    /// Every engine read-modify-write cycle runs under this guard, which
    /// makes concurrent operations on the same session take effect one after
    /// the other instead of overwriting each other. Operations on distinct
    /// join codes never contend.
    pub async fn lock_session(&self, join_code: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .session_locks
            .entry(join_code.to_owned())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
