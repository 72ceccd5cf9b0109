use std::time::SystemTime;

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{info, warn};

use crate::dao::storage::StorageResult;

/// Coarse session status mirrored for offline reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    /// Session created, waiting for players.
    Waiting,
    /// Game started.
    Active,
    /// Game over or terminated early.
    Ended,
}

/// One audit row per session, keyed by join code.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    /// Join code the session was created under.
    pub join_code: String,
    /// Quiz the session was playing.
    pub quiz_id: String,
    /// Host that created the session.
    pub host_id: String,
    /// Last mirrored status.
    pub status: LedgerStatus,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 start timestamp, set when the game goes active.
    pub started_at: Option<String>,
    /// RFC 3339 end timestamp, set when the game ends.
    pub ended_at: Option<String>,
}

/// Append-only mirror of coarse session lifecycle transitions.
///
/// The engine writes through this after every lifecycle persist; the ledger
/// is never read back on the hot path.
pub trait SessionLedger: Send + Sync {
    /// Record that a session was created in the waiting state.
    fn record_created(
        &self,
        join_code: &str,
        quiz_id: &str,
        host_id: &str,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Record that the session's game started.
    fn record_started(&self, join_code: &str) -> BoxFuture<'static, StorageResult<()>>;
    /// Record that the session's game ended.
    fn record_ended(&self, join_code: &str) -> BoxFuture<'static, StorageResult<()>>;
}

/// In-process [`SessionLedger`] keeping audit rows for the server lifetime.
#[derive(Debug, Default)]
pub struct MemorySessionLedger {
    records: DashMap<String, SessionRecord>,
}

impl MemorySessionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the audit row for a join code.
    pub fn find(&self, join_code: &str) -> Option<SessionRecord> {
        self.records.get(join_code).map(|entry| entry.value().clone())
    }
}

impl SessionLedger for MemorySessionLedger {
    fn record_created(
        &self,
        join_code: &str,
        quiz_id: &str,
        host_id: &str,
    ) -> BoxFuture<'static, StorageResult<()>> {
        info!(%join_code, %quiz_id, "session created");
        self.records.insert(
            join_code.to_owned(),
            SessionRecord {
                join_code: join_code.to_owned(),
                quiz_id: quiz_id.to_owned(),
                host_id: host_id.to_owned(),
                status: LedgerStatus::Waiting,
                created_at: rfc3339_now(),
                started_at: None,
                ended_at: None,
            },
        );
        Box::pin(async move { Ok(()) })
    }

    fn record_started(&self, join_code: &str) -> BoxFuture<'static, StorageResult<()>> {
        match self.records.get_mut(join_code) {
            Some(mut record) => {
                info!(%join_code, "session started");
                record.status = LedgerStatus::Active;
                record.started_at = Some(rfc3339_now());
            }
            None => warn!(%join_code, "start recorded for unknown session"),
        }
        Box::pin(async move { Ok(()) })
    }

    fn record_ended(&self, join_code: &str) -> BoxFuture<'static, StorageResult<()>> {
        match self.records.get_mut(join_code) {
            Some(mut record) => {
                info!(%join_code, "session ended");
                record.status = LedgerStatus::Ended;
                record.ended_at = Some(rfc3339_now());
            }
            None => warn!(%join_code, "end recorded for unknown session"),
        }
        Box::pin(async move { Ok(()) })
    }
}

fn rfc3339_now() -> String {
    OffsetDateTime::from(SystemTime::now())
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lifecycle_transitions_are_mirrored() {
        let ledger = MemorySessionLedger::new();
        ledger.record_created("123456", "q1", "host-1").await.unwrap();

        let record = ledger.find("123456").unwrap();
        assert_eq!(record.status, LedgerStatus::Waiting);
        assert!(record.started_at.is_none());

        ledger.record_started("123456").await.unwrap();
        ledger.record_ended("123456").await.unwrap();

        let record = ledger.find("123456").unwrap();
        assert_eq!(record.status, LedgerStatus::Ended);
        assert!(record.started_at.is_some());
        assert!(record.ended_at.is_some());
    }

    #[tokio::test]
    async fn start_for_unknown_session_is_ignored() {
        let ledger = MemorySessionLedger::new();
        ledger.record_started("999999").await.unwrap();
        assert!(ledger.find("999999").is_none());
    }
}
