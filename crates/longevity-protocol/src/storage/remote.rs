use serde::Serialize;
use std::sync::Mutex;

/// Payload mirrored to the hosted user-state table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserStateUpsert {
    pub user_id: String,
    pub current_day: u32,
}

/// Best-effort remote copy of the progression state. Callers log failures and
/// carry on; the local store stays authoritative.
pub trait RemoteStateSink: Send + Sync {
    fn upsert_user_state(&self, state: &UserStateUpsert) -> Result<(), RemoteSyncError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteSyncError {
    #[error("remote state sink unavailable: {0}")]
    Unavailable(String),
    #[error("remote state sink rejected upsert: {0}")]
    Rejected(String),
}

/// Sink used when no remote backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRemoteSink;

impl RemoteStateSink for NoopRemoteSink {
    fn upsert_user_state(&self, _state: &UserStateUpsert) -> Result<(), RemoteSyncError> {
        Ok(())
    }
}

/// Keeps every upsert in memory. Useful for demos and tests.
#[derive(Debug, Default)]
pub struct RecordingRemoteSink {
    upserts: Mutex<Vec<UserStateUpsert>>,
}

impl RecordingRemoteSink {
    pub fn upserts(&self) -> Vec<UserStateUpsert> {
        self.upserts
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl RemoteStateSink for RecordingRemoteSink {
    fn upsert_user_state(&self, state: &UserStateUpsert) -> Result<(), RemoteSyncError> {
        let mut guard = self
            .upserts
            .lock()
            .map_err(|_| RemoteSyncError::Unavailable("recording sink poisoned".to_string()))?;
        guard.push(state.clone());
        Ok(())
    }
}
