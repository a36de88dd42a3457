use super::kv::{KeyValueStore, StoreError};
use crate::workflows::diagnosis::DiagnosisHistory;
use crate::workflows::protocol::{ProtocolDay, UserProgressionState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const DIAGNOSIS_HISTORY_KEY: &str = "diagnosis_history";
pub const PROTOCOL_DAYS_KEY: &str = "protocol_days";
pub const USER_PROGRESSION_KEY: &str = "user_progression";

/// Typed access to the engine's entities on top of a raw key-value store.
#[derive(Debug)]
pub struct StateRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StateRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn diagnosis_history(&self) -> DiagnosisHistory {
        self.read(DIAGNOSIS_HISTORY_KEY).unwrap_or_default()
    }

    pub fn save_diagnosis_history(&mut self, history: &DiagnosisHistory) -> Result<(), StoreError> {
        self.write(DIAGNOSIS_HISTORY_KEY, history)
    }

    pub fn protocol_days(&self) -> Vec<ProtocolDay> {
        self.read(PROTOCOL_DAYS_KEY).unwrap_or_default()
    }

    pub fn save_protocol_days(&mut self, days: &[ProtocolDay]) -> Result<(), StoreError> {
        self.write(PROTOCOL_DAYS_KEY, days)
    }

    pub fn progression(&self) -> UserProgressionState {
        self.read(USER_PROGRESSION_KEY).unwrap_or_default()
    }

    pub fn save_progression(&mut self, state: &UserProgressionState) -> Result<(), StoreError> {
        self.write(USER_PROGRESSION_KEY, state)
    }

    /// Missing keys, unreadable stores and corrupt JSON all read as "no data".
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "state read failed; treating as empty");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "stored state is corrupt; treating as empty");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store.set(key, encoded)
    }
}
