//! Persistence boundary: a raw key-value store, typed entity access on top of
//! it, and the optional remote mirror.

pub mod kv;
pub mod remote;
pub mod repository;

pub use kv::{InMemoryStore, JsonFileStore, KeyValueStore, StoreError};
pub use remote::{
    NoopRemoteSink, RecordingRemoteSink, RemoteStateSink, RemoteSyncError, UserStateUpsert,
};
pub use repository::StateRepository;
