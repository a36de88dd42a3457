use longevity_protocol::config::EngineConfig;
use longevity_protocol::error::AppError;
use longevity_protocol::storage::{
    JsonFileStore, KeyValueStore, RemoteStateSink, RemoteSyncError, UserStateUpsert,
};
use longevity_protocol::workflows::protocol::TaskStatus;
use longevity_protocol::workflows::ProtocolEngine;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type SharedEngine<S> = Arc<Mutex<ProtocolEngine<S, LoggingRemoteSink>>>;

/// Stand-in for the hosted user-state table: records the upsert in the logs.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingRemoteSink;

impl RemoteStateSink for LoggingRemoteSink {
    fn upsert_user_state(&self, state: &UserStateUpsert) -> Result<(), RemoteSyncError> {
        info!(
            user_id = %state.user_id,
            current_day = state.current_day,
            "user state upsert"
        );
        Ok(())
    }
}

pub(crate) fn open_engine(
    config: &EngineConfig,
) -> Result<ProtocolEngine<JsonFileStore, LoggingRemoteSink>, AppError> {
    let store = JsonFileStore::open(config.state_path.clone())?;
    Ok(ProtocolEngine::new(
        store,
        Arc::new(LoggingRemoteSink),
        config.options(),
    ))
}

pub(crate) fn lock_engine<S: KeyValueStore>(
    engine: &SharedEngine<S>,
) -> Result<MutexGuard<'_, ProtocolEngine<S, LoggingRemoteSink>>, AppError> {
    engine
        .lock()
        .map_err(|_| AppError::Server(axum::Error::new("protocol engine lock poisoned")))
}

/// Runs `work` against the locked engine on the blocking pool. File-backed
/// stores write synchronously, so mutating handlers go through here.
pub(crate) async fn with_engine<S, T, F>(engine: SharedEngine<S>, work: F) -> Result<T, AppError>
where
    S: KeyValueStore + 'static,
    T: Send + 'static,
    F: FnOnce(&mut ProtocolEngine<S, LoggingRemoteSink>) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = lock_engine(&engine)?;
        work(&mut guard)
    })
    .await
    .map_err(|err| AppError::Server(axum::Error::new(err)))?
}

/// Accepts `0,1,2`, `0 1 2` or a compact `012` string of option indices.
pub(crate) fn parse_answers(raw: &str) -> Result<Vec<u8>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let separated = trimmed.contains(|c: char| c == ',' || c.is_whitespace());
    if !separated {
        return trimmed
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|digit| digit as u8)
                    .ok_or_else(|| format!("answer '{c}' is not a digit"))
            })
            .collect();
    }

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|err| format!("answer '{token}' is not an option index ({err})"))
        })
        .collect()
}

/// Parses `action-1=completed` into a task id and status.
pub(crate) fn parse_task_status(raw: &str) -> Result<(String, TaskStatus), String> {
    let (id, status) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TASK=STATUS, got '{raw}'"))?;
    let status = TaskStatus::from_key(status.trim())
        .ok_or_else(|| format!("unknown task status '{}'", status.trim()))?;
    Ok((id.trim().to_string(), status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use longevity_protocol::storage::InMemoryStore;
    use longevity_protocol::workflows::EngineOptions;

    fn shared_engine() -> SharedEngine<InMemoryStore> {
        Arc::new(Mutex::new(ProtocolEngine::new(
            InMemoryStore::new(),
            Arc::new(LoggingRemoteSink),
            EngineOptions::default(),
        )))
    }

    #[tokio::test]
    async fn blocking_work_sees_and_keeps_engine_state() {
        let engine = shared_engine();
        let day = with_engine(engine.clone(), |engine| {
            engine.complete_quiz(vec![0; 17], Utc::now())?;
            Ok(engine.current_day())
        })
        .await
        .expect("quiz completes");
        assert_eq!(day, 2);
        assert_eq!(lock_engine(&engine).expect("lock").current_day(), 2);
    }

    #[tokio::test]
    async fn blocking_work_errors_reach_the_caller() {
        let result: Result<(), AppError> = with_engine(shared_engine(), |_| {
            Err(AppError::InvalidInput("rejected".to_string()))
        })
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(message)) if message == "rejected"));
    }

    #[test]
    fn answers_parse_in_all_layouts() {
        assert_eq!(parse_answers("0,1, 2").expect("comma list"), vec![0, 1, 2]);
        assert_eq!(parse_answers("3 3 0").expect("space list"), vec![3, 3, 0]);
        assert_eq!(parse_answers("0123").expect("compact"), vec![0, 1, 2, 3]);
        assert!(parse_answers("").expect("empty").is_empty());
    }

    #[test]
    fn answers_reject_non_numeric_tokens() {
        assert!(parse_answers("0,x,2").is_err());
        assert!(parse_answers("01a").is_err());
    }

    #[test]
    fn task_status_pairs_parse() {
        let (id, status) = parse_task_status("action-2=partial").expect("pair parses");
        assert_eq!(id, "action-2");
        assert_eq!(status, TaskStatus::Partial);
        assert!(parse_task_status("action-2").is_err());
        assert!(parse_task_status("action-2=maybe").is_err());
    }
}
