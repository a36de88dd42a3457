use chrono::{DateTime, TimeZone, Utc};
use longevity_protocol::storage::repository::PROTOCOL_DAYS_KEY;
use longevity_protocol::storage::{
    InMemoryStore, JsonFileStore, KeyValueStore, NoopRemoteSink, RecordingRemoteSink,
    UserStateUpsert,
};
use longevity_protocol::workflows::diagnosis::{ActionPlan, Domain};
use longevity_protocol::workflows::protocol::{
    DayAccess, DayCheckIn, ProtocolError, TaskStatus, FIRST_PROTOCOL_DAY,
};
use longevity_protocol::workflows::{EngineError, EngineOptions, ProtocolEngine};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn completed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 2, 7, 45, 0)
        .single()
        .expect("valid timestamp")
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("longevity-progression-{}-{name}", std::process::id()))
        .join("state.json")
}

fn memory_engine() -> ProtocolEngine<InMemoryStore, NoopRemoteSink> {
    ProtocolEngine::new(
        InMemoryStore::new(),
        Arc::new(NoopRemoteSink),
        EngineOptions::default(),
    )
}

#[test]
fn skipped_day_scores_zero_and_resave_replaces_it() {
    let mut engine = memory_engine();
    engine
        .complete_quiz(vec![0; 17], completed_at())
        .expect("quiz completes");

    let mut check_in = engine.open_day(2).check_in.expect("quiz done");
    for id in ["action-1", "action-2", "action-3"] {
        check_in
            .set_status(id, TaskStatus::NotDone)
            .expect("task exists");
    }
    let saved = engine.save_day(&check_in).expect("day saves");
    assert_eq!(saved.compliance, 0);

    check_in
        .set_status("action-1", TaskStatus::Completed)
        .expect("task exists");
    let saved = engine.save_day(&check_in).expect("day saves again");
    assert_eq!(saved.compliance, 33);

    let days = engine.days();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].compliance, 33);
}

#[test]
fn day_gate_follows_saved_progress() {
    let mut engine = memory_engine();
    assert!(matches!(
        engine.open_day(2).access,
        DayAccess::Diagnosis { requested: 2, .. }
    ));

    engine
        .complete_quiz(vec![1; 17], completed_at())
        .expect("quiz completes");
    assert_eq!(engine.current_day(), 2);

    let opening = engine.open_day(4);
    assert!(opening.access.is_redirect());
    let check_in = opening.check_in.expect("quiz done");
    assert_eq!(check_in.day_number(), 2);

    let next = engine.save_and_continue(&check_in).expect("day saves");
    assert_eq!(next, 3);
    assert_eq!(engine.open_day(3).access, DayAccess::Allowed { day: 3 });
    assert_eq!(engine.open_day(0).access.day(), FIRST_PROTOCOL_DAY);

    // Re-saving day 2 must not move the user back.
    let earlier = engine.open_day(2).check_in.expect("quiz done");
    assert_eq!(engine.save_and_continue(&earlier).expect("resaves"), 3);
}

#[test]
fn protocol_day_one_is_the_diagnosis() {
    let mut engine = memory_engine();

    let opening = engine.open_day(1);
    assert!(matches!(
        opening.access,
        DayAccess::Diagnosis { requested: 1, .. }
    ));
    assert!(opening.check_in.is_none());

    let stray = DayCheckIn::new(1, ActionPlan::generic().task_ids());
    assert!(matches!(
        engine.save_and_continue(&stray),
        Err(EngineError::Protocol(ProtocolError::DiagnosisRequired))
    ));
    assert_eq!(engine.current_day(), 1);

    engine
        .complete_quiz(vec![0; 17], completed_at())
        .expect("quiz completes");

    let opening = engine.open_day(1);
    assert_eq!(opening.access.day(), FIRST_PROTOCOL_DAY);
    let check_in = opening.check_in.expect("quiz done");
    assert_eq!(check_in.day_number(), FIRST_PROTOCOL_DAY);

    assert!(matches!(
        engine.save_day(&stray),
        Err(EngineError::Protocol(ProtocolError::NotAProtocolDay(1)))
    ));

    let summary = engine.summary();
    assert_eq!(summary.days_logged, 0);
    assert_eq!(summary.current_day, FIRST_PROTOCOL_DAY);
}

#[test]
fn state_survives_reopening_the_file_store() {
    let path = scratch_path("reopen");
    let _ = fs::remove_file(&path);

    {
        let store = JsonFileStore::open(&path).expect("opens fresh file");
        let mut engine = ProtocolEngine::new(
            store,
            Arc::new(NoopRemoteSink),
            EngineOptions::default(),
        );
        let mut answers = vec![0; 17];
        answers[14] = 3;
        engine
            .complete_quiz(answers, completed_at())
            .expect("quiz completes");

        let mut check_in = engine.open_day(2).check_in.expect("quiz done");
        check_in
            .set_status("action-2", TaskStatus::Completed)
            .expect("task exists");
        check_in.set_mood(9);
        engine.save_and_continue(&check_in).expect("day saves");
    }

    let store = JsonFileStore::open(&path).expect("reopens file");
    let engine = ProtocolEngine::new(
        store,
        Arc::new(NoopRemoteSink),
        EngineOptions::default(),
    );
    assert_eq!(engine.current_day(), 3);
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.active_plan().domain, Some(Domain::PerceivedTime));

    let days = engine.days();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].mood_rating, 9);
    assert_eq!(days[0].tasks[1].status, TaskStatus::Completed);

    let raw = fs::read_to_string(&path).expect("state file readable");
    assert!(raw.contains("diagnosis_history"));
    assert!(raw.contains("user_progression"));

    let _ = fs::remove_file(&path);
}

#[test]
fn corrupt_entity_reads_as_empty_and_is_overwritten() {
    let mut store = InMemoryStore::new();
    store
        .set(PROTOCOL_DAYS_KEY, "{not json".to_string())
        .expect("raw write");

    let mut engine = ProtocolEngine::new(
        store,
        Arc::new(NoopRemoteSink),
        EngineOptions::default(),
    );
    assert!(engine.days().is_empty());

    engine
        .complete_quiz(vec![0; 17], completed_at())
        .expect("quiz completes");
    let check_in = engine.open_day(2).check_in.expect("quiz done");
    engine.save_day(&check_in).expect("day saves");
    assert_eq!(engine.days().len(), 1);
}

#[test]
fn signed_in_progress_is_mirrored_once_per_advance() {
    let sink = Arc::new(RecordingRemoteSink::default());
    let mut engine = ProtocolEngine::new(
        InMemoryStore::new(),
        sink.clone(),
        EngineOptions {
            user_id: Some("user-3".to_string()),
            ..EngineOptions::default()
        },
    );

    engine
        .complete_quiz(vec![0; 17], completed_at())
        .expect("quiz completes");
    let check_in = engine.open_day(2).check_in.expect("quiz done");
    engine.save_and_continue(&check_in).expect("day saves");
    engine.save_and_continue(&check_in).expect("day resaves");

    let days: Vec<u32> = sink
        .upserts()
        .into_iter()
        .map(|UserStateUpsert { current_day, .. }| current_day)
        .collect();
    assert_eq!(days, vec![2, 3]);
}

#[test]
fn summary_and_export_cover_logged_days() {
    let mut engine = memory_engine();
    engine
        .complete_quiz(vec![0; 17], completed_at())
        .expect("quiz completes");

    for statuses in [
        [TaskStatus::Completed, TaskStatus::Partial, TaskStatus::NotDone],
        [TaskStatus::Completed, TaskStatus::Completed, TaskStatus::Completed],
    ] {
        let mut check_in = engine
            .open_day(engine.current_day())
            .check_in
            .expect("quiz done");
        for (id, status) in ["action-1", "action-2", "action-3"].iter().zip(statuses) {
            check_in.set_status(id, status).expect("task exists");
        }
        engine.save_and_continue(&check_in).expect("day saves");
    }

    let summary = engine.summary();
    assert_eq!(summary.current_day, 4);
    assert_eq!(summary.days_logged, 2);
    assert_eq!(summary.average_compliance, Some(75));
    assert_eq!(summary.streak, 2);
    assert_eq!(summary.best_day, Some(3));
    assert_eq!(summary.latest_global_score, Some(100));

    let mut buffer = Vec::new();
    engine.export_csv(&mut buffer).expect("csv export");
    let csv = String::from_utf8(buffer).expect("utf8 csv");
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], "2,50,5,5,1,1,1,0");
    assert_eq!(rows[2], "3,100,5,5,3,0,0,0");
}
