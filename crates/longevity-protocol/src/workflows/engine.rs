use crate::storage::{
    KeyValueStore, RemoteStateSink, StateRepository, StoreError, UserStateUpsert,
};
use crate::workflows::diagnosis::{
    ActionPlan, AcceleratorPolicy, DiagnosisHistory, DiagnosisOutcome, DiagnosisScores, Domain,
    ScoringScheme,
};
use crate::workflows::protocol::{
    advance_to_next_day, check_day_access, export_days_csv, upsert_day, DayAccess, DayCheckIn,
    ProtocolDay, ProtocolError, ProtocolSummary, UserProgressionState, FIRST_PROTOCOL_DAY,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Knobs the engine needs beyond its collaborators.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub accelerator: AcceleratorPolicy,
    /// Set when the user is signed in; enables the remote mirror.
    pub user_id: Option<String>,
}

/// Scores, accelerator and plan without persisting anything.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub scores: DiagnosisScores,
    pub accelerator: Domain,
    pub accelerator_label: &'static str,
    pub plan: ActionPlan,
}

/// A day's check-in ready for editing, together with the navigation verdict
/// that picked the day. There is no check-in until the quiz is done.
#[derive(Debug, Clone)]
pub struct DayOpening {
    pub access: DayAccess,
    pub check_in: Option<DayCheckIn>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to export protocol days: {0}")]
    Export(#[from] csv::Error),
}

/// Composes scoring, progression and persistence for a single user session.
pub struct ProtocolEngine<S, R> {
    repository: StateRepository<S>,
    remote: Arc<R>,
    scheme: ScoringScheme,
    options: EngineOptions,
}

impl<S, R> ProtocolEngine<S, R>
where
    S: KeyValueStore,
    R: RemoteStateSink,
{
    pub fn new(store: S, remote: Arc<R>, options: EngineOptions) -> Self {
        Self {
            repository: StateRepository::new(store),
            remote,
            scheme: ScoringScheme::standard(),
            options,
        }
    }

    pub fn store(&self) -> &S {
        self.repository.store()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn score_only(&self, answers: &[u8]) -> ScoreReport {
        let scores = self.scheme.compute(answers);
        let accelerator = self.options.accelerator.select(&scores);
        ScoreReport {
            scores,
            accelerator,
            accelerator_label: accelerator.label(),
            plan: ActionPlan::for_domain(accelerator),
        }
    }

    /// Scores a finished quiz, appends it to the history and moves the user to
    /// the first protocol day.
    pub fn complete_quiz(
        &mut self,
        answers: Vec<u8>,
        completed_at: DateTime<Utc>,
    ) -> Result<DiagnosisOutcome, EngineError> {
        let scores = self.scheme.compute(&answers);
        let mut history = self.repository.diagnosis_history();
        let record = history.append(answers, scores, completed_at);
        self.repository.save_diagnosis_history(&history)?;

        let accelerator = self.options.accelerator.select(&scores);
        info!(
            id = %record.id,
            global = scores.global,
            accelerator = %accelerator,
            "diagnosis recorded"
        );

        self.advance_progression(FIRST_PROTOCOL_DAY)?;

        Ok(DiagnosisOutcome::new(record, accelerator))
    }

    pub fn history(&self) -> DiagnosisHistory {
        self.repository.diagnosis_history()
    }

    pub fn latest_diagnosis(&self) -> Option<DiagnosisOutcome> {
        let history = self.repository.diagnosis_history();
        let record = history.latest()?.clone();
        let accelerator = self.options.accelerator.select(&record.scores);
        Some(DiagnosisOutcome::new(record, accelerator))
    }

    /// Plan driving the daily tasks; generic until a diagnosis exists.
    pub fn active_plan(&self) -> ActionPlan {
        self.latest_diagnosis()
            .map(|outcome| outcome.plan)
            .unwrap_or_else(ActionPlan::generic)
    }

    pub fn current_day(&self) -> u32 {
        self.repository.progression().current_day
    }

    pub fn days(&self) -> Vec<ProtocolDay> {
        self.repository.protocol_days()
    }

    /// Opens the requested day, or the day the navigation guard redirects to.
    /// Saved days reopen with their stored state.
    pub fn open_day(&self, requested: u32) -> DayOpening {
        let days = self.repository.protocol_days();
        let has_diagnosis = !self.repository.diagnosis_history().is_empty();
        let access = check_day_access(requested, &days, has_diagnosis);

        match &access {
            DayAccess::Allowed { .. } => {}
            DayAccess::Redirect { to, .. } => {
                info!(requested, redirect_to = to, "day not yet reachable; redirecting");
            }
            DayAccess::Diagnosis { .. } => {
                info!(requested, "no diagnosis yet; redirecting to the quiz");
                return DayOpening {
                    access,
                    check_in: None,
                };
            }
        }

        let day_number = access.day();
        let check_in = match days.into_iter().find(|day| day.day_number == day_number) {
            Some(saved) => DayCheckIn::resume(saved),
            None => DayCheckIn::new(day_number, self.active_plan().task_ids()),
        };

        DayOpening {
            access,
            check_in: Some(check_in),
        }
    }

    /// Upserts the check-in by day number and returns the saved record.
    /// Requires a diagnosis, and the day must be a protocol day.
    pub fn save_day(&mut self, check_in: &DayCheckIn) -> Result<ProtocolDay, EngineError> {
        if self.repository.diagnosis_history().is_empty() {
            return Err(ProtocolError::DiagnosisRequired.into());
        }
        if check_in.day_number() < FIRST_PROTOCOL_DAY {
            return Err(ProtocolError::NotAProtocolDay(check_in.day_number()).into());
        }

        let day = check_in.to_day();
        let mut days = self.repository.protocol_days();
        upsert_day(&mut days, day.clone());
        self.repository.save_protocol_days(&days)?;

        debug!(
            day = day.day_number,
            compliance = day.compliance,
            "protocol day saved"
        );
        Ok(day)
    }

    /// Saves the day and moves the user to the following one. Returns the new
    /// current day. Re-saving an earlier day never moves the user backwards.
    pub fn save_and_continue(&mut self, check_in: &DayCheckIn) -> Result<u32, EngineError> {
        let day = self.save_day(check_in)?;
        self.advance_progression(advance_to_next_day(day.day_number))
    }

    pub fn summary(&self) -> ProtocolSummary {
        ProtocolSummary::build(
            self.repository.progression(),
            &self.repository.protocol_days(),
            &self.repository.diagnosis_history(),
            &self.options.accelerator,
        )
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), EngineError> {
        export_days_csv(&self.repository.protocol_days(), writer)?;
        Ok(())
    }

    fn advance_progression(&mut self, target: u32) -> Result<u32, EngineError> {
        let mut state: UserProgressionState = self.repository.progression();
        if state.advance_to(target) {
            self.repository.save_progression(&state)?;
            info!(current_day = state.current_day, "progression advanced");
            self.mirror(&state);
        }
        Ok(state.current_day)
    }

    /// Fire-and-forget remote copy; failures are logged and dropped.
    fn mirror(&self, state: &UserProgressionState) {
        let Some(user_id) = self.options.user_id.as_ref() else {
            return;
        };

        let upsert = UserStateUpsert {
            user_id: user_id.clone(),
            current_day: state.current_day,
        };

        match self.remote.upsert_user_state(&upsert) {
            Ok(()) => debug!(user_id = %upsert.user_id, "remote user state mirrored"),
            Err(err) => warn!(user_id = %upsert.user_id, error = %err, "remote user state sync failed"),
        }
    }
}
