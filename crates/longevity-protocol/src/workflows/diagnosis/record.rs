use super::domain::Domain;
use super::plan::ActionPlan;
use super::scoring::DiagnosisScores;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed quiz run. Never mutated once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub answers: Vec<u8>,
    pub scores: DiagnosisScores,
}

/// Append-only list of diagnosis runs, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosisHistory {
    records: Vec<DiagnosisRecord>,
}

impl DiagnosisHistory {
    /// Records a run and returns the stored copy.
    pub fn append(
        &mut self,
        answers: Vec<u8>,
        scores: DiagnosisScores,
        timestamp: DateTime<Utc>,
    ) -> DiagnosisRecord {
        let record = DiagnosisRecord {
            id: format!("diag-{:04}", self.records.len() + 1),
            timestamp,
            answers,
            scores,
        };
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[DiagnosisRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&DiagnosisRecord> {
        self.records.last()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Score change from the first run to the latest. `None` until there are two runs.
    pub fn progress(&self) -> Option<ScoreProgress> {
        let (first, latest) = match (self.records.first(), self.records.last()) {
            (Some(first), Some(latest)) if self.records.len() > 1 => (first, latest),
            _ => return None,
        };

        let delta = |from: u8, to: u8| i16::from(to) - i16::from(from);

        Some(ScoreProgress {
            runs: self.records.len(),
            global_delta: delta(first.scores.global, latest.scores.global),
            domain_deltas: Domain::ordered()
                .into_iter()
                .map(|domain| DomainDelta {
                    domain,
                    delta: delta(first.scores.domain(domain), latest.scores.domain(domain)),
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainDelta {
    pub domain: Domain,
    pub delta: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreProgress {
    pub runs: usize,
    pub global_delta: i16,
    pub domain_deltas: Vec<DomainDelta>,
}

/// Everything a results view needs after a quiz run.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisOutcome {
    pub record: DiagnosisRecord,
    pub accelerator: Domain,
    pub accelerator_label: &'static str,
    pub plan: ActionPlan,
}

impl DiagnosisOutcome {
    pub fn new(record: DiagnosisRecord, accelerator: Domain) -> Self {
        Self {
            record,
            accelerator,
            accelerator_label: accelerator.label(),
            plan: ActionPlan::for_domain(accelerator),
        }
    }

    pub fn scores(&self) -> &DiagnosisScores {
        &self.record.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::diagnosis::scoring::compute_scores;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let mut history = DiagnosisHistory::default();
        let first = history.append(vec![0; 17], compute_scores(&[0; 17]), at(8));
        let second = history.append(vec![3; 17], compute_scores(&[3; 17]), at(9));

        assert_eq!(first.id, "diag-0001");
        assert_eq!(second.id, "diag-0002");
        assert_eq!(history.latest(), Some(&second));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn progress_needs_two_runs() {
        let mut history = DiagnosisHistory::default();
        history.append(vec![3; 17], compute_scores(&[3; 17]), at(8));
        assert!(history.progress().is_none());

        history.append(vec![0; 17], compute_scores(&[0; 17]), at(9));
        let progress = history.progress().expect("two runs recorded");
        assert_eq!(progress.runs, 2);
        assert_eq!(progress.global_delta, 80);
        assert!(progress.domain_deltas.iter().all(|entry| entry.delta == 80));
    }

    #[test]
    fn history_serializes_as_plain_list() {
        let mut history = DiagnosisHistory::default();
        history.append(vec![1, 2], compute_scores(&[1, 2]), at(8));
        let json = serde_json::to_value(&history).expect("serializes");
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "diag-0001");
        assert_eq!(json[0]["scores"]["energia"], 70);
    }
}
