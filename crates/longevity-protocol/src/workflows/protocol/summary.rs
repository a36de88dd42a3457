use super::domain::{ProtocolDay, TaskStatus};
use super::progression::UserProgressionState;
use crate::workflows::diagnosis::{
    AcceleratorPolicy, DiagnosisHistory, Domain, ScoreProgress,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    OnTrack,
    Building,
    NeedsAttention,
}

impl ComplianceLevel {
    pub fn from_compliance(compliance: u8) -> Self {
        if compliance >= 80 {
            Self::OnTrack
        } else if compliance >= 50 {
            Self::Building
        } else {
            Self::NeedsAttention
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::Building => "Building",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayEntry {
    pub day_number: u32,
    pub compliance: u8,
    pub level: ComplianceLevel,
    pub level_label: &'static str,
    pub energy_rating: u8,
    pub mood_rating: u8,
}

/// Dashboard view over the stored diagnosis history and check-ins.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolSummary {
    pub current_day: u32,
    pub days_logged: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_compliance: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_energy: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_mood: Option<f32>,
    pub streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_global_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_progress: Option<ScoreProgress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DayEntry>,
}

impl ProtocolSummary {
    pub fn build(
        progression: UserProgressionState,
        days: &[ProtocolDay],
        history: &DiagnosisHistory,
        policy: &AcceleratorPolicy,
    ) -> Self {
        let mut ordered: Vec<&ProtocolDay> = days.iter().collect();
        ordered.sort_by_key(|day| day.day_number);

        let days_logged = ordered.len();
        let average = |pick: fn(&ProtocolDay) -> u8| {
            if days_logged == 0 {
                None
            } else {
                let total: u32 = ordered.iter().map(|day| u32::from(pick(day))).sum();
                Some(total as f32 / days_logged as f32)
            }
        };

        let average_compliance = average(|day| day.compliance).map(|value| value.round() as u8);
        let average_energy = average(|day| day.energy_rating).map(round_one_decimal);
        let average_mood = average(|day| day.mood_rating).map(round_one_decimal);

        // Earliest day wins when several share the top compliance.
        let best_day = ordered
            .iter()
            .fold(None::<&ProtocolDay>, |best, day| match best {
                Some(current) if current.compliance >= day.compliance => Some(current),
                _ => Some(*day),
            })
            .map(|day| day.day_number);

        let latest = history.latest();

        Self {
            current_day: progression.current_day,
            days_logged,
            average_compliance,
            average_energy,
            average_mood,
            streak: streak(&ordered),
            best_day,
            latest_global_score: latest.map(|record| record.scores.global),
            accelerator: latest.map(|record| policy.select(&record.scores)),
            score_progress: history.progress(),
            days: ordered
                .iter()
                .map(|day| {
                    let level = ComplianceLevel::from_compliance(day.compliance);
                    DayEntry {
                        day_number: day.day_number,
                        compliance: day.compliance,
                        level,
                        level_label: level.label(),
                        energy_rating: day.energy_rating,
                        mood_rating: day.mood_rating,
                    }
                })
                .collect(),
        }
    }
}

/// Consecutive logged days ending at the latest logged day. `ordered` is sorted
/// by day number with no duplicates.
fn streak(ordered: &[&ProtocolDay]) -> u32 {
    let mut streak = 0;
    let mut expected = None;

    for day in ordered.iter().rev() {
        match expected {
            Some(number) if day.day_number != number => break,
            _ => {}
        }
        streak += 1;
        expected = day.day_number.checked_sub(1);
        if expected.is_none() {
            break;
        }
    }

    streak
}

fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Serialize)]
struct DayCsvRow {
    day: u32,
    compliance: u8,
    energy: u8,
    mood: u8,
    completed: usize,
    partial: usize,
    not_done: usize,
    pending: usize,
}

/// Writes one CSV row per saved day, ordered by day number.
pub fn export_days_csv<W: Write>(days: &[ProtocolDay], writer: W) -> Result<(), csv::Error> {
    let mut ordered: Vec<&ProtocolDay> = days.iter().collect();
    ordered.sort_by_key(|day| day.day_number);

    let mut csv_writer = csv::Writer::from_writer(writer);
    for day in ordered {
        csv_writer.serialize(DayCsvRow {
            day: day.day_number,
            compliance: day.compliance,
            energy: day.energy_rating,
            mood: day.mood_rating,
            completed: day.count(TaskStatus::Completed),
            partial: day.count(TaskStatus::Partial),
            not_done: day.count(TaskStatus::NotDone),
            pending: day.count(TaskStatus::Pending),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::diagnosis::compute_scores;
    use crate::workflows::protocol::domain::ProtocolTask;
    use chrono::{TimeZone, Utc};

    fn day(day_number: u32, compliance: u8, energy: u8, mood: u8) -> ProtocolDay {
        ProtocolDay {
            day_number,
            tasks: vec![ProtocolTask {
                id: "action-1".to_string(),
                status: if compliance == 100 {
                    TaskStatus::Completed
                } else {
                    TaskStatus::NotDone
                },
            }],
            energy_rating: energy,
            mood_rating: mood,
            compliance,
        }
    }

    #[test]
    fn empty_state_summarizes_without_averages() {
        let summary = ProtocolSummary::build(
            UserProgressionState::default(),
            &[],
            &DiagnosisHistory::default(),
            &AcceleratorPolicy::default(),
        );
        assert_eq!(summary.current_day, 1);
        assert_eq!(summary.days_logged, 0);
        assert!(summary.average_compliance.is_none());
        assert_eq!(summary.streak, 0);
        assert!(summary.accelerator.is_none());
    }

    #[test]
    fn averages_streak_and_best_day() {
        let days = vec![day(5, 100, 8, 7), day(2, 0, 4, 5), day(4, 50, 6, 6)];
        let mut history = DiagnosisHistory::default();
        let mut answers = vec![0; 17];
        answers[4] = 3;
        let timestamp = Utc
            .with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        history.append(answers.clone(), compute_scores(&answers), timestamp);

        let summary = ProtocolSummary::build(
            UserProgressionState { current_day: 6 },
            &days,
            &history,
            &AcceleratorPolicy::default(),
        );

        assert_eq!(summary.days_logged, 3);
        assert_eq!(summary.average_compliance, Some(50));
        assert_eq!(summary.average_energy, Some(6.0));
        assert_eq!(summary.average_mood, Some(6.0));
        assert_eq!(summary.streak, 2);
        assert_eq!(summary.best_day, Some(5));
        assert_eq!(summary.accelerator, Some(Domain::Sleep));
        assert_eq!(summary.days[0].day_number, 2);
        assert_eq!(summary.days[0].level_label, "Needs Attention");
        assert_eq!(summary.days[2].level, ComplianceLevel::OnTrack);
    }

    #[test]
    fn csv_export_orders_days() {
        let days = vec![day(3, 100, 7, 8), day(2, 0, 3, 4)];
        let mut buffer = Vec::new();
        export_days_csv(&days, &mut buffer).expect("csv writes");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "day,compliance,energy,mood,completed,partial,not_done,pending"
        );
        assert_eq!(lines[1], "2,0,3,4,0,0,1,0");
        assert_eq!(lines[2], "3,100,7,8,1,0,0,0");
    }
}
