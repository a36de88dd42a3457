use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;
pub const DEFAULT_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Partial,
    NotDone,
    Completed,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Partial => "Partial",
            Self::NotDone => "Not Done",
            Self::Completed => "Completed",
        }
    }

    /// Compliance credit in half-task units: completed 2, partial 1, otherwise 0.
    pub(crate) const fn half_credits(self) -> u32 {
        match self {
            Self::Completed => 2,
            Self::Partial => 1,
            Self::Pending | Self::NotDone => 0,
        }
    }

    pub fn weight(self) -> f32 {
        self.half_credits() as f32 / 2.0
    }

    /// Toggle order used by check-in buttons.
    pub const fn next(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Partial,
            Self::Partial => Self::NotDone,
            Self::NotDone => Self::Pending,
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "not_done" | "notdone" => Some(Self::NotDone),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolTask {
    pub id: String,
    pub status: TaskStatus,
}

impl ProtocolTask {
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
        }
    }
}

/// Saved check-in for one protocol day. `compliance` is a snapshot taken at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDay {
    pub day_number: u32,
    pub tasks: Vec<ProtocolTask>,
    pub energy_rating: u8,
    pub mood_rating: u8,
    pub compliance: u8,
}

impl ProtocolDay {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|task| task.status == status).count()
    }
}

/// Replaces any saved record for the same day, then appends. One record per day survives.
pub fn upsert_day(days: &mut Vec<ProtocolDay>, day: ProtocolDay) {
    days.retain(|existing| existing.day_number != day.day_number);
    days.push(day);
}

pub fn clamp_rating(value: u8) -> u8 {
    value.clamp(MIN_RATING, MAX_RATING)
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("task with id {0} not found")]
    TaskNotFound(String),
    #[error("complete the diagnosis quiz before logging protocol days")]
    DiagnosisRequired,
    #[error("day {0} is not a protocol day; check-ins start at day 2")]
    NotAProtocolDay(u32),
}
