use super::compliance::compliance;
use super::domain::{
    clamp_rating, ProtocolDay, ProtocolError, ProtocolTask, TaskStatus, DEFAULT_RATING,
};
use serde::Serialize;

/// In-memory editing session for one day's check-in. Nothing is persisted
/// until the caller saves the snapshot returned by [`DayCheckIn::to_day`].
#[derive(Debug, Clone)]
pub struct DayCheckIn {
    day_number: u32,
    tasks: Vec<ProtocolTask>,
    energy_rating: u8,
    mood_rating: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInTaskView {
    pub id: String,
    pub status: TaskStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInView {
    pub day_number: u32,
    pub tasks: Vec<CheckInTaskView>,
    pub energy_rating: u8,
    pub mood_rating: u8,
    pub compliance: u8,
}

impl DayCheckIn {
    /// Fresh check-in with every task pending and neutral ratings.
    pub fn new<I, T>(day_number: u32, task_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            day_number,
            tasks: task_ids.into_iter().map(ProtocolTask::pending).collect(),
            energy_rating: DEFAULT_RATING,
            mood_rating: DEFAULT_RATING,
        }
    }

    /// Reopens a saved day for further edits.
    pub fn resume(day: ProtocolDay) -> Self {
        Self {
            day_number: day.day_number,
            tasks: day.tasks,
            energy_rating: clamp_rating(day.energy_rating),
            mood_rating: clamp_rating(day.mood_rating),
        }
    }

    pub fn day_number(&self) -> u32 {
        self.day_number
    }

    pub fn tasks(&self) -> &[ProtocolTask] {
        &self.tasks
    }

    pub fn energy_rating(&self) -> u8 {
        self.energy_rating
    }

    pub fn mood_rating(&self) -> u8 {
        self.mood_rating
    }

    pub fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), ProtocolError> {
        let task = self.task_mut(task_id)?;
        task.status = status;
        Ok(())
    }

    /// Advances a task to the next status in toggle order and returns it.
    pub fn cycle_status(&mut self, task_id: &str) -> Result<TaskStatus, ProtocolError> {
        let task = self.task_mut(task_id)?;
        task.status = task.status.next();
        Ok(task.status)
    }

    pub fn set_energy(&mut self, rating: u8) {
        self.energy_rating = clamp_rating(rating);
    }

    pub fn set_mood(&mut self, rating: u8) {
        self.mood_rating = clamp_rating(rating);
    }

    /// Recomputed from the current task list on every call.
    pub fn compliance(&self) -> u8 {
        compliance(&self.tasks)
    }

    pub fn to_day(&self) -> ProtocolDay {
        ProtocolDay {
            day_number: self.day_number,
            tasks: self.tasks.clone(),
            energy_rating: self.energy_rating,
            mood_rating: self.mood_rating,
            compliance: self.compliance(),
        }
    }

    pub fn to_view(&self) -> CheckInView {
        CheckInView {
            day_number: self.day_number,
            tasks: self
                .tasks
                .iter()
                .map(|task| CheckInTaskView {
                    id: task.id.clone(),
                    status: task.status,
                    status_label: task.status.label(),
                })
                .collect(),
            energy_rating: self.energy_rating,
            mood_rating: self.mood_rating,
            compliance: self.compliance(),
        }
    }

    fn task_mut(&mut self, task_id: &str) -> Result<&mut ProtocolTask, ProtocolError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| ProtocolError::TaskNotFound(task_id.to_owned()))
    }
}
