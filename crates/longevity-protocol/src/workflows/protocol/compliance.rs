use super::domain::{ProtocolTask, TaskStatus};

/// Percentage of the day's tasks done, with half credit for partial tasks,
/// rounded half up. A day without tasks is 0.
pub fn compliance(tasks: &[ProtocolTask]) -> u8 {
    compliance_of(tasks.iter().map(|task| task.status))
}

pub fn compliance_of<I>(statuses: I) -> u8
where
    I: IntoIterator<Item = TaskStatus>,
{
    let (half_credits, count) = statuses
        .into_iter()
        .fold((0u32, 0u32), |(credits, count), status| {
            (credits + status.half_credits(), count + 1)
        });

    if count == 0 {
        return 0;
    }

    // 100 * (half_credits / 2) / count, rounded half up.
    ((half_credits * 100 + count) / (count * 2)) as u8
}
