//! Daily protocol check-ins, compliance and day progression.

pub mod checkin;
pub mod compliance;
pub mod domain;
pub mod progression;
pub mod summary;

pub use checkin::{CheckInView, DayCheckIn};
pub use compliance::{compliance, compliance_of};
pub use domain::{upsert_day, ProtocolDay, ProtocolError, ProtocolTask, TaskStatus};
pub use progression::{
    advance_to_next_day, check_day_access, DayAccess, UserProgressionState, FIRST_PROTOCOL_DAY,
};
pub use summary::{export_days_csv, ComplianceLevel, ProtocolSummary};
