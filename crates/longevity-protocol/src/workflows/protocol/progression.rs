use super::domain::ProtocolDay;
use serde::{Deserialize, Serialize};

/// Day the user lands on right after finishing the quiz.
pub const FIRST_PROTOCOL_DAY: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgressionState {
    pub current_day: u32,
}

impl Default for UserProgressionState {
    fn default() -> Self {
        Self { current_day: 1 }
    }
}

impl UserProgressionState {
    /// Moves forward to `day` if it is ahead of the current day. Never moves back.
    pub fn advance_to(&mut self, day: u32) -> bool {
        if day > self.current_day {
            self.current_day = day;
            true
        } else {
            false
        }
    }
}

pub fn advance_to_next_day(current_day: u32) -> u32 {
    current_day.saturating_add(1)
}

/// Outcome of the day-navigation check. A redirect is a UX nudge only; it is
/// not an access control decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum DayAccess {
    Allowed { day: u32 },
    Redirect { requested: u32, to: u32, notice: String },
    /// No diagnosis yet; day 1 is the quiz itself.
    Diagnosis { requested: u32, notice: String },
}

impl DayAccess {
    /// Day the user ends up on. The quiz counts as day 1.
    pub fn day(&self) -> u32 {
        match self {
            Self::Allowed { day } => *day,
            Self::Redirect { to, .. } => *to,
            Self::Diagnosis { .. } => 1,
        }
    }

    pub fn is_redirect(&self) -> bool {
        !matches!(self, Self::Allowed { .. })
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Allowed { .. } => None,
            Self::Redirect { notice, .. } | Self::Diagnosis { notice, .. } => Some(notice.as_str()),
        }
    }
}

/// Highest day with saved progress. The diagnosis counts as day 1.
pub fn last_completed_day(days: &[ProtocolDay], has_diagnosis: bool) -> u32 {
    let saved = days.iter().map(|day| day.day_number).max().unwrap_or(0);
    let diagnosis = u32::from(has_diagnosis);
    saved.max(diagnosis)
}

/// Checks whether `requested` may be opened given the saved days. Without a
/// diagnosis every request points back to the quiz.
pub fn check_day_access(requested: u32, days: &[ProtocolDay], has_diagnosis: bool) -> DayAccess {
    if !has_diagnosis {
        return DayAccess::Diagnosis {
            requested,
            notice: "Complete the diagnosis quiz to start the protocol.".to_string(),
        };
    }

    if requested < FIRST_PROTOCOL_DAY {
        return DayAccess::Redirect {
            requested,
            to: FIRST_PROTOCOL_DAY,
            notice: format!(
                "Day 1 is the diagnosis. Protocol check-ins start at day {FIRST_PROTOCOL_DAY}."
            ),
        };
    }

    let next_open = advance_to_next_day(last_completed_day(days, has_diagnosis));
    if requested > next_open {
        return DayAccess::Redirect {
            requested,
            to: next_open,
            notice: format!("Day {requested} is not available yet. Continue with day {next_open}."),
        };
    }

    DayAccess::Allowed { day: requested }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(day_number: u32) -> ProtocolDay {
        ProtocolDay {
            day_number,
            tasks: Vec::new(),
            energy_rating: 5,
            mood_rating: 5,
            compliance: 0,
        }
    }

    #[test]
    fn advance_is_exactly_one_day() {
        assert_eq!(advance_to_next_day(1), 2);
        assert_eq!(advance_to_next_day(9), 10);
        assert_eq!(advance_to_next_day(u32::MAX), u32::MAX);
    }

    #[test]
    fn state_advance_is_idempotent_for_same_target() {
        let mut state = UserProgressionState::default();
        assert!(state.advance_to(advance_to_next_day(1)));
        assert!(!state.advance_to(advance_to_next_day(1)));
        assert_eq!(state.current_day, 2);
        assert!(!state.advance_to(1));
        assert_eq!(state.current_day, 2);
    }

    #[test]
    fn fresh_user_is_sent_to_the_quiz() {
        for requested in [0, 1, 2, 3] {
            let access = check_day_access(requested, &[], false);
            assert!(matches!(access, DayAccess::Diagnosis { .. }), "day {requested}");
            assert!(access.is_redirect());
            assert_eq!(access.day(), 1);
            assert!(access.notice().is_some_and(|notice| notice.contains("quiz")));
        }
    }

    #[test]
    fn diagnosis_unlocks_day_two() {
        assert_eq!(check_day_access(2, &[], true), DayAccess::Allowed { day: 2 });
        assert_eq!(check_day_access(3, &[], true).day(), 2);
    }

    #[test]
    fn saved_days_unlock_the_following_day() {
        let days = vec![saved(2), saved(3)];
        assert_eq!(check_day_access(4, &days, true), DayAccess::Allowed { day: 4 });
        assert_eq!(check_day_access(2, &days, true), DayAccess::Allowed { day: 2 });

        match check_day_access(7, &days, true) {
            DayAccess::Redirect {
                requested,
                to,
                notice,
            } => {
                assert_eq!(requested, 7);
                assert_eq!(to, 4);
                assert!(notice.contains("day 4"));
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn days_before_the_protocol_redirect_to_first_protocol_day() {
        assert_eq!(check_day_access(0, &[saved(2)], true).day(), FIRST_PROTOCOL_DAY);
        match check_day_access(1, &[], true) {
            DayAccess::Redirect { requested, to, .. } => {
                assert_eq!(requested, 1);
                assert_eq!(to, FIRST_PROTOCOL_DAY);
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn diagnosis_access_serializes_with_its_tag() {
        let value = serde_json::to_value(check_day_access(1, &[], false)).expect("serializes");
        assert_eq!(value["access"], "diagnosis");
        assert_eq!(value["requested"], 1);
    }
}
