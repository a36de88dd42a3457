use super::domain::Domain;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanAction {
    pub title: &'static str,
    pub description: &'static str,
    pub rationale: &'static str,
}

/// Three authored actions targeting one domain. `domain` is `None` for the
/// generic fallback plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub domain: Option<Domain>,
    pub actions: [PlanAction; 3],
}

impl ActionPlan {
    pub fn for_domain(domain: Domain) -> Self {
        let actions = match domain {
            Domain::Energy => [
                PlanAction {
                    title: "Morning light walk",
                    description: "Spend ten minutes outdoors within an hour of waking.",
                    rationale: "Early daylight anchors the circadian rhythm that drives daytime alertness.",
                },
                PlanAction {
                    title: "Caffeine cut-off at 14:00",
                    description: "Move every coffee or tea before two in the afternoon.",
                    rationale: "Late caffeine masks fatigue and borrows energy from the following day.",
                },
                PlanAction {
                    title: "Movement snack",
                    description: "Do five minutes of brisk movement after lunch.",
                    rationale: "Short activity blunts the post-meal glucose dip behind afternoon slumps.",
                },
            ],
            Domain::Sleep => [
                PlanAction {
                    title: "Fixed wake time",
                    description: "Get up at the same time every day, weekends included.",
                    rationale: "A stable wake time is the strongest lever for consistent sleep pressure.",
                },
                PlanAction {
                    title: "Screen curfew",
                    description: "Put screens away sixty minutes before bed.",
                    rationale: "Evening light and stimulation delay melatonin release.",
                },
                PlanAction {
                    title: "Cool, dark bedroom",
                    description: "Keep the bedroom dark and around 18 degrees.",
                    rationale: "A drop in core temperature helps you fall and stay asleep.",
                },
            ],
            Domain::Nutrition => [
                PlanAction {
                    title: "Half-plate vegetables",
                    description: "Fill half of lunch and dinner plates with vegetables.",
                    rationale: "Fibre and micronutrients stabilise energy and support gut health.",
                },
                PlanAction {
                    title: "Hydration baseline",
                    description: "Drink a large glass of water with every meal.",
                    rationale: "Mild dehydration shows up as fatigue and poor concentration.",
                },
                PlanAction {
                    title: "Kitchen closes at 21:00",
                    description: "Finish the last meal at least three hours before bed.",
                    rationale: "Late eating disrupts sleep quality and overnight metabolic repair.",
                },
            ],
            Domain::Attention => [
                PlanAction {
                    title: "Single-task block",
                    description: "Work for 25 minutes on one task with notifications off.",
                    rationale: "Each context switch costs minutes of refocusing time.",
                },
                PlanAction {
                    title: "Phone out of sight",
                    description: "Keep the phone in another room during focused work.",
                    rationale: "A visible phone drains attention even when it stays silent.",
                },
                PlanAction {
                    title: "Social media window",
                    description: "Limit social apps to one 20-minute window a day.",
                    rationale: "Batching feeds removes the constant pull of variable rewards.",
                },
            ],
            Domain::PerceivedTime => [
                PlanAction {
                    title: "One novel moment",
                    description: "Do one small thing you have never done before.",
                    rationale: "Novel experiences create memories that make days feel longer.",
                },
                PlanAction {
                    title: "Protected hour",
                    description: "Block an hour in the calendar for something you enjoy.",
                    rationale: "Deliberate time ownership reduces the feeling of constant rush.",
                },
                PlanAction {
                    title: "Evening recap",
                    description: "Write three things that happened today before bed.",
                    rationale: "Reflection turns a blur of days into distinct episodes.",
                },
            ],
        };

        Self {
            domain: Some(domain),
            actions,
        }
    }

    /// Plan for a stored domain key; anything unrecognised gets the generic plan.
    pub fn for_domain_name(name: &str) -> Self {
        Domain::from_key(name)
            .map(Self::for_domain)
            .unwrap_or_else(Self::generic)
    }

    pub fn generic() -> Self {
        Self {
            domain: None,
            actions: [
                PlanAction {
                    title: "Daily walk",
                    description: "Walk for twenty minutes at a comfortable pace.",
                    rationale: "Light aerobic activity supports every wellness domain.",
                },
                PlanAction {
                    title: "Regular bedtime",
                    description: "Go to bed at the same time each night.",
                    rationale: "Consistent sleep is the base the other habits build on.",
                },
                PlanAction {
                    title: "Mindful pause",
                    description: "Take three slow breaths before each meal.",
                    rationale: "Brief pauses lower stress and sharpen attention.",
                },
            ],
        }
    }

    /// Stable task ids used by daily check-ins.
    pub fn task_ids(&self) -> Vec<String> {
        (1..=self.actions.len())
            .map(|position| format!("action-{position}"))
            .collect()
    }
}

/// Plan for the given accelerator domain.
pub fn generate_plan(domain: Domain) -> ActionPlan {
    ActionPlan::for_domain(domain)
}
