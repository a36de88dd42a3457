//! Quiz scoring, accelerator selection and action plans.

pub mod accelerator;
pub mod domain;
pub mod plan;
pub mod questions;
pub mod record;
pub mod scoring;

pub use accelerator::{select_accelerator, AcceleratorPolicy};
pub use domain::{Domain, POINTS, QUESTION_COUNT};
pub use plan::{generate_plan, ActionPlan, PlanAction};
pub use questions::{question_bank, QuizQuestion, QuizQuestionView};
pub use record::{DiagnosisHistory, DiagnosisOutcome, DiagnosisRecord, ScoreProgress};
pub use scoring::{compute_scores, DiagnosisScores, SchemeError, ScoringScheme};
