pub mod diagnosis;
pub mod engine;
pub mod protocol;

pub use engine::{DayOpening, EngineError, EngineOptions, ProtocolEngine, ScoreReport};
