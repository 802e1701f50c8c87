//! Parameter synthesis: behavioral profile -> target quest parameters

pub mod parameters;

pub use parameters::{
    difficulty_for_rate, priority_skills, synthesize_parameters, QuestParameters, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
