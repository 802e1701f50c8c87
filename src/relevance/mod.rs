//! Relevance prediction: re-ranks quests the user already has

pub mod predictor;

pub use predictor::{rank_for_profile, rank_suggestions, QuestSuggestion};
