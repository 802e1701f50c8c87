//! Questforge - quest and reward recommendation engine
//!
//! Turns a snapshot of a user's skill history into a tailored quest:
//! behavioral analysis, parameter synthesis, template matching, text
//! interpolation and level-scaled rewards. Everything is a pure function
//! of its inputs plus an injected random source.

pub mod activity;
pub mod analysis;
pub mod core;
pub mod group;
pub mod quest;
pub mod relevance;
pub mod rewards;
pub mod synthesis;
pub mod templates;
