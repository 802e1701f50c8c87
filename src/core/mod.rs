pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Cadence, TimePeriod};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use types::{MemberId, QuestId, SkillId};
