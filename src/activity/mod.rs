//! Activity tracking input model
//!
//! Users log practice sessions against skills. The engine only ever reads
//! these snapshots; persistence belongs to the caller.

pub mod metrics;
pub mod skill;
pub mod snapshot;

pub use metrics::{ActivityMetrics, MetricEntry};
pub use skill::{focus_to_level, ActivityRecord, Skill, SkillProgress};
pub use snapshot::{QuestLogEntry, UserSnapshot};
