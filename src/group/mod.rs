//! Group (family) variant: skill pairing, traditions, pooled quests

pub mod generation;
pub mod pairing;
pub mod profile;
pub mod tradition;

pub use generation::{generate_group_quests, pooled_group_quest, pooled_snapshot};
pub use pairing::{find_complementary_pairs, skill_sharing_quest, skill_sharing_reward, SkillPair};
pub use profile::{GroupProfile, Member, Tradition};
pub use tradition::{days_since_celebrated, is_due, tradition_quest};
