//! Reward scaling
//!
//! Computes XP, skill and item payouts from a reward template, the player's
//! level and the bonus conditions they satisfied. Never mutates player
//! state; the caller persists the payout.

pub mod drops;
pub mod scaling;
pub mod tiers;

pub use drops::{roll_item_drops, scale_reward_with_drops, ItemDrop, ItemGrant};
pub use scaling::{scale_reward, BonusCondition, RewardPayout, RewardTemplate, SkillReward};
pub use tiers::{EARLY_COMPLETION, FIRST_OF_DAY, PERFECT_FOCUS, STANDARD_BONUSES, STREAK};
