//! Static reward tiers, one per quest difficulty

use crate::rewards::drops::ItemDrop;
use crate::rewards::scaling::RewardTemplate;

/// Completed on consecutive days
pub const STREAK: &str = "streak";
/// Completed before the time estimate ran out
pub const EARLY_COMPLETION: &str = "early_completion";
/// Reported full focus for the whole session
pub const PERFECT_FOCUS: &str = "perfect_focus";
/// First quest completed that day
pub const FIRST_OF_DAY: &str = "first_of_day";

struct TierSpec {
    base_xp: u32,
    scaling_factor: f64,
    min_level: u32,
    drop: (&'static str, f64),
}

/// Indexed by difficulty - 1
const TIERS: [TierSpec; 5] = [
    TierSpec { base_xp: 50, scaling_factor: 1.1, min_level: 0, drop: ("streak_token", 0.05) },
    TierSpec { base_xp: 100, scaling_factor: 1.15, min_level: 0, drop: ("streak_token", 0.10) },
    TierSpec { base_xp: 150, scaling_factor: 1.2, min_level: 0, drop: ("focus_crystal", 0.15) },
    TierSpec { base_xp: 250, scaling_factor: 1.25, min_level: 5, drop: ("rare_badge", 0.20) },
    TierSpec { base_xp: 400, scaling_factor: 1.3, min_level: 10, drop: ("legendary_badge", 0.25) },
];

/// Bonus conditions shared by every tier
pub const STANDARD_BONUSES: [(&str, f64); 4] = [
    (STREAK, 0.25),
    (EARLY_COMPLETION, 0.15),
    (PERFECT_FOCUS, 0.2),
    (FIRST_OF_DAY, 0.1),
];

impl RewardTemplate {
    /// Reward template for a quest difficulty (clamped to 1-5)
    pub fn for_difficulty(difficulty: u8) -> Self {
        let spec = &TIERS[difficulty.clamp(1, 5) as usize - 1];
        let mut template = RewardTemplate::new(spec.base_xp, spec.scaling_factor)
            .with_min_level(spec.min_level)
            .with_drop(ItemDrop::new(spec.drop.0, spec.drop.1, 1));
        for (key, multiplier) in STANDARD_BONUSES {
            template = template.with_bonus(key, multiplier);
        }
        template
    }
}
