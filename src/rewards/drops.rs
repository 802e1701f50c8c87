//! Probabilistic item drops
//!
//! Rolls always come from a caller-supplied RNG so seeded runs reproduce.

use crate::core::error::{EngineError, Result};
use crate::rewards::scaling::{scale_reward, RewardPayout, RewardTemplate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One possible drop on a reward template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub item: String,
    /// Probability in [0, 1]
    pub chance: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ItemDrop {
    pub fn new(item: impl Into<String>, chance: f64, quantity: u32) -> Self {
        Self {
            item: item.into(),
            chance,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.chance.is_finite() || !(0.0..=1.0).contains(&self.chance) {
            return Err(EngineError::validation(
                format!("item_drops[{}].chance", self.item),
                format!("must be within 0-1, got {}", self.chance),
            ));
        }
        if self.quantity == 0 {
            return Err(EngineError::validation(
                format!("item_drops[{}].quantity", self.item),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// An item actually granted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub item: String,
    pub quantity: u32,
}

/// Roll every drop independently; nothing drops below `min_level`
pub fn roll_item_drops<R: Rng + ?Sized>(
    template: &RewardTemplate,
    level: u32,
    rng: &mut R,
) -> Vec<ItemGrant> {
    if level < template.min_level {
        return Vec::new();
    }

    template
        .item_drops
        .iter()
        .filter(|drop| {
            let p = if drop.chance.is_finite() {
                drop.chance.clamp(0.0, 1.0)
            } else {
                0.0
            };
            rng.gen_bool(p)
        })
        .map(|drop| ItemGrant {
            item: drop.item.clone(),
            quantity: drop.quantity,
        })
        .collect()
}

/// XP, skill rewards and rolled item drops together
pub fn scale_reward_with_drops<S: AsRef<str>, R: Rng + ?Sized>(
    template: &RewardTemplate,
    level: u32,
    satisfied: &[S],
    rng: &mut R,
) -> RewardPayout {
    let mut payout = scale_reward(template, level, satisfied);
    payout.items = roll_item_drops(template, level, rng);
    if !payout.items.is_empty() {
        tracing::debug!(items = payout.items.len(), "item drops granted");
    }
    payout
}
