//! Reward scaling by player level and bonus conditions
//!
//! XP grows geometrically every ten levels; skill rewards grow with the
//! square root of that factor so they lag behind XP at high level.

use crate::core::error::{EngineError, Result};
use crate::core::types::SkillId;
use crate::rewards::drops::{ItemDrop, ItemGrant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Levels per scaling step
pub const LEVELS_PER_STEP: u32 = 10;

/// Extra multiplier earned when a named condition is satisfied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusCondition {
    pub key: String,
    pub multiplier: f64,
}

impl BonusCondition {
    pub fn new(key: impl Into<String>, multiplier: f64) -> Self {
        Self {
            key: key.into(),
            multiplier,
        }
    }
}

/// Fixed skill points granted alongside XP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillReward {
    pub skill: SkillId,
    pub amount: u32,
}

/// Static reward definition for a difficulty tier or special quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTemplate {
    pub base_xp: u32,
    pub scaling_factor: f64,
    #[serde(default)]
    pub min_level: u32,
    #[serde(default)]
    pub max_level: Option<u32>,
    #[serde(default)]
    pub bonus_conditions: Vec<BonusCondition>,
    #[serde(default)]
    pub skill_rewards: Vec<SkillReward>,
    #[serde(default)]
    pub item_drops: Vec<ItemDrop>,
}

impl RewardTemplate {
    pub fn new(base_xp: u32, scaling_factor: f64) -> Self {
        Self {
            base_xp,
            scaling_factor,
            min_level: 0,
            max_level: None,
            bonus_conditions: Vec::new(),
            skill_rewards: Vec::new(),
            item_drops: Vec::new(),
        }
    }

    pub fn with_min_level(mut self, level: u32) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level = Some(level);
        self
    }

    pub fn with_bonus(mut self, key: impl Into<String>, multiplier: f64) -> Self {
        self.bonus_conditions.push(BonusCondition::new(key, multiplier));
        self
    }

    pub fn with_skill_reward(mut self, skill: SkillId, amount: u32) -> Self {
        self.skill_rewards.push(SkillReward { skill, amount });
        self
    }

    pub fn with_drop(mut self, drop: ItemDrop) -> Self {
        self.item_drops.push(drop);
        self
    }

    /// `scaling_factor ^ floor(level / 10)`, with level capped at `max_level`
    pub fn level_scale(&self, level: u32) -> f64 {
        let effective = self.max_level.map_or(level, |max| level.min(max));
        let steps = (effective / LEVELS_PER_STEP).min(i32::MAX as u32) as i32;
        self.scaling_factor.powi(steps)
    }

    /// `1 + sum of satisfied bonus multipliers`, never below zero
    pub fn bonus_multiplier<S: AsRef<str>>(&self, satisfied: &[S]) -> f64 {
        let bonus: f64 = self
            .bonus_conditions
            .iter()
            .filter(|c| satisfied.iter().any(|s| s.as_ref() == c.key))
            .map(|c| c.multiplier)
            .sum();
        (1.0 + bonus).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scaling_factor.is_finite() || self.scaling_factor <= 0.0 {
            return Err(EngineError::validation(
                "scaling_factor",
                format!("must be a positive number, got {}", self.scaling_factor),
            ));
        }
        if let Some(max) = self.max_level {
            if max < self.min_level {
                return Err(EngineError::validation(
                    "max_level",
                    format!("({}) should be >= min_level ({})", max, self.min_level),
                ));
            }
        }
        if let Some(c) = self.bonus_conditions.iter().find(|c| !c.multiplier.is_finite()) {
            return Err(EngineError::validation(
                format!("bonus_conditions[{}]", c.key),
                "multiplier must be finite",
            ));
        }
        for drop in &self.item_drops {
            drop.validate()?;
        }
        Ok(())
    }
}

/// Final payout for one quest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardPayout {
    pub xp: u64,
    #[serde(default)]
    pub skill_rewards: BTreeMap<SkillId, u32>,
    #[serde(default)]
    pub items: Vec<ItemGrant>,
    pub level_scale: f64,
    pub multiplier: f64,
}

impl RewardPayout {
    /// Nothing granted (player below the template's minimum level)
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.xp == 0 && self.skill_rewards.is_empty() && self.items.is_empty()
    }
}

fn round_non_negative(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Deterministic XP and skill payout; item drops are rolled separately
pub fn scale_reward<S: AsRef<str>>(template: &RewardTemplate, level: u32, satisfied: &[S]) -> RewardPayout {
    if level < template.min_level {
        tracing::trace!(level, min_level = template.min_level, "below minimum level, no reward");
        return RewardPayout::zero();
    }

    let level_scale = template.level_scale(level);
    let multiplier = template.bonus_multiplier(satisfied);
    let xp = round_non_negative(template.base_xp as f64 * level_scale * multiplier);

    let skill_scale = level_scale.sqrt();
    let skill_rewards = template
        .skill_rewards
        .iter()
        .map(|r| {
            let amount = round_non_negative(r.amount as f64 * skill_scale).min(u32::MAX as u64);
            (r.skill.clone(), amount as u32)
        })
        .collect();

    RewardPayout {
        xp,
        skill_rewards,
        items: Vec::new(),
        level_scale,
        multiplier,
    }
}
