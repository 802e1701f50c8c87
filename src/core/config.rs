//! Engine configuration with documented constants
//!
//! All thresholds, windows and weights used by the recommendation engine are
//! collected here with explanations of what they control.

use crate::core::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the recommendation engine
///
/// Defaults reproduce the tuned production behavior. The config is passed by
/// reference into every operation; the engine keeps no copy between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === PATTERN ANALYSIS ===
    /// Number of most recent activities considered for growth rate
    ///
    /// Older sessions say little about the current trajectory.
    pub growth_window: usize,

    /// Number of most recent metric entries fed to relevance prediction
    pub metric_window: usize,

    /// Consistency below this flags the "consistency" challenge
    pub consistency_threshold: f64,

    /// Growth rate below this flags the "growth" challenge
    pub growth_threshold: f64,

    /// Focus (on the 1-5 scale) below this flags the "focus" challenge
    pub focus_threshold: u8,

    /// Total practice minutes below this flags the "commitment" challenge
    pub commitment_minutes: u32,

    // === PARAMETER SYNTHESIS ===
    /// Maximum number of skills a quest is aligned with
    pub max_aligned_skills: usize,

    /// Shortest quest the synthesizer will ask for (minutes)
    pub min_quest_minutes: u32,

    /// Longest quest the synthesizer will ask for (minutes)
    pub max_quest_minutes: u32,

    /// Completion rate above which difficulty is pushed up
    ///
    /// Together with `low_completion_rate` this brackets the ~70% completion
    /// equilibrium the difficulty curve aims for.
    pub high_completion_rate: f64,

    /// Completion rate below which difficulty is pulled down
    pub low_completion_rate: f64,

    // === TEMPLATE MATCHING ===
    /// Largest difficulty gap a template may have and still be compatible
    pub difficulty_tolerance: u8,

    /// Largest time estimate gap (minutes)
    pub time_tolerance_minutes: u32,

    /// Largest energy gap (0-1 scale)
    pub energy_tolerance: f64,

    /// Largest focus gap (1-5 scale)
    pub focus_tolerance: u8,

    // === RELEVANCE PREDICTION ===
    /// Confidence added when the user is usually active at the current hour
    pub active_time_weight: f64,

    /// Confidence added when the quest's category has positive logged value
    pub category_weight: f64,

    /// Confidence added when the quest already has progress
    pub progress_weight: f64,

    /// Maximum number of suggestions returned
    pub max_suggestions: usize,

    // === GROUP QUESTS ===
    /// Base XP for a skill-sharing quest
    pub skill_sharing_xp: u32,

    /// Skill points granted to the shared skill
    pub skill_sharing_bonus: u32,

    /// Upper bound on skill-sharing quests produced per call
    pub max_skill_sharing_quests: usize,

    /// Members listed as required participants on a generic group quest
    pub required_group_participants: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Analysis windows and challenge thresholds
            growth_window: 10,
            metric_window: 20,
            consistency_threshold: 0.3,
            growth_threshold: 0.1,
            focus_threshold: 3,
            commitment_minutes: 60,

            // Synthesis
            max_aligned_skills: 3,
            min_quest_minutes: 15,
            max_quest_minutes: 60,
            high_completion_rate: 0.8,
            low_completion_rate: 0.6,

            // Matching tolerances
            difficulty_tolerance: 1,
            time_tolerance_minutes: 15,
            energy_tolerance: 0.3,
            focus_tolerance: 1,

            // Relevance (weights sum to 1.0)
            active_time_weight: 0.3,
            category_weight: 0.4,
            progress_weight: 0.3,
            max_suggestions: 3,

            // Group
            skill_sharing_xp: 150,
            skill_sharing_bonus: 20,
            max_skill_sharing_quests: 3,
            required_group_participants: 2,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| EngineError::CatalogParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.growth_window < 2 {
            return Err(EngineError::validation(
                "growth_window",
                format!("needs at least 2 activities, got {}", self.growth_window),
            ));
        }

        if self.max_aligned_skills == 0 || self.max_aligned_skills > 3 {
            return Err(EngineError::validation(
                "max_aligned_skills",
                format!("must be in 1..=3, got {}", self.max_aligned_skills),
            ));
        }

        if self.min_quest_minutes > self.max_quest_minutes {
            return Err(EngineError::validation(
                "min_quest_minutes",
                format!(
                    "({}) should be <= max_quest_minutes ({})",
                    self.min_quest_minutes, self.max_quest_minutes
                ),
            ));
        }

        // Bands should be ordered
        if self.low_completion_rate >= self.high_completion_rate {
            return Err(EngineError::validation(
                "low_completion_rate",
                format!(
                    "({}) should be < high_completion_rate ({})",
                    self.low_completion_rate, self.high_completion_rate
                ),
            ));
        }

        let weights = [
            ("active_time_weight", self.active_time_weight),
            ("category_weight", self.category_weight),
            ("progress_weight", self.progress_weight),
            ("energy_tolerance", self.energy_tolerance),
            ("consistency_threshold", self.consistency_threshold),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::validation(
                    field,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        Ok(())
    }
}
