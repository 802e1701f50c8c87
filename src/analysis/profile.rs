//! Behavioral profile: the analyzer's read-only output

use crate::core::calendar::HOURS_PER_DAY;
use crate::core::types::SkillId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-hour accumulator (index = hour of day, UTC)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourHistogram([f64; HOURS_PER_DAY]);

impl Default for HourHistogram {
    fn default() -> Self {
        Self([0.0; HOURS_PER_DAY])
    }
}

impl HourHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `hour`; hours outside 0-23 wrap
    pub fn add(&mut self, hour: usize, amount: f64) {
        self.0[hour % HOURS_PER_DAY] += amount;
    }

    pub fn get(&self, hour: usize) -> f64 {
        self.0[hour % HOURS_PER_DAY]
    }

    /// Hour with the highest value; earliest hour wins ties. None when empty.
    pub fn peak_hour(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (hour, &value) in self.0.iter().enumerate() {
            if value <= 0.0 {
                continue;
            }
            match best {
                Some((_, v)) if v >= value => {}
                _ => best = Some((hour, value)),
            }
        }
        best.map(|(hour, _)| hour)
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }
}

/// Unresolved weakness flagged on a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Challenge {
    Consistency,
    Growth,
    Focus,
    Commitment,
}

impl Challenge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Challenge::Consistency => "consistency",
            Challenge::Growth => "growth",
            Challenge::Focus => "focus",
            Challenge::Commitment => "commitment",
        }
    }
}

/// Derived trajectory of one skill
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillInsight {
    /// Mean relative change between consecutive session lengths
    pub growth: f64,
    /// Distinct practice days per elapsed day; above 1 for daily practice
    /// over a short span
    pub consistency: f64,
    pub challenges: BTreeSet<Challenge>,
}

/// Summary of a user's historical activity patterns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// Hour -> number of sessions
    pub preferred_times: HourHistogram,
    /// Quest category -> share of attempted quests completed
    pub completion_rates: BTreeMap<String, f64>,
    /// Hour -> summed session minutes
    pub energy_levels: HourHistogram,
    pub skill_progress: BTreeMap<SkillId, SkillInsight>,
}

impl BehavioralProfile {
    /// Mean of all category completion rates, None when no quests were attempted
    pub fn mean_completion_rate(&self) -> Option<f64> {
        if self.completion_rates.is_empty() {
            return None;
        }
        let sum: f64 = self.completion_rates.values().sum();
        Some(sum / self.completion_rates.len() as f64)
    }

    pub fn insight(&self, skill: &SkillId) -> Option<&SkillInsight> {
        self.skill_progress.get(skill)
    }

    /// Whether any session was ever logged at `hour`
    pub fn is_active_at(&self, hour: usize) -> bool {
        self.preferred_times.get(hour) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_hour_first_max_wins() {
        let mut h = HourHistogram::new();
        h.add(9, 3.0);
        h.add(18, 3.0);
        h.add(7, 1.0);
        assert_eq!(h.peak_hour(), Some(9));
        assert_eq!(h.max(), 3.0);
    }

    #[test]
    fn test_empty_histogram_has_no_peak() {
        let h = HourHistogram::new();
        assert!(h.is_empty());
        assert_eq!(h.peak_hour(), None);
        assert_eq!(h.max(), 0.0);
    }

    #[test]
    fn test_mean_completion_rate() {
        let mut p = BehavioralProfile::default();
        assert_eq!(p.mean_completion_rate(), None);
        p.completion_rates.insert("fitness".into(), 1.0);
        p.completion_rates.insert("learning".into(), 0.5);
        assert_eq!(p.mean_completion_rate(), Some(0.75));
    }

    #[test]
    fn test_challenge_serializes_lowercase() {
        let json = serde_json::to_string(&Challenge::Commitment).unwrap();
        assert_eq!(json, "\"commitment\"");
    }

    #[test]
    fn test_challenge_names_match_serde() {
        for c in [Challenge::Consistency, Challenge::Growth, Challenge::Focus, Challenge::Commitment] {
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{}\"", c.as_str()));
        }
    }
}
