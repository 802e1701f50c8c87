//! Skills and their append-only activity history

use crate::activity::metrics::ActivityMetrics;
use crate::core::error::{EngineError, Result};
use crate::core::types::SkillId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged practice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: ActivityMetrics,
}

impl ActivityRecord {
    pub fn new(timestamp: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            timestamp,
            duration_minutes,
            description: String::new(),
            metrics: ActivityMetrics::None,
        }
    }

    pub fn with_metrics(mut self, metrics: ActivityMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Rolling progress counters kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillProgress {
    pub daily: f64,
    pub weekly: f64,
    pub total: f64,
}

/// A tracked skill and its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    /// Self-reported focus, 0-100
    #[serde(default)]
    pub focus: f64,
    #[serde(default)]
    pub time_spent_minutes: u32,
    /// Chronological, append-only
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub progress: SkillProgress,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SkillId::new(id),
            name: name.into(),
            level: 1,
            xp: 0,
            focus: 0.0,
            time_spent_minutes: 0,
            activities: Vec::new(),
            progress: SkillProgress::default(),
        }
    }

    pub fn with_focus(mut self, focus: f64) -> Self {
        self.focus = focus;
        self
    }

    /// Append an activity, keeping `time_spent_minutes` in step
    pub fn with_activity(mut self, activity: ActivityRecord) -> Self {
        self.log_activity(activity);
        self
    }

    pub fn log_activity(&mut self, activity: ActivityRecord) {
        self.time_spent_minutes = self
            .time_spent_minutes
            .saturating_add(activity.duration_minutes);
        self.activities.push(activity);
    }

    /// The last `n` activities in chronological order
    pub fn recent_activities(&self, n: usize) -> &[ActivityRecord] {
        let start = self.activities.len().saturating_sub(n);
        &self.activities[start..]
    }

    /// Focus on the 1-5 scale
    pub fn focus_level(&self) -> u8 {
        focus_to_level(self.focus)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(EngineError::validation("skill.id", "must not be empty"));
        }
        if !self.focus.is_finite() || !(0.0..=100.0).contains(&self.focus) {
            return Err(EngineError::validation(
                format!("skill[{}].focus", self.id),
                format!("must be within 0-100, got {}", self.focus),
            ));
        }
        if let Some(bad) = self.activities.iter().position(|a| !a.metrics.is_well_formed()) {
            return Err(EngineError::validation(
                format!("skill[{}].activities[{}].metrics", self.id, bad),
                "contains out-of-range values",
            ));
        }
        Ok(())
    }
}

/// Map a 0-100 focus score onto the 1-5 scale (rounded up)
pub fn focus_to_level(focus: f64) -> u8 {
    if !focus.is_finite() {
        return 1;
    }
    (focus / 20.0).ceil().clamp(1.0, 5.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_focus_scaling() {
        assert_eq!(focus_to_level(0.0), 1);
        assert_eq!(focus_to_level(20.0), 1);
        assert_eq!(focus_to_level(21.0), 2);
        assert_eq!(focus_to_level(59.0), 3);
        assert_eq!(focus_to_level(100.0), 5);
        assert_eq!(focus_to_level(f64::NAN), 1);
    }

    #[test]
    fn test_log_activity_accumulates_time() {
        let skill = Skill::new("yoga", "Yoga")
            .with_activity(ActivityRecord::new(at(1, 7), 20))
            .with_activity(ActivityRecord::new(at(2, 7), 25));
        assert_eq!(skill.time_spent_minutes, 45);
        assert_eq!(skill.activities.len(), 2);
    }

    #[test]
    fn test_recent_activities_window() {
        let mut skill = Skill::new("yoga", "Yoga");
        for d in 1..=15 {
            skill.log_activity(ActivityRecord::new(at(d, 7), d));
        }
        let recent = skill.recent_activities(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].duration_minutes, 6);
        assert_eq!(recent[9].duration_minutes, 15);
        assert_eq!(skill.recent_activities(100).len(), 15);
    }

    #[test]
    fn test_validate_rejects_focus_out_of_range() {
        let skill = Skill::new("yoga", "Yoga").with_focus(140.0);
        assert!(skill.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let skill = Skill::new("  ", "Nameless");
        assert!(skill.validate().is_err());
    }
}
