//! Read-only user snapshot handed to the engine by the store

use crate::activity::skill::Skill;
use crate::core::error::{EngineError, Result};
use crate::core::types::MemberId;
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attempted quest in the user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestLogEntry {
    pub quest_id: String,
    pub category: String,
    pub completed: bool,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Everything the engine needs to know about one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub user_id: MemberId,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub quest_log: Vec<QuestLogEntry>,
    /// Point in time the snapshot describes; defaults to the latest activity
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl UserSnapshot {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: MemberId::new(user_id),
            level: 1,
            skills: Vec::new(),
            quest_log: Vec::new(),
            as_of: None,
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_quest(mut self, entry: QuestLogEntry) -> Self {
        self.quest_log.push(entry);
        self
    }

    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// `as_of` if set, otherwise the most recent activity across all skills
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.as_of.or_else(|| {
            self.skills
                .iter()
                .flat_map(|s| s.activities.iter().map(|a| a.timestamp))
                .max()
        })
    }

    pub fn total_activities(&self) -> usize {
        self.skills.iter().map(|s| s.activities.len()).sum()
    }

    /// Structural checks; degenerate-but-valid data (empty lists) passes
    pub fn validate(&self) -> Result<()> {
        if self.user_id.0.trim().is_empty() {
            return Err(EngineError::validation("user_id", "must not be empty"));
        }

        let mut seen = AHashSet::new();
        for skill in &self.skills {
            skill.validate()?;
            if !seen.insert(skill.id.clone()) {
                return Err(EngineError::validation(
                    "skills",
                    format!("duplicate skill id '{}'", skill.id),
                ));
            }
        }

        if let Some(i) = self.quest_log.iter().position(|q| q.category.trim().is_empty()) {
            return Err(EngineError::validation(
                format!("quest_log[{}].category", i),
                "must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_valid() {
        assert!(UserSnapshot::new("u1").validate().is_ok());
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let snap = UserSnapshot::new("u1")
            .with_skill(Skill::new("yoga", "Yoga"))
            .with_skill(Skill::new("yoga", "Yoga again"));
        let err = snap.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate skill id"));
    }

    #[test]
    fn test_blank_quest_category_rejected() {
        let snap = UserSnapshot::new("u1").with_quest(QuestLogEntry {
            quest_id: "q".into(),
            category: "".into(),
            completed: true,
            finished_at: None,
        });
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_snapshot_json_defaults() {
        let snap: UserSnapshot = serde_json::from_str(r#"{"user_id":"ada"}"#).unwrap();
        assert_eq!(snap.user_id, MemberId::from("ada"));
        assert!(snap.skills.is_empty());
        assert!(snap.as_of.is_none());
    }
}
