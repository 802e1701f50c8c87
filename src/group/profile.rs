//! Group (family) input model

use crate::activity::{QuestLogEntry, Skill};
use crate::core::calendar::Cadence;
use crate::core::error::{EngineError, Result};
use crate::core::types::{MemberId, SkillId};
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One person in the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Skills this member can teach others
    #[serde(default)]
    pub teaches: BTreeSet<SkillId>,
    /// Skills this member is currently learning
    #[serde(default)]
    pub learning: BTreeSet<SkillId>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
            teaches: BTreeSet::new(),
            learning: BTreeSet::new(),
            skills: Vec::new(),
        }
    }

    pub fn teaching(mut self, skill: &str) -> Self {
        self.teaches.insert(SkillId::from(skill));
        self
    }

    pub fn learning(mut self, skill: &str) -> Self {
        self.learning.insert(SkillId::from(skill));
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }
}

/// A recurring celebration the group keeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tradition {
    pub id: String,
    pub name: String,
    pub cadence: Cadence,
    #[serde(default)]
    pub last_celebrated: Option<DateTime<Utc>>,
}

impl Tradition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cadence,
            last_celebrated: None,
        }
    }

    pub fn celebrated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_celebrated = Some(at);
        self
    }
}

/// Everything the engine needs to know about a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupProfile {
    pub group_id: String,
    pub members: Vec<Member>,
    #[serde(default)]
    pub traditions: Vec<Tradition>,
    #[serde(default)]
    pub quest_log: Vec<QuestLogEntry>,
    #[serde(default)]
    pub level: u32,
    /// Point in time cadence checks are measured against
    pub as_of: DateTime<Utc>,
}

impl GroupProfile {
    pub fn new(group_id: impl Into<String>, as_of: DateTime<Utc>) -> Self {
        Self {
            group_id: group_id.into(),
            members: Vec::new(),
            traditions: Vec::new(),
            quest_log: Vec::new(),
            level: 1,
            as_of,
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_tradition(mut self, tradition: Tradition) -> Self {
        self.traditions.push(tradition);
        self
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Display name, or the empty string for unknown ids
    pub fn member_name(&self, id: &MemberId) -> &str {
        self.member(id).map_or("", |m| m.name.as_str())
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_id.trim().is_empty() {
            return Err(EngineError::validation("group_id", "must not be empty"));
        }
        if self.members.is_empty() {
            return Err(EngineError::validation("members", "a group needs at least one member"));
        }

        let mut seen = AHashSet::new();
        for member in &self.members {
            if member.id.0.trim().is_empty() {
                return Err(EngineError::validation("members.id", "must not be empty"));
            }
            if !seen.insert(&member.id) {
                return Err(EngineError::validation(
                    "members",
                    format!("duplicate member id '{}'", member.id),
                ));
            }
            for skill in &member.skills {
                skill.validate()?;
            }
        }

        if let Some(t) = self.traditions.iter().find(|t| t.id.trim().is_empty()) {
            return Err(EngineError::validation(
                "traditions.id",
                format!("tradition '{}' has an empty id", t.name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_group_needs_members() {
        assert!(GroupProfile::new("fam", now()).validate().is_err());
        let group = GroupProfile::new("fam", now()).with_member(Member::new("a", "Ana"));
        assert!(group.validate().is_ok());
    }

    #[test]
    fn test_duplicate_members_rejected() {
        let group = GroupProfile::new("fam", now())
            .with_member(Member::new("a", "Ana"))
            .with_member(Member::new("a", "Also Ana"));
        assert!(group.validate().is_err());
    }

    #[test]
    fn test_group_json() {
        let json = r#"{
            "group_id": "fam",
            "as_of": "2024-12-01T12:00:00Z",
            "members": [{"id": "a", "name": "Ana", "teaches": ["cooking"]}],
            "traditions": [{"id": "t", "name": "Movie night", "cadence": "weekly"}]
        }"#;
        let group: GroupProfile = serde_json::from_str(json).unwrap();
        assert!(group.members[0].teaches.contains(&SkillId::from("cooking")));
        assert_eq!(group.traditions[0].cadence, Cadence::Weekly);
        assert!(group.traditions[0].last_celebrated.is_none());
    }
}
