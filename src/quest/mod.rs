//! Quest output type and the single-user generation pipeline
//!
//! A `Quest` is handed to the caller as soon as it is built; the engine
//! keeps no reference to it.

pub mod generator;

use crate::core::types::{MemberId, QuestId, SkillId};
use crate::rewards::{ItemGrant, RewardPayout, RewardTemplate};
use crate::templates::{interpolate, QuestTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use generator::{GeneratedQuest, QuestGenerator};

/// What produced the quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Personal,
    Group,
    SkillSharing,
    Tradition,
}

/// Who takes part in a group quest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Participants {
    pub required: Vec<MemberId>,
    #[serde(default)]
    pub optional: Vec<MemberId>,
}

impl Participants {
    /// First `required` members are required, the rest optional
    pub fn partition(members: &[MemberId], required: usize) -> Self {
        let split = required.min(members.len());
        Self {
            required: members[..split].to_vec(),
            optional: members[split..].to_vec(),
        }
    }
}

/// Payout shown on the quest card
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestRewards {
    pub xp: u64,
    /// Skill id -> points
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemGrant>,
}

impl From<RewardPayout> for QuestRewards {
    fn from(payout: RewardPayout) -> Self {
        Self {
            xp: payout.xp,
            resources: payout
                .skill_rewards
                .into_iter()
                .map(|(skill, amount)| (skill.0, amount))
                .collect(),
            items: payout.items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestRequirements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<SkillId>,
}

/// A generated quest, owned by the caller once returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: QuestKind,
    pub difficulty: u8,
    pub time_estimate_minutes: u32,
    pub rewards: QuestRewards,
    #[serde(default)]
    pub requirements: QuestRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Participants>,
    /// Completion progress, 0-1
    #[serde(default)]
    pub progress: f64,
    /// Template the text was rendered from
    pub template_id: String,
    /// How completion is paid out
    pub reward_template: RewardTemplate,
}

impl Quest {
    /// Render `template` and attach rewards scaled for `level`
    pub fn from_template(
        id: QuestId,
        template: &QuestTemplate,
        kind: QuestKind,
        reward_template: RewardTemplate,
        level: u32,
    ) -> Self {
        let text = interpolate(template);
        let payout = crate::rewards::scale_reward(&reward_template, level, &[] as &[&str]);
        Self {
            id,
            title: text.title,
            description: text.description,
            category: template.category.clone(),
            kind,
            difficulty: template.difficulty,
            time_estimate_minutes: template.time_estimate_minutes,
            rewards: payout.into(),
            requirements: QuestRequirements {
                skills: template.skills.iter().cloned().collect(),
            },
            participants: None,
            progress: 0.0,
            template_id: template.id.clone(),
            reward_template,
        }
    }

    pub fn with_participants(mut self, participants: Participants) -> Self {
        self.participants = Some(participants);
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn has_progress(&self) -> bool {
        self.progress > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_partition_participants() {
        let members: Vec<MemberId> = ["a", "b", "c"].iter().map(|m| MemberId::from(*m)).collect();
        let p = Participants::partition(&members, 2);
        assert_eq!(p.required.len(), 2);
        assert_eq!(p.optional, vec![MemberId::from("c")]);

        let p = Participants::partition(&members, 10);
        assert_eq!(p.required.len(), 3);
        assert!(p.optional.is_empty());
    }

    #[test]
    fn test_from_template_renders_and_scales() {
        let catalog = TemplateCatalog::with_defaults();
        let template = catalog.get("focused_reading").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let quest = Quest::from_template(
            QuestId::generate(&mut rng),
            template,
            QuestKind::Personal,
            RewardTemplate::for_difficulty(template.difficulty),
            20,
        );
        assert_eq!(quest.title, "Focused Reading");
        assert_eq!(quest.category, "learning");
        // Tier 2 at level 20: 100 * 1.15^2
        assert_eq!(quest.rewards.xp, 132);
        assert_eq!(quest.requirements.skills, vec![SkillId::from("reading")]);
        assert!(!quest.has_progress());
    }

    #[test]
    fn test_quest_rewards_from_payout() {
        let mut payout = RewardPayout::zero();
        payout.xp = 150;
        payout.skill_rewards.insert(SkillId::from("cooking"), 20);
        let rewards: QuestRewards = payout.into();
        assert_eq!(rewards.xp, 150);
        assert_eq!(rewards.resources["cooking"], 20);
    }
}
