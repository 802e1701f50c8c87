//! Complementary skill pairing between group members

use crate::core::config::EngineConfig;
use crate::core::types::{MemberId, QuestId, SkillId};
use crate::group::profile::Member;
use crate::quest::{Participants, Quest, QuestKind};
use crate::rewards::RewardTemplate;
use crate::templates::matcher::display_name;
use crate::templates::QuestTemplate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SKILL_SHARING_CATEGORY: &str = "skill_sharing";

/// A member who teaches a skill another member is learning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPair {
    pub teacher: MemberId,
    pub learner: MemberId,
    pub skill: SkillId,
}

/// Every (teacher, learner, skill) triple, in member order then skill order
pub fn find_complementary_pairs(members: &[Member]) -> Vec<SkillPair> {
    let mut pairs = Vec::new();
    for teacher in members {
        for learner in members {
            if teacher.id == learner.id {
                continue;
            }
            for skill in teacher.teaches.intersection(&learner.learning) {
                pairs.push(SkillPair {
                    teacher: teacher.id.clone(),
                    learner: learner.id.clone(),
                    skill: skill.clone(),
                });
            }
        }
    }
    pairs
}

/// Fixed-shape reward: flat XP plus points in the shared skill
pub fn skill_sharing_reward(skill: &SkillId, config: &EngineConfig) -> RewardTemplate {
    RewardTemplate::new(config.skill_sharing_xp, 1.0)
        .with_skill_reward(skill.clone(), config.skill_sharing_bonus)
}

/// Two-participant quest for one pair
pub fn skill_sharing_quest<R: Rng + ?Sized>(
    pair: &SkillPair,
    teacher_name: &str,
    learner_name: &str,
    level: u32,
    config: &EngineConfig,
    rng: &mut R,
) -> Quest {
    let mut variables = BTreeMap::new();
    variables.insert("teacher".to_string(), teacher_name.to_string());
    variables.insert("learner".to_string(), learner_name.to_string());
    variables.insert("skill".to_string(), display_name(pair.skill.as_str()));

    let template = QuestTemplate {
        id: format!("skill-sharing-{}", pair.skill),
        title_pattern: "{teacher} teaches {learner}: {skill}".into(),
        description_pattern:
            "{teacher} shows {learner} the basics of {skill}. Spend {duration} minutes together and try one thing hands-on."
                .into(),
        category: SKILL_SHARING_CATEGORY.into(),
        difficulty: 2,
        time_estimate_minutes: 45,
        energy_level: 0.5,
        focus_required: 3,
        skills: BTreeSet::from([pair.skill.clone()]),
        variables,
    };

    Quest::from_template(
        QuestId::generate(rng),
        &template,
        QuestKind::SkillSharing,
        skill_sharing_reward(&pair.skill, config),
        level,
    )
    .with_participants(Participants {
        required: vec![pair.teacher.clone(), pair.learner.clone()],
        optional: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pairs_found_both_directions() {
        let members = vec![
            Member::new("a", "Ana").teaching("cooking").learning("guitar"),
            Member::new("b", "Ben").teaching("guitar").learning("cooking"),
        ];
        let pairs = find_complementary_pairs(&members);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].teacher, MemberId::from("a"));
        assert_eq!(pairs[0].skill, SkillId::from("cooking"));
        assert_eq!(pairs[1].teacher, MemberId::from("b"));
        assert_eq!(pairs[1].skill, SkillId::from("guitar"));
    }

    #[test]
    fn test_self_pairing_ignored() {
        let members = vec![Member::new("a", "Ana").teaching("chess").learning("chess")];
        assert!(find_complementary_pairs(&members).is_empty());
    }

    #[test]
    fn test_skill_sharing_quest_shape() {
        let pair = SkillPair {
            teacher: MemberId::from("a"),
            learner: MemberId::from("b"),
            skill: SkillId::from("bread_baking"),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let quest = skill_sharing_quest(&pair, "Ana", "Ben", 40, &EngineConfig::default(), &mut rng);

        assert_eq!(quest.kind, QuestKind::SkillSharing);
        assert_eq!(quest.title, "Ana teaches Ben: bread baking");
        // Flat reward regardless of level
        assert_eq!(quest.rewards.xp, 150);
        assert_eq!(quest.rewards.resources["bread_baking"], 20);
        let participants = quest.participants.unwrap();
        assert_eq!(participants.required, vec![MemberId::from("a"), MemberId::from("b")]);
        assert!(participants.optional.is_empty());
    }
}
