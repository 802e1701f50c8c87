//! Group quest generation
//!
//! Skill-sharing quests when members complement each other, otherwise one
//! quest from the pooled group history. Due traditions are always added.

use crate::activity::{Skill, UserSnapshot};
use crate::analysis::analyze_patterns;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::QuestId;
use crate::group::pairing::{find_complementary_pairs, skill_sharing_quest};
use crate::group::profile::GroupProfile;
use crate::group::tradition::{is_due, tradition_quest};
use crate::quest::generator::personal_reward_template;
use crate::quest::{Participants, Quest, QuestKind};
use crate::synthesis::synthesize_parameters;
use crate::templates::{match_template, TemplateCatalog};
use rand::Rng;

/// Merge every member's skills into one snapshot for the group
///
/// Skills sharing an id are combined: activities are concatenated in time
/// order, minutes and XP summed, focus averaged, level is the highest.
pub fn pooled_snapshot(group: &GroupProfile) -> UserSnapshot {
    let mut pooled: Vec<(Skill, u32)> = Vec::new();

    for skill in group.members.iter().flat_map(|m| m.skills.iter()) {
        match pooled.iter_mut().find(|(s, _)| s.id == skill.id) {
            Some((merged, holders)) => {
                merged.activities.extend(skill.activities.iter().cloned());
                merged.time_spent_minutes =
                    merged.time_spent_minutes.saturating_add(skill.time_spent_minutes);
                merged.xp = merged.xp.saturating_add(skill.xp);
                merged.level = merged.level.max(skill.level);
                merged.focus += skill.focus;
                *holders += 1;
            }
            None => pooled.push((skill.clone(), 1)),
        }
    }

    let skills = pooled
        .into_iter()
        .map(|(mut skill, holders)| {
            skill.focus /= holders as f64;
            skill.activities.sort_by_key(|a| a.timestamp);
            skill
        })
        .collect();

    UserSnapshot {
        user_id: group.group_id.as_str().into(),
        level: group.level,
        skills,
        quest_log: group.quest_log.clone(),
        as_of: Some(group.as_of),
    }
}

/// Generic quest for the whole group, run through the single-user pipeline
pub fn pooled_group_quest<R: Rng + ?Sized>(
    group: &GroupProfile,
    catalog: &TemplateCatalog,
    config: &EngineConfig,
    rng: &mut R,
) -> Quest {
    let snapshot = pooled_snapshot(group);
    let profile = analyze_patterns(&snapshot, config);
    let params = synthesize_parameters(&snapshot, &profile, config);
    let matched = match_template(&params, catalog, config, rng);

    Quest::from_template(
        QuestId::generate(rng),
        &matched.template,
        QuestKind::Group,
        personal_reward_template(&matched.template, &params),
        group.level,
    )
    .with_participants(Participants::partition(
        &group.member_ids(),
        config.required_group_participants,
    ))
}

/// All quests for `group`, skill-sharing or pooled first, traditions last
///
/// Emits one skill-sharing quest per complementary pair, up to
/// `config.max_skill_sharing_quests`, so several may come back.
pub fn generate_group_quests<R: Rng + ?Sized>(
    group: &GroupProfile,
    catalog: &TemplateCatalog,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Vec<Quest>> {
    if let Err(e) = group.validate() {
        tracing::warn!(group = %group.group_id, error = %e, "rejected group profile");
        return Err(e);
    }

    let mut quests = Vec::new();
    let pairs = find_complementary_pairs(&group.members);

    if pairs.is_empty() {
        quests.push(pooled_group_quest(group, catalog, config, rng));
    } else {
        for pair in pairs.iter().take(config.max_skill_sharing_quests) {
            quests.push(skill_sharing_quest(
                pair,
                group.member_name(&pair.teacher),
                group.member_name(&pair.learner),
                group.level,
                config,
                rng,
            ));
        }
        tracing::debug!(
            group = %group.group_id,
            pairs = pairs.len(),
            "matched complementary skills"
        );
    }

    let members = group.member_ids();
    for tradition in group.traditions.iter().filter(|t| is_due(t, &group.as_of)) {
        quests.push(tradition_quest(tradition, &members, group.level, rng));
    }

    tracing::info!(group = %group.group_id, quests = quests.len(), "generated group quests");
    Ok(quests)
}
