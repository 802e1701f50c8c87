//! Pattern analysis over raw activity history
//!
//! Every function here is pure: snapshot in, numbers out. Degenerate
//! histories (no sessions, zero-length sessions) produce zeros, never NaN.

use crate::activity::{MetricEntry, QuestLogEntry, Skill, UserSnapshot};
use crate::analysis::profile::{BehavioralProfile, Challenge, HourHistogram, SkillInsight};
use crate::core::calendar::{days_between, hour_of};
use crate::core::config::EngineConfig;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Mean relative change between consecutive sessions in the last `window`
///
/// Each step contributes `(d[i] - d[i-1]) / d[i]`; a zero-length session
/// contributes 0. Fewer than two sessions yields 0.
pub fn growth_rate(skill: &Skill, window: usize) -> f64 {
    let recent = skill.recent_activities(window);
    if recent.len() < 2 {
        return 0.0;
    }

    let steps: Vec<f64> = recent
        .windows(2)
        .map(|pair| {
            let prev = pair[0].duration_minutes as f64;
            let cur = pair[1].duration_minutes as f64;
            if cur == 0.0 {
                0.0
            } else {
                (cur - prev) / cur
            }
        })
        .collect();

    steps.iter().sum::<f64>() / steps.len() as f64
}

/// Distinct practice days divided by days elapsed since the first session
///
/// Elapsed days run up to `reference` (or the skill's last session when no
/// reference is given) and never count as fewer than 1, so same-day-only
/// history is 1.0. Not capped: daily practice over a short span exceeds 1.
pub fn consistency(skill: &Skill, reference: Option<DateTime<Utc>>) -> f64 {
    let Some(first) = skill.activities.iter().map(|a| a.timestamp).min() else {
        return 0.0;
    };
    let last = reference
        .or_else(|| skill.activities.iter().map(|a| a.timestamp).max())
        .unwrap_or(first);

    let distinct_days: BTreeSet<_> = skill
        .activities
        .iter()
        .map(|a| a.timestamp.date_naive())
        .collect();
    let elapsed = days_between(&first, &last).max(1);

    distinct_days.len() as f64 / elapsed as f64
}

/// Independent threshold rules; zero or many may fire
pub fn challenges(
    skill: &Skill,
    growth: f64,
    consistency: f64,
    config: &EngineConfig,
) -> BTreeSet<Challenge> {
    let mut tags = BTreeSet::new();
    if consistency < config.consistency_threshold {
        tags.insert(Challenge::Consistency);
    }
    if growth < config.growth_threshold {
        tags.insert(Challenge::Growth);
    }
    if skill.focus_level() < config.focus_threshold {
        tags.insert(Challenge::Focus);
    }
    if skill.time_spent_minutes < config.commitment_minutes {
        tags.insert(Challenge::Commitment);
    }
    tags
}

pub fn analyze_skill(
    skill: &Skill,
    reference: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> SkillInsight {
    let growth = growth_rate(skill, config.growth_window);
    let consistency = consistency(skill, reference);
    let challenges = challenges(skill, growth, consistency, config);

    tracing::trace!(
        skill = %skill.id,
        growth,
        consistency,
        challenges = %challenges.iter().map(Challenge::as_str).collect::<Vec<_>>().join(","),
        "analyzed skill"
    );

    SkillInsight {
        growth,
        consistency,
        challenges,
    }
}

/// Hour -> session count and hour -> summed minutes, in a single pass
pub fn time_histograms(skills: &[Skill]) -> (HourHistogram, HourHistogram) {
    let mut preferred = HourHistogram::new();
    let mut energy = HourHistogram::new();
    for activity in skills.iter().flat_map(|s| s.activities.iter()) {
        let hour = hour_of(&activity.timestamp);
        preferred.add(hour, 1.0);
        energy.add(hour, activity.duration_minutes as f64);
    }
    (preferred, energy)
}

/// Category -> completed / attempted
pub fn completion_rates(log: &[QuestLogEntry]) -> BTreeMap<String, f64> {
    let mut tally: AHashMap<&str, (u32, u32)> = AHashMap::new();
    for entry in log {
        let (done, attempted) = tally.entry(entry.category.as_str()).or_insert((0, 0));
        *attempted += 1;
        if entry.completed {
            *done += 1;
        }
    }

    tally
        .into_iter()
        .map(|(category, (done, attempted))| {
            (category.to_string(), done as f64 / attempted as f64)
        })
        .collect()
}

/// Build the full behavioral profile for a user
pub fn analyze_patterns(user: &UserSnapshot, config: &EngineConfig) -> BehavioralProfile {
    let reference = user.reference_time();
    let (preferred_times, energy_levels) = time_histograms(&user.skills);

    let skill_progress = user
        .skills
        .iter()
        .map(|skill| (skill.id.clone(), analyze_skill(skill, reference, config)))
        .collect();

    let profile = BehavioralProfile {
        preferred_times,
        completion_rates: completion_rates(&user.quest_log),
        energy_levels,
        skill_progress,
    };

    tracing::debug!(
        user = %user.user_id,
        skills = user.skills.len(),
        activities = user.total_activities(),
        peak_hour = ?profile.preferred_times.peak_hour(),
        "built behavioral profile"
    );

    profile
}

/// The most recent `window` metric-bearing activities, oldest first
pub fn recent_metrics(user: &UserSnapshot, window: usize) -> Vec<MetricEntry> {
    let mut entries: Vec<MetricEntry> = user
        .skills
        .iter()
        .flat_map(|s| s.activities.iter())
        .filter_map(|a| {
            a.metrics.category().map(|category| MetricEntry {
                timestamp: a.timestamp,
                category: category.to_string(),
                value: a.metrics.magnitude(),
            })
        })
        .collect();

    entries.sort_by_key(|e| e.timestamp);
    let start = entries.len().saturating_sub(window);
    entries.split_off(start)
}
