//! Relevance prediction for already-available quests
//!
//! Re-ranks what the user can already pick from; nothing is generated.
//! Three additive signals, capped at 1.0.

use crate::activity::MetricEntry;
use crate::analysis::BehavioralProfile;
use crate::core::calendar::hour_of;
use crate::core::config::EngineConfig;
use crate::core::types::QuestId;
use crate::quest::Quest;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A ranked recommendation for an existing quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestSuggestion {
    pub quest_id: QuestId,
    /// 0-1
    pub confidence: f64,
    pub reason: String,
}

/// Signals derived once from the metric window, reused for every candidate
struct ActivitySignals<'a> {
    active_now: bool,
    category_totals: AHashMap<&'a str, f64>,
}

impl<'a> ActivitySignals<'a> {
    fn from_metrics(metrics: &'a [MetricEntry], now: &DateTime<Utc>, window: usize) -> Self {
        let mut recent: Vec<&MetricEntry> = metrics.iter().collect();
        recent.sort_by_key(|m| m.timestamp);
        let start = recent.len().saturating_sub(window);
        let recent = &recent[start..];

        let current_hour = hour_of(now);
        let active_now = recent.iter().any(|m| hour_of(&m.timestamp) == current_hour);

        let mut category_totals: AHashMap<&str, f64> = AHashMap::new();
        for m in recent {
            if m.value.is_finite() {
                *category_totals.entry(m.category.as_str()).or_insert(0.0) += m.value;
            }
        }

        Self {
            active_now,
            category_totals,
        }
    }

    /// Also count the hour as active when the full history has sessions
    /// there, metric-bearing or not
    fn with_profile(mut self, profile: &BehavioralProfile, now: &DateTime<Utc>) -> Self {
        self.active_now |= profile.is_active_at(hour_of(now));
        self
    }

    fn enjoys(&self, category: &str) -> bool {
        self.category_totals.get(category).is_some_and(|&total| total > 0.0)
    }
}

/// Score one candidate; None when no signal fires
fn score_quest(quest: &Quest, signals: &ActivitySignals<'_>, config: &EngineConfig) -> Option<QuestSuggestion> {
    let mut confidence = 0.0;
    let mut reasons: Vec<String> = Vec::new();

    if signals.active_now {
        confidence += config.active_time_weight;
        reasons.push("You're usually active at this time.".to_string());
    }
    if signals.enjoys(&quest.category) {
        confidence += config.category_weight;
        reasons.push(format!("You enjoy {} activities.", quest.category));
    }
    if quest.has_progress() {
        confidence += config.progress_weight;
        reasons.push("You've already made progress on this quest.".to_string());
    }

    if reasons.is_empty() {
        return None;
    }

    Some(QuestSuggestion {
        quest_id: quest.id,
        confidence: f64::min(confidence, 1.0).max(0.0),
        reason: reasons.join(" "),
    })
}

/// Rank `candidates` by predicted interest, returning at most
/// `config.max_suggestions`. Equal confidence keeps candidate order.
///
/// The active-time signal comes from the metric window alone; use
/// [`rank_for_profile`] when the whole activity history is available.
pub fn rank_suggestions(
    recent_metrics: &[MetricEntry],
    candidates: &[Quest],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<QuestSuggestion> {
    let signals = ActivitySignals::from_metrics(recent_metrics, &now, config.metric_window);
    rank(&signals, candidates, config)
}

/// Like [`rank_suggestions`], but the current hour also counts as active
/// when `profile` shows any historical session at it
pub fn rank_for_profile(
    profile: &BehavioralProfile,
    recent_metrics: &[MetricEntry],
    candidates: &[Quest],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<QuestSuggestion> {
    let signals = ActivitySignals::from_metrics(recent_metrics, &now, config.metric_window)
        .with_profile(profile, &now);
    rank(&signals, candidates, config)
}

fn rank(signals: &ActivitySignals<'_>, candidates: &[Quest], config: &EngineConfig) -> Vec<QuestSuggestion> {
    let mut suggestions: Vec<QuestSuggestion> = candidates
        .iter()
        .filter_map(|q| score_quest(q, signals, config))
        .collect();

    suggestions.sort_by_key(|s| Reverse(OrderedFloat(s.confidence)));
    suggestions.truncate(config.max_suggestions);

    tracing::debug!(
        candidates = candidates.len(),
        returned = suggestions.len(),
        active_now = signals.active_now,
        "ranked quest suggestions"
    );

    suggestions
}
