//! Typed activity metrics
//!
//! Each skill category records a known metric shape. Keeping them as enum
//! variants lets every consumer match exhaustively instead of probing an
//! open map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics attached to a single logged activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityMetrics {
    #[default]
    None,
    Fitness {
        distance_km: f64,
        repetitions: u32,
    },
    Mindfulness {
        /// Self-reported calm, 1-10
        calm_rating: u8,
    },
    Learning {
        items_studied: u32,
        pages: u32,
    },
    Creative {
        pieces: u32,
        words: u32,
    },
    Productivity {
        tasks_completed: u32,
    },
}

impl ActivityMetrics {
    /// Category name matching the template catalog's categories
    pub fn category(&self) -> Option<&'static str> {
        match self {
            ActivityMetrics::None => None,
            ActivityMetrics::Fitness { .. } => Some("fitness"),
            ActivityMetrics::Mindfulness { .. } => Some("mindfulness"),
            ActivityMetrics::Learning { .. } => Some("learning"),
            ActivityMetrics::Creative { .. } => Some("creativity"),
            ActivityMetrics::Productivity { .. } => Some("productivity"),
        }
    }

    /// Single scalar summarizing how much was achieved
    pub fn magnitude(&self) -> f64 {
        match self {
            ActivityMetrics::None => 0.0,
            ActivityMetrics::Fitness {
                distance_km,
                repetitions,
            } => distance_km + *repetitions as f64 / 10.0,
            ActivityMetrics::Mindfulness { calm_rating } => *calm_rating as f64,
            ActivityMetrics::Learning {
                items_studied,
                pages,
            } => (*items_studied + *pages) as f64,
            ActivityMetrics::Creative { pieces, words } => *pieces as f64 + *words as f64 / 100.0,
            ActivityMetrics::Productivity { tasks_completed } => *tasks_completed as f64,
        }
    }

    /// Whether all numeric fields are usable (finite, in range)
    pub fn is_well_formed(&self) -> bool {
        match self {
            ActivityMetrics::Fitness { distance_km, .. } => {
                distance_km.is_finite() && *distance_km >= 0.0
            }
            ActivityMetrics::Mindfulness { calm_rating } => *calm_rating <= 10,
            _ => true,
        }
    }
}

/// A category-tagged measurement derived from an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub value: f64,
}
