//! Pattern analysis
//!
//! Turns a user's raw activity history into a behavioral profile: when they
//! usually practice, how much energy they bring at each hour, and how each
//! skill is trending.

pub mod patterns;
pub mod profile;

pub use patterns::{
    analyze_patterns, analyze_skill, challenges, completion_rates, consistency, growth_rate,
    recent_metrics, time_histograms,
};
pub use profile::{BehavioralProfile, Challenge, HourHistogram, SkillInsight};
