//! Calendar helpers for hour-of-day and day-count arithmetic
//!
//! All timestamps are UTC; hours are 0-23 and day counts are whole
//! calendar days.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: usize = 24;

/// Coarse part of the day an hour falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Morning,    // 06:00-12:00
    Afternoon,  // 12:00-18:00
    Evening,    // 18:00-22:00
    Night,      // 22:00-06:00
}

impl TimePeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night, // 22-23, 0-5
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
            TimePeriod::Night => "night",
        }
    }
}

/// How often a recurring tradition is meant to be celebrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    /// Minimum days that must pass before the tradition is due again
    pub fn min_days(&self) -> i64 {
        match self {
            Cadence::Daily => 1,
            Cadence::Weekly => 7,
            Cadence::Monthly => 30,
            Cadence::Yearly => 365,
        }
    }
}

/// Hour of day (0-23) of a timestamp
pub fn hour_of(ts: &DateTime<Utc>) -> usize {
    ts.hour() as usize
}

/// Whole calendar days from `earlier` to `later` (negative if reversed)
pub fn days_between(earlier: &DateTime<Utc>, later: &DateTime<Utc>) -> i64 {
    later
        .date_naive()
        .signed_duration_since(earlier.date_naive())
        .num_days()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_period_from_hour() {
        assert_eq!(TimePeriod::from_hour(6), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(11), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(17), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(18), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(21), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(22), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Night);
    }

    #[test]
    fn test_cadence_thresholds() {
        assert_eq!(Cadence::Daily.min_days(), 1);
        assert_eq!(Cadence::Weekly.min_days(), 7);
        assert_eq!(Cadence::Monthly.min_days(), 30);
        assert_eq!(Cadence::Yearly.min_days(), 365);
    }

    #[test]
    fn test_days_between_ignores_time_of_day() {
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let early_next = Utc.with_ymd_and_hms(2024, 3, 2, 0, 1, 0).unwrap();
        assert_eq!(days_between(&late, &early_next), 1);
        assert_eq!(days_between(&early_next, &late), -1);
    }
}
