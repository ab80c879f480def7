//! Canonical period identifiers.
//!
//! Duplicate-claim checks and completion history are keyed by "which
//! day/week a date falls in". Those keys used to be ad hoc strftime
//! strings with locale-dependent week numbering; `PeriodKey` pins them
//! to the ISO calendar instead.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::Periodicity;

/// Canonical label for the day or ISO week a completion belongs to.
///
/// Daily keys are `YYYY-MM-DD`; weekly keys are `YYYY-Www` using ISO week
/// numbering, so a key is stable for every date inside the same week and
/// changes exactly at the week boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn for_date(date: NaiveDate, periodicity: Periodicity) -> Self {
        match periodicity {
            Periodicity::Daily => PeriodKey(date.format("%Y-%m-%d").to_string()),
            Periodicity::Weekly => {
                let iso = date.iso_week();
                PeriodKey(format!("{:04}-W{:02}", iso.year(), iso.week()))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `MM-YYYY` label used for monthly leaderboard archive entries.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_key_is_iso_date() {
        let key = PeriodKey::for_date(d(2025, 3, 9), Periodicity::Daily);
        assert_eq!(key.as_str(), "2025-03-09");
    }

    #[test]
    fn weekly_key_stable_within_week() {
        // 2025-03-03 is a Monday; the whole ISO week shares one key.
        let monday = PeriodKey::for_date(d(2025, 3, 3), Periodicity::Weekly);
        let sunday = PeriodKey::for_date(d(2025, 3, 9), Periodicity::Weekly);
        assert_eq!(monday, sunday);
        assert_eq!(monday.as_str(), "2025-W10");
    }

    #[test]
    fn weekly_key_changes_at_week_boundary() {
        let sunday = PeriodKey::for_date(d(2025, 3, 9), Periodicity::Weekly);
        let next_monday = PeriodKey::for_date(d(2025, 3, 10), Periodicity::Weekly);
        assert_ne!(sunday, next_monday);
    }

    #[test]
    fn weekly_key_uses_iso_week_year_at_year_boundary() {
        // 2024-12-30 belongs to ISO week 1 of 2025.
        let key = PeriodKey::for_date(d(2024, 12, 30), Periodicity::Weekly);
        assert_eq!(key.as_str(), "2025-W01");
    }

    #[test]
    fn month_label_format() {
        assert_eq!(month_label(d(2025, 3, 9)), "03-2025");
    }
}
