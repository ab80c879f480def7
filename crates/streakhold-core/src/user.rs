//! Users, completion history, and streak tracking.
//!
//! A [`User`] owns its completion history and per-habit streak counters.
//! Streaks are always recomputed from the full ordered history, so the
//! counter can never drift from the recorded dates.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::habit::Periodicity;
use crate::period::PeriodKey;

/// A member of a household, with points and per-habit tracking state.
///
/// Reconstructed on demand from the persisted document; never cached
/// across operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Name of the household this user belongs to.
    pub household: String,
    #[serde(default)]
    pub points: u64,
    /// Habit name -> ordered completion dates (`YYYY-MM-DD` on disk).
    #[serde(default)]
    pub habits_completed: BTreeMap<String, Vec<NaiveDate>>,
    /// Habit name -> current consecutive-completion count.
    #[serde(default)]
    pub streaks: BTreeMap<String, u32>,
    /// Bonus habit name -> period key of the last claim.
    #[serde(default)]
    pub bonus_claimed: BTreeMap<String, PeriodKey>,
}

impl User {
    pub fn new(username: &str, household: &str) -> Self {
        Self::with_points(username, household, 0)
    }

    pub fn with_points(username: &str, household: &str, points: u64) -> Self {
        Self {
            username: username.to_string(),
            household: household.to_string(),
            points,
            habits_completed: BTreeMap::new(),
            streaks: BTreeMap::new(),
            bonus_claimed: BTreeMap::new(),
        }
    }

    /// True iff the most recent recorded date for `habit_name` is `date`.
    pub fn has_completed_on(&self, habit_name: &str, date: NaiveDate) -> bool {
        self.habits_completed
            .get(habit_name)
            .and_then(|dates| dates.last())
            .is_some_and(|last| *last == date)
    }

    pub fn has_completed_today(&self, habit_name: &str) -> bool {
        self.has_completed_on(habit_name, Local::now().date_naive())
    }

    /// Record a completion of `habit_name` on `date`.
    ///
    /// Appends to the history (initializing it on first use), recomputes
    /// the streak, and then adds `points` if supplied. The streak
    /// recomputation is the one place the 7-streak bonus is credited.
    pub fn track_completion(
        &mut self,
        habit_name: &str,
        date: NaiveDate,
        periodicity: Periodicity,
        points: Option<u64>,
    ) {
        self.streaks.entry(habit_name.to_string()).or_insert(0);
        self.habits_completed
            .entry(habit_name.to_string())
            .or_default()
            .push(date);
        self.update_streak(habit_name, periodicity);
        if let Some(points) = points {
            self.points += points;
        }
    }

    /// Recompute the streak for `habit_name` from its full history.
    ///
    /// A gap that exactly matches the periodicity (1 day daily, 7 days
    /// weekly) extends the run; any other gap resets it to 1. A single
    /// completion is a streak of 1. When the recomputed streak lands on a
    /// positive multiple of 7, a flat +5 is credited to the point total.
    pub fn update_streak(&mut self, habit_name: &str, periodicity: Periodicity) {
        let Some(completions) = self.habits_completed.get(habit_name) else {
            return;
        };
        if completions.is_empty() {
            return;
        }

        let mut streak = 1u32;
        for pair in completions.windows(2) {
            let gap = (pair[1] - pair[0]).num_days();
            if gap == periodicity.gap_days() {
                streak += 1;
            } else {
                streak = 1;
            }
        }

        self.streaks.insert(habit_name.to_string(), streak);
        if streak % 7 == 0 {
            self.points += 5;
        }
    }

    /// Current streak for `habit_name`, 0 if never completed.
    pub fn streak(&self, habit_name: &str) -> u32 {
        self.streaks.get(habit_name).copied().unwrap_or(0)
    }

    /// 5 if the stored streak is a positive multiple of 7, else 0.
    /// Unknown habits yield 0.
    pub fn get_bonus_points(&self, habit_name: &str) -> u64 {
        let streak = self.streak(habit_name);
        if streak > 0 && streak % 7 == 0 {
            5
        } else {
            0
        }
    }

    pub fn add_points(&mut self, points: u64) {
        self.points += points;
    }

    /// Rebuild from untyped JSON, with descriptive validation errors.
    ///
    /// # Errors
    /// Fails when the value is not an object, the username is missing,
    /// points is negative or non-numeric, or any of the tracking fields
    /// (`streaks`, `bonus_claimed`, `habits_completed`) is not a mapping.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| ValidationError::InvalidValue {
            field: "user".to_string(),
            message: "expected an object".to_string(),
        })?;

        if !obj.contains_key("username") {
            return Err(ValidationError::MissingUsername.into());
        }
        if let Some(points) = obj.get("points") {
            let negative = points.as_i64().is_some_and(|n| n < 0)
                || points.as_f64().is_some_and(|n| n < 0.0);
            if negative || !points.is_number() {
                return Err(ValidationError::NegativePoints.into());
            }
        }
        for field in ["streaks", "bonus_claimed", "habits_completed"] {
            if let Some(v) = obj.get(field) {
                if !v.is_object() {
                    return Err(ValidationError::InvalidValue {
                        field: field.to_string(),
                        message: "expected a mapping".to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_completion_yields_streak_of_one() {
        let mut user = User::new("alice", "Home");
        user.track_completion("Run", d(2025, 3, 1), Periodicity::Daily, None);
        assert_eq!(user.streak("Run"), 1);
    }

    #[test]
    fn consecutive_daily_gaps_build_streak() {
        let mut user = User::new("alice", "Home");
        for day in 1..=5 {
            user.track_completion("Run", d(2025, 3, day), Periodicity::Daily, None);
        }
        assert_eq!(user.streak("Run"), 5);
    }

    #[test]
    fn two_day_gap_resets_streak_to_one() {
        let mut user = User::new("alice", "Home");
        user.track_completion("Run", d(2025, 3, 1), Periodicity::Daily, None);
        user.track_completion("Run", d(2025, 3, 2), Periodicity::Daily, None);
        user.track_completion("Run", d(2025, 3, 3), Periodicity::Daily, None);
        user.track_completion("Run", d(2025, 3, 5), Periodicity::Daily, None);
        assert_eq!(user.streak("Run"), 1);
    }

    #[test]
    fn weekly_streak_requires_exact_seven_day_gaps() {
        let mut user = User::new("alice", "Home");
        user.track_completion("Review", d(2025, 3, 3), Periodicity::Weekly, None);
        user.track_completion("Review", d(2025, 3, 10), Periodicity::Weekly, None);
        user.track_completion("Review", d(2025, 3, 17), Periodicity::Weekly, None);
        assert_eq!(user.streak("Review"), 3);

        // Six-day gap breaks the run.
        user.track_completion("Review", d(2025, 3, 23), Periodicity::Weekly, None);
        assert_eq!(user.streak("Review"), 1);
    }

    #[test]
    fn seventh_streak_credits_flat_bonus() {
        let mut user = User::new("alice", "Home");
        for day in 1..=7 {
            user.track_completion("Run", d(2025, 3, day), Periodicity::Daily, Some(5));
        }
        // 7 completions at 5 points each, plus one +5 streak bonus.
        assert_eq!(user.points, 40);
        assert_eq!(user.get_bonus_points("Run"), 5);
    }

    #[test]
    fn bonus_points_zero_for_unknown_habit() {
        let user = User::new("alice", "Home");
        assert_eq!(user.get_bonus_points("Nonexistent"), 0);
    }

    #[test]
    fn has_completed_on_checks_most_recent_date() {
        let mut user = User::new("alice", "Home");
        user.track_completion("Run", d(2025, 3, 1), Periodicity::Daily, None);
        assert!(user.has_completed_on("Run", d(2025, 3, 1)));
        assert!(!user.has_completed_on("Run", d(2025, 3, 2)));
        assert!(!user.has_completed_on("Walk", d(2025, 3, 1)));
    }

    #[test]
    fn serde_roundtrip_uses_iso_dates() {
        let mut user = User::new("alice", "Home");
        user.track_completion("Run", d(2025, 3, 1), Periodicity::Daily, Some(5));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["habits_completed"]["Run"][0], "2025-03-01");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn from_value_requires_username() {
        let err = User::from_value(&json!({"household": "Home"}));
        assert!(err.is_err());
    }

    #[test]
    fn from_value_rejects_negative_points() {
        let err = User::from_value(&json!({
            "username": "alice", "household": "Home", "points": -3
        }));
        assert!(err.is_err());
    }

    #[test]
    fn from_value_rejects_non_mapping_tracking_fields() {
        for field in ["streaks", "bonus_claimed", "habits_completed"] {
            let mut value = json!({"username": "alice", "household": "Home"});
            value[field] = json!([1, 2, 3]);
            assert!(User::from_value(&value).is_err(), "{field} should be rejected");
        }
    }
}
