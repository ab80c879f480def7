//! Habits and single-completion point calculation.
//!
//! A [`Habit`] defines a completable task (name, periodicity, base points,
//! bonus flag). Completing one against a [`User`] checks the duplicate
//! rules, records the completion, and credits points including the
//! 7-streak bonus.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::period::PeriodKey;
use crate::user::User;

/// How often a habit can be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
}

impl Periodicity {
    /// Exact day gap between on-cadence completions.
    pub fn gap_days(self) -> i64 {
        match self {
            Periodicity::Daily => 1,
            Periodicity::Weekly => 7,
        }
    }
}

impl std::str::FromStr for Periodicity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            other => Err(ValidationError::InvalidPeriodicity(other.to_string())),
        }
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Periodicity::Daily => f.write_str("daily"),
            Periodicity::Weekly => f.write_str("weekly"),
        }
    }
}

/// Outcome of attempting to complete a habit for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Completion recorded; `points_earned` includes any streak bonus.
    Completed { points_earned: u64, streak: u32 },
    /// The user already completed this habit today.
    AlreadyCompletedToday,
    /// Bonus habit already claimed by this user in the current ISO week.
    AlreadyClaimedThisWeek,
}

impl CompletionOutcome {
    /// Human-readable line for CLI output.
    pub fn message(&self, habit_name: &str, username: &str) -> String {
        match self {
            CompletionOutcome::Completed { points_earned, .. } => format!(
                "Good job, {username}! You completed '{habit_name}' and earned {points_earned} points."
            ),
            CompletionOutcome::AlreadyCompletedToday => {
                format!("Oops! {habit_name} has already been completed today.")
            }
            CompletionOutcome::AlreadyClaimedThisWeek => {
                format!("Oops! {habit_name} has already been claimed this week.")
            }
        }
    }
}

/// A completable task that awards points.
///
/// Immutable after construction; validation happens in [`Habit::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub periodicity: Periodicity,
    pub points: u32,
    pub is_bonus: bool,
    pub created_at: DateTime<Utc>,
}

/// Flat persisted form of a habit.
///
/// Identical to [`Habit`] plus the mutable `last_completed_at` stamp
/// maintained by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub name: String,
    pub periodicity: Periodicity,
    pub created_at: DateTime<Utc>,
    pub points: u32,
    pub is_bonus: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// Create a regular habit.
    ///
    /// # Errors
    /// Fails if the name is empty after trimming.
    pub fn new(
        name: &str,
        periodicity: Periodicity,
        points: u32,
    ) -> Result<Self, ValidationError> {
        Self::build(name, periodicity, points, false, Utc::now())
    }

    /// Create a bonus habit (claimable at most once per period).
    pub fn new_bonus(
        name: &str,
        periodicity: Periodicity,
        points: u32,
    ) -> Result<Self, ValidationError> {
        Self::build(name, periodicity, points, true, Utc::now())
    }

    fn build(
        name: &str,
        periodicity: Periodicity,
        points: u32,
        is_bonus: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyHabitName);
        }
        Ok(Self {
            name: name.to_string(),
            periodicity,
            points,
            is_bonus,
            created_at,
        })
    }

    /// Complete this habit for `user` using the local date.
    pub fn complete(&self, user: &mut User) -> CompletionOutcome {
        self.complete_on(user, Local::now().date_naive())
    }

    /// Complete this habit for `user` on an explicit date.
    ///
    /// Rejections leave the user untouched. On success the completion is
    /// recorded, the streak recomputed, and `base + streak bonus` credited
    /// exactly once (the bonus is awarded by the streak recomputation in
    /// [`User::track_completion`], never double-counted here).
    pub fn complete_on(&self, user: &mut User, today: NaiveDate) -> CompletionOutcome {
        if user.has_completed_on(&self.name, today) {
            return CompletionOutcome::AlreadyCompletedToday;
        }

        if self.is_bonus {
            let week = PeriodKey::for_date(today, Periodicity::Weekly);
            if user.bonus_claimed.get(&self.name) == Some(&week) {
                return CompletionOutcome::AlreadyClaimedThisWeek;
            }
            user.bonus_claimed.insert(self.name.clone(), week);
        }

        let before = user.points;
        user.track_completion(&self.name, today, self.periodicity, Some(u64::from(self.points)));

        CompletionOutcome::Completed {
            points_earned: user.points - before,
            streak: user.streak(&self.name),
        }
    }

    /// Points a completion would award right now: base plus the user's
    /// current streak bonus for this habit. Pure query, no mutation.
    pub fn calculate_points(&self, user: &User) -> u64 {
        u64::from(self.points) + user.get_bonus_points(&self.name)
    }

    /// Flat persisted form (fresh, never completed).
    pub fn to_record(&self) -> HabitRecord {
        HabitRecord {
            name: self.name.clone(),
            periodicity: self.periodicity,
            created_at: self.created_at,
            points: self.points,
            is_bonus: self.is_bonus,
            last_completed_at: None,
        }
    }

    /// Rebuild from a persisted record, preserving `created_at`.
    ///
    /// # Errors
    /// Fails if the record's name is empty after trimming.
    pub fn from_record(record: &HabitRecord) -> Result<Self, ValidationError> {
        Self::build(
            &record.name,
            record.periodicity,
            record.points,
            record.is_bonus,
            record.created_at,
        )
    }

    /// Rebuild from untyped JSON, with descriptive validation errors for
    /// hand-edited data files.
    ///
    /// # Errors
    /// Fails on a missing/empty name, a periodicity outside daily/weekly,
    /// or a negative/non-integer points value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let name = value
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or(ValidationError::EmptyHabitName)?;

        let periodicity: Periodicity = value
            .get("periodicity")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .parse()?;

        let points_value = value.get("points").cloned().unwrap_or_default();
        if points_value.as_i64().is_some_and(|n| n < 0) || points_value.as_f64().is_some_and(|n| n < 0.0) {
            return Err(ValidationError::NegativePoints.into());
        }
        let points = points_value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "points".to_string(),
                message: "expected a non-negative integer".to_string(),
            })?;

        let is_bonus = value.get("is_bonus").and_then(|v| v.as_bool()).unwrap_or(false);
        let created_at = value
            .get("created_at")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(Self::build(name, periodicity, points, is_bonus, created_at)?)
    }
}
