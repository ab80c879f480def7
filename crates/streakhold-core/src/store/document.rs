//! The persisted document: the whole application state as one JSON value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::habit::HabitRecord;
use crate::leaderboard::Leaderboard;

/// Persisted form of one household: member usernames plus their current
/// point totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub points: IndexMap<String, u64>,
}

/// Top-level shape of `data.json`.
///
/// Every field is defaulted so partially populated legacy files still
/// load; `Document::default()` is the empty skeleton written on clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub households: IndexMap<String, HouseholdRecord>,
    pub habits: Vec<HabitRecord>,
    pub bonus_habits: Vec<HabitRecord>,
    /// Username -> habit name -> current streak.
    pub streaks: IndexMap<String, IndexMap<String, u32>>,
    /// Period key -> habit name -> claiming username.
    pub completed_habits: IndexMap<String, IndexMap<String, String>>,
    pub leaderboard: Leaderboard,
}

impl Document {
    /// Household containing `username`, if any.
    pub fn household_of(&self, username: &str) -> Option<&str> {
        self.households
            .iter()
            .find(|(_, record)| record.members.iter().any(|m| m == username))
            .map(|(name, _)| name.as_str())
    }
}
