//! Persistence orchestration: every operation is one full
//! load -> mutate -> save cycle over the persisted [`Document`].
//!
//! The manager holds an explicit [`DataStore`] handle instead of any
//! process-wide state, so tests and embedders point it at their own
//! file. Not-found and duplicate conditions come back as `Ok(false)`
//! with a logged warning; only validation and write failures are errors.

use chrono::{DateTime, Local, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, StoreError, ValidationError};
use crate::habit::{Habit, HabitRecord, Periodicity};
use crate::leaderboard::Leaderboard;
use crate::period::{month_label, PeriodKey};
use crate::store::{DataStore, Document};
use crate::user::User;

/// Completions by one user within one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodActivity {
    pub period: String,
    pub completed: u32,
}

/// Bonus points earned by one user within one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBonus {
    pub period: String,
    pub points: u64,
}

/// One active streak of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakRow {
    pub habit: String,
    pub length: u32,
}

/// Orchestrates reads and read-modify-write cycles over the document.
#[derive(Debug, Clone)]
pub struct DataManager {
    store: DataStore,
}

impl DataManager {
    /// Manager over the default store location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            store: DataStore::open()?,
        })
    }

    /// Manager over an injected store.
    pub fn with_store(store: DataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Current document state (empty skeleton when nothing persisted).
    pub fn load(&self) -> Document {
        self.store.load()
    }

    /// Create a household and seed its leaderboard ranking map.
    /// Returns false when the household already exists.
    pub fn create_household(&self, name: &str) -> Result<bool> {
        let mut doc = self.store.load();
        if doc.households.contains_key(name) {
            warn!(household = name, "household already exists");
            return Ok(false);
        }
        doc.households.insert(name.to_string(), Default::default());
        doc.leaderboard.ensure_household(name);
        self.store.save(&doc)?;
        info!(household = name, "household created");
        Ok(true)
    }

    /// Add a user to an existing household, seeding their points, streak
    /// map, and leaderboard entry. Returns false when already a member.
    ///
    /// # Errors
    /// Fails with a validation error when the household does not exist.
    pub fn add_user(&self, username: &str, household: &str) -> Result<bool> {
        let mut doc = self.store.load();
        let Some(record) = doc.households.get_mut(household) else {
            return Err(ValidationError::UnknownHousehold(household.to_string()).into());
        };
        if record.members.iter().any(|m| m == username) {
            warn!(username, household, "user is already a member");
            return Ok(false);
        }
        record.members.push(username.to_string());
        record.points.insert(username.to_string(), 0);
        doc.streaks.entry(username.to_string()).or_default();
        doc.leaderboard.update(household, username, 0);
        self.store.save(&doc)?;
        info!(username, household, "user added");
        Ok(true)
    }

    /// Persist a habit, routing by its bonus flag. Returns false when a
    /// habit with the same name already exists in that category.
    pub fn save_habit(&self, habit: &Habit) -> Result<bool> {
        if habit.is_bonus {
            return self.save_bonus_habit(habit);
        }
        let mut doc = self.store.load();
        if doc.habits.iter().any(|h| h.name == habit.name) {
            warn!(habit = %habit.name, "habit already exists");
            return Ok(false);
        }
        doc.habits.push(habit.to_record());
        self.store.save(&doc)?;
        info!(habit = %habit.name, "habit saved");
        Ok(true)
    }

    /// Persist a bonus habit. The bonus list is checked independently of
    /// the regular list, so the same name may exist in both.
    pub fn save_bonus_habit(&self, habit: &Habit) -> Result<bool> {
        let mut doc = self.store.load();
        if doc.bonus_habits.iter().any(|h| h.name == habit.name) {
            warn!(habit = %habit.name, "bonus habit already exists");
            return Ok(false);
        }
        let mut record = habit.to_record();
        record.is_bonus = true;
        doc.bonus_habits.push(record);
        self.store.save(&doc)?;
        info!(habit = %habit.name, "bonus habit saved");
        Ok(true)
    }

    /// Complete a regular habit now.
    pub fn complete_habit(&self, username: &str, habit_name: &str) -> Result<bool> {
        self.complete_habit_at(username, habit_name, Utc::now())
    }

    /// Complete a regular habit at an explicit time.
    ///
    /// Rejects (false) on unknown habit or user, and per periodicity when
    /// the habit was already completed this day/week. On success the
    /// streak steps by the exact-gap rule, `base + streak bonus` points
    /// go to the household map, the completion time is stamped, and the
    /// leaderboard is refreshed in a second cycle.
    pub fn complete_habit_at(
        &self,
        username: &str,
        habit_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut doc = self.store.load();

        let Some(habit_idx) = doc.habits.iter().position(|h| h.name == habit_name) else {
            warn!(habit = habit_name, "habit not found");
            return Ok(false);
        };
        let Some(household) = doc.household_of(username).map(str::to_string) else {
            warn!(username, "user not found");
            return Ok(false);
        };

        let today = now.date_naive();
        let periodicity = doc.habits[habit_idx].periodicity;
        let last_completed = doc.habits[habit_idx].last_completed_at;
        if let Some(last) = last_completed {
            let rejected = match periodicity {
                Periodicity::Daily => today <= last.date_naive(),
                Periodicity::Weekly => (now - last).num_days() < 7,
            };
            if rejected {
                warn!(habit = habit_name, %periodicity, "habit already completed this period");
                return Ok(false);
            }
        }

        let streak_entry = doc
            .streaks
            .entry(username.to_string())
            .or_default()
            .entry(habit_name.to_string())
            .or_insert(0);
        // Exact on-cadence gap extends the streak, anything else resets it.
        *streak_entry = match last_completed {
            Some(last) if (today - last.date_naive()).num_days() == periodicity.gap_days() => {
                *streak_entry + 1
            }
            _ => 1,
        };
        let streak = *streak_entry;

        let base = u64::from(doc.habits[habit_idx].points);
        let points = base + if streak % 7 == 0 { 5 } else { 0 };

        let total = {
            let record = doc
                .households
                .get_mut(&household)
                .ok_or_else(|| ValidationError::UnknownHousehold(household.clone()))?;
            let entry = record.points.entry(username.to_string()).or_insert(0);
            *entry += points;
            *entry
        };
        doc.habits[habit_idx].last_completed_at = Some(now);
        self.store.save(&doc)?;

        self.update_leaderboard(&household, username, total)?;

        info!(habit = habit_name, username, streak, points, "habit completed");
        Ok(true)
    }

    /// Claim a bonus habit now.
    pub fn claim_bonus_habit(&self, username: &str, habit_name: &str) -> Result<bool> {
        self.claim_bonus_habit_at(username, habit_name, Utc::now())
    }

    /// Claim a bonus habit at an explicit time.
    ///
    /// A bonus habit is claimable once per period across the whole
    /// system: the first claimant locks it for everyone until the next
    /// day (daily) or ISO week (weekly). Success credits base points only.
    pub fn claim_bonus_habit_at(
        &self,
        username: &str,
        habit_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut doc = self.store.load();

        let Some(household) = doc.household_of(username).map(str::to_string) else {
            warn!(username, "user not found");
            return Ok(false);
        };
        let Some(habit) = doc
            .bonus_habits
            .iter()
            .find(|h| h.name == habit_name && h.is_bonus)
            .cloned()
        else {
            warn!(habit = habit_name, "not a bonus habit");
            return Ok(false);
        };

        let period = PeriodKey::for_date(now.date_naive(), habit.periodicity);
        let claims = doc.completed_habits.entry(period.to_string()).or_default();
        if claims.contains_key(habit_name) {
            warn!(habit = habit_name, %period, "bonus habit already claimed this period");
            return Ok(false);
        }
        claims.insert(habit_name.to_string(), username.to_string());

        let total = {
            let record = doc
                .households
                .get_mut(&household)
                .ok_or_else(|| ValidationError::UnknownHousehold(household.clone()))?;
            let entry = record.points.entry(username.to_string()).or_insert(0);
            *entry += u64::from(habit.points);
            *entry
        };
        self.store.save(&doc)?;

        self.update_leaderboard(&household, username, total)?;

        info!(habit = habit_name, username, points = habit.points, "bonus habit claimed");
        Ok(true)
    }

    fn update_leaderboard(&self, household: &str, username: &str, points: u64) -> Result<()> {
        let mut doc = self.store.load();
        doc.leaderboard.update(household, username, points);
        self.store.save(&doc)?;
        Ok(())
    }

    /// Monthly reset using the local date for the archive label.
    pub fn reset_monthly(&self) -> Result<()> {
        self.reset_monthly_on(Local::now().date_naive())
    }

    /// Archive and clear the leaderboard under the month of `today`, and
    /// zero every household's per-user points.
    pub fn reset_monthly_on(&self, today: NaiveDate) -> Result<()> {
        let mut doc = self.store.load();
        doc.leaderboard.reset_monthly(&month_label(today));
        for record in doc.households.values_mut() {
            for points in record.points.values_mut() {
                *points = 0;
            }
        }
        self.store.save(&doc)?;
        info!("monthly reset applied");
        Ok(())
    }

    /// Clear `last_completed_at` on every habit and bonus habit.
    pub fn reset_habits(&self) -> Result<()> {
        let mut doc = self.store.load();
        for habit in doc.habits.iter_mut().chain(doc.bonus_habits.iter_mut()) {
            habit.last_completed_at = None;
        }
        self.store.save(&doc)?;
        info!("all habits reset");
        Ok(())
    }

    /// Overwrite the document with the empty skeleton.
    pub fn clear_data(&self) -> Result<()> {
        self.store.save(&Document::default())?;
        info!("data cleared");
        Ok(())
    }

    /// All habits, regular first, then bonus.
    pub fn load_habits(&self) -> Vec<HabitRecord> {
        let doc = self.store.load();
        doc.habits.into_iter().chain(doc.bonus_habits).collect()
    }

    /// Fetch a habit by name; the regular list is searched before bonus.
    pub fn get_habit(&self, habit_name: &str) -> Option<HabitRecord> {
        let doc = self.store.load();
        doc.habits
            .into_iter()
            .find(|h| h.name == habit_name)
            .or_else(|| {
                doc.bonus_habits
                    .into_iter()
                    .find(|h| h.name == habit_name)
            })
    }

    /// Reconstruct a user (household, points, streaks) from the document.
    pub fn get_user(&self, username: &str) -> Option<User> {
        let doc = self.store.load();
        let household = doc.household_of(username)?.to_string();
        let points = doc
            .households
            .get(&household)
            .and_then(|record| record.points.get(username))
            .copied()
            .unwrap_or(0);
        let mut user = User::with_points(username, &household, points);
        if let Some(streaks) = doc.streaks.get(username) {
            user.streaks = streaks
                .iter()
                .map(|(habit, streak)| (habit.clone(), *streak))
                .collect();
        }
        Some(user)
    }

    /// All members of all households.
    pub fn load_users(&self) -> Vec<User> {
        let doc = self.store.load();
        let mut users = Vec::new();
        for (household, record) in &doc.households {
            for username in &record.members {
                let points = record.points.get(username).copied().unwrap_or(0);
                users.push(User::with_points(username, household, points));
            }
        }
        users
    }

    /// Current sorted rankings for a household (empty when unknown).
    pub fn sorted_rankings(&self, household: &str) -> IndexMap<String, u64> {
        self.store.load().leaderboard.sorted_rankings(household)
    }

    /// The whole leaderboard section, current rankings plus archive.
    pub fn leaderboard(&self) -> Leaderboard {
        self.store.load().leaderboard
    }

    /// Per-period completion counts for a user, from the claim record.
    pub fn completion_history(&self, username: &str) -> Vec<PeriodActivity> {
        let doc = self.store.load();
        doc.completed_habits
            .iter()
            .filter_map(|(period, claims)| {
                let completed = claims.values().filter(|u| u.as_str() == username).count() as u32;
                (completed > 0).then(|| PeriodActivity {
                    period: period.clone(),
                    completed,
                })
            })
            .collect()
    }

    /// Per-period bonus points a user earned, joined against the bonus
    /// habit list.
    pub fn bonus_history(&self, username: &str) -> Vec<PeriodBonus> {
        let doc = self.store.load();
        doc.completed_habits
            .iter()
            .filter_map(|(period, claims)| {
                let points: u64 = claims
                    .iter()
                    .filter(|(_, user)| user.as_str() == username)
                    .filter_map(|(habit, _)| {
                        doc.bonus_habits
                            .iter()
                            .find(|h| &h.name == habit)
                            .map(|h| u64::from(h.points))
                    })
                    .sum();
                (points > 0).then(|| PeriodBonus {
                    period: period.clone(),
                    points,
                })
            })
            .collect()
    }

    /// A user's active streaks as (habit, length) rows.
    pub fn user_streaks(&self, username: &str) -> Vec<StreakRow> {
        let doc = self.store.load();
        let Some(streaks) = doc.streaks.get(username) else {
            return Vec::new();
        };
        streaks
            .iter()
            .filter(|(_, length)| **length > 0)
            .map(|(habit, length)| StreakRow {
                habit: habit.clone(),
                length: *length,
            })
            .collect()
    }
}
