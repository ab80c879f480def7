//! # Streakhold Core Library
//!
//! Core business logic for Streakhold, a household habit tracker. All
//! operations are available via a standalone CLI binary; this library is
//! the whole application minus argument parsing and output formatting.
//!
//! ## Architecture
//!
//! - **Domain**: habits with daily/weekly cadence, users with completion
//!   history and streaks, households, and a per-household leaderboard
//!   with a monthly archive
//! - **Storage**: the entire application state is one JSON document on
//!   disk; every mutation is a full load -> mutate -> save cycle
//! - **Orchestration**: [`DataManager`] ties the domain to the store and
//!   is the one entry point commands go through
//!
//! ## Key Components
//!
//! - [`Habit`]: completion rules and point calculation
//! - [`User`]: completion history and streak recomputation
//! - [`Leaderboard`]: ranking maps and the monthly archive
//! - [`DataManager`]: load/mutate/save orchestration

pub mod error;
pub mod habit;
pub mod household;
pub mod leaderboard;
pub mod manager;
pub mod period;
pub mod store;
pub mod user;

pub use error::{CoreError, Result, StoreError, ValidationError};
pub use habit::{CompletionOutcome, Habit, HabitRecord, Periodicity};
pub use household::Household;
pub use leaderboard::{ArchiveEntry, Leaderboard, RankingsSnapshot};
pub use manager::{DataManager, PeriodActivity, PeriodBonus, StreakRow};
pub use period::{month_label, PeriodKey};
pub use store::{DataStore, Document, HouseholdRecord};
pub use user::User;
