//! Habit management and completion commands for CLI.

use clap::Subcommand;
use streakhold_core::{DataManager, Habit, Periodicity};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit with periodicity and points
    Add {
        /// Habit name
        name: String,
        /// daily or weekly
        periodicity: String,
        /// Base points per completion
        points: u32,
    },
    /// Add a bonus habit claimable once per period
    AddBonus {
        /// Habit name
        name: String,
        /// daily or weekly
        periodicity: String,
        /// Base points per claim
        points: u32,
    },
    /// Complete a habit for a user (bonus habits are claimed)
    Complete {
        /// Username
        username: String,
        /// Habit name
        habit: String,
    },
    /// List all habits
    List,
    /// Clear completion stamps on every habit
    Reset,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DataManager::open()?;

    match action {
        HabitAction::Add { name, periodicity, points } => {
            let periodicity: Periodicity = periodicity.parse()?;
            let habit = Habit::new(&name, periodicity, points)?;
            if manager.save_habit(&habit)? {
                println!("Habit '{name}' added as a {periodicity} habit worth {points} points.");
            } else {
                println!("Habit '{name}' already exists.");
            }
        }
        HabitAction::AddBonus { name, periodicity, points } => {
            let periodicity: Periodicity = periodicity.parse()?;
            let habit = Habit::new_bonus(&name, periodicity, points)?;
            if manager.save_bonus_habit(&habit)? {
                println!(
                    "Bonus Habit '{name}' added as a {periodicity} bonus habit worth {points} points!"
                );
            } else {
                println!("Bonus habit '{name}' already exists.");
            }
        }
        HabitAction::Complete { username, habit } => {
            let Some(record) = manager.get_habit(&habit) else {
                println!("Habit '{habit}' not found.");
                return Ok(());
            };

            if record.is_bonus {
                if manager.claim_bonus_habit(&username, &habit)? {
                    println!("Bonus Habit '{habit}' claimed by '{username}'.");
                } else {
                    println!(
                        "Bonus Habit '{habit}' is already taken or unavailable for this period."
                    );
                }
            } else if manager.complete_habit(&username, &habit)? {
                println!("'{habit}' completed by '{username}'. Points updated!");
            } else {
                println!("'{habit}' could not be completed.");
            }
        }
        HabitAction::List => {
            let habits = manager.load_habits();
            if habits.is_empty() {
                println!("No habits found.");
                return Ok(());
            }
            println!("Tracked Habits:");
            for habit in habits {
                let kind = if habit.is_bonus { "Bonus Habit" } else { "Habit" };
                println!(
                    "- {} ({}, {} points) [{}]",
                    habit.name, habit.periodicity, habit.points, kind
                );
                match habit.last_completed_at {
                    Some(at) => println!("  Last completed: {}", at.format("%Y-%m-%d %H:%M:%S")),
                    None => println!("  Not completed yet"),
                }
            }
        }
        HabitAction::Reset => {
            manager.reset_habits()?;
            println!("All habits have been reset.");
        }
    }
    Ok(())
}
