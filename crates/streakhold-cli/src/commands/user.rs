//! User management commands for CLI.

use clap::Subcommand;
use streakhold_core::DataManager;

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user to a household
    Add {
        /// Username
        username: String,
        /// Household the user joins
        household: String,
    },
    /// List all users
    List,
    /// Show a single user
    Show {
        /// Username
        username: String,
    },
    /// Show a user's completion history, bonus history, and streaks
    History {
        /// Username
        username: String,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DataManager::open()?;

    match action {
        UserAction::Add { username, household } => match manager.add_user(&username, &household) {
            Ok(true) => println!("User '{username}' added to household '{household}'"),
            Ok(false) => println!("User '{username}' is already in household '{household}'."),
            Err(e) => println!("Error: {e}"),
        },
        UserAction::List => {
            let users = manager.load_users();
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            for user in users {
                println!("- {} ({}, {} points)", user.username, user.household, user.points);
            }
        }
        UserAction::Show { username } => match manager.get_user(&username) {
            Some(user) => {
                println!("{} ({}, {} points)", user.username, user.household, user.points)
            }
            None => println!("User '{username}' not found."),
        },
        UserAction::History { username } => {
            if manager.get_user(&username).is_none() {
                println!("User '{username}' not found.");
                return Ok(());
            }

            let completions = manager.completion_history(&username);
            if completions.is_empty() {
                println!("No completions recorded for '{username}'.");
            } else {
                println!("Completions for '{username}':");
                for entry in completions {
                    println!("- {}: {} habit(s)", entry.period, entry.completed);
                }
            }

            let bonuses = manager.bonus_history(&username);
            if !bonuses.is_empty() {
                println!("Bonus points for '{username}':");
                for entry in bonuses {
                    println!("- {}: {} points", entry.period, entry.points);
                }
            }

            let streaks = manager.user_streaks(&username);
            if !streaks.is_empty() {
                println!("Active streaks for '{username}':");
                for row in streaks {
                    println!("- {}: {}", row.habit, row.length);
                }
            }
        }
    }
    Ok(())
}
