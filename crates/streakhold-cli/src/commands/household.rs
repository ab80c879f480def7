//! Household management commands for CLI.

use clap::Subcommand;
use streakhold_core::DataManager;

#[derive(Subcommand)]
pub enum HouseholdAction {
    /// Create a new household
    Create {
        /// Household name
        name: String,
    },
}

pub fn run(action: HouseholdAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DataManager::open()?;

    match action {
        HouseholdAction::Create { name } => {
            if manager.create_household(&name)? {
                println!("Household '{name}' created.");
            } else {
                println!("Household '{name}' already exists.");
            }
        }
    }
    Ok(())
}
