//! Data file management commands for CLI.

use clap::Subcommand;
use streakhold_core::DataManager;

#[derive(Subcommand)]
pub enum DataAction {
    /// Reset the data file to the empty skeleton
    Clear,
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DataManager::open()?;

    match action {
        DataAction::Clear => {
            manager.clear_data()?;
            println!("Data has been cleared.");
        }
    }
    Ok(())
}
