//! Leaderboard commands for CLI.

use clap::Subcommand;
use streakhold_core::DataManager;

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// View the current leaderboard for a household
    View {
        /// Household name
        household: String,
    },
    /// Archive current rankings and zero points for a new month
    ResetMonthly,
    /// Show the top performer of each archived month
    TopPerformers,
    /// Show all archived monthly rankings
    PastRankings,
}

pub fn run(action: LeaderboardAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DataManager::open()?;

    match action {
        LeaderboardAction::View { household } => {
            let rankings = manager.sorted_rankings(&household);
            if rankings.is_empty() {
                println!("No rankings available for household '{household}'.");
                return Ok(());
            }
            println!("Leaderboard for '{household}':");
            for (rank, (username, points)) in rankings.iter().enumerate() {
                println!("{}. {} - {} points", rank + 1, username, points);
            }
        }
        LeaderboardAction::ResetMonthly => {
            manager.reset_monthly()?;
            println!("Monthly rankings have been archived and reset.");
        }
        LeaderboardAction::TopPerformers => {
            let board = manager.leaderboard();
            let performers = board.top_performers();
            if performers.is_empty() {
                println!("No top performers recorded yet.");
                return Ok(());
            }
            println!("Top performers:");
            for entry in performers {
                if let Some(top_user) = &entry.top_user {
                    println!("- {}: {} ({} points)", entry.month, top_user, entry.points);
                }
            }
        }
        LeaderboardAction::PastRankings => {
            let board = manager.leaderboard();
            let archive = board.past_rankings();
            if archive.is_empty() {
                println!("No past rankings recorded yet.");
                return Ok(());
            }
            for entry in archive {
                println!("{}:", entry.month);
                if let Some(snapshot) = &entry.rankings {
                    for (household, rankings) in snapshot {
                        println!("  {household}:");
                        for (rank, (username, points)) in rankings.iter().enumerate() {
                            println!("    {}. {} - {} points", rank + 1, username, points);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
