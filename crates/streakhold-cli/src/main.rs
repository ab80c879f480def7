use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "streakhold", version, about = "Streakhold habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Household management
    Household {
        #[command(subcommand)]
        action: commands::household::HouseholdAction,
    },
    /// User management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Habit management and completion
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Leaderboard views and monthly reset
    Leaderboard {
        #[command(subcommand)]
        action: commands::leaderboard::LeaderboardAction,
    },
    /// Data file management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Household { action } => commands::household::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Leaderboard { action } => commands::leaderboard::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
