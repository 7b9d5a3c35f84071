use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eyecare_core::{AppConfig, AppData, SystemClock};
use tracing::error;

mod commands;

#[derive(Parser)]
#[command(name = "eyecare-ctl")]
#[command(about = "EyeCare tracker command line tool", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to the configuration file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    Exercise {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    Track {
        #[command(subcommand)]
        action: TrackAction,
    },

    /// Compute and store today's health score
    Score {
        #[arg(long, help = "Show the breakdown without storing it")]
        preview: bool,
    },

    /// Show the current week
    Week,

    /// Show a month summary
    Month {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        year: i32,
    },

    /// Reset all activity data, keeping the user profile
    Reset {
        #[arg(long, help = "Confirm the reset")]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    Create {
        name: String,
        #[arg(short, long)]
        email: Option<String>,
    },
    Show,
    Settings(commands::user::SettingsArgs),
}

#[derive(Subcommand)]
enum ExerciseAction {
    List,
    Show {
        #[arg(help = "Exercise ID or type, e.g. eye-rolling")]
        exercise: String,
    },
    Start {
        #[arg(help = "Exercise ID or type, e.g. eye-rolling")]
        exercise: String,
    },
    Complete {
        session_id: String,
        #[arg(long, help = "Mark the exercise as stopped before the end")]
        partial: bool,
    },
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum TrackAction {
    ScreenTime {
        minutes: f64,
        #[arg(short, long, default_value = "other", help = "work, entertainment, social or other")]
        category: String,
    },
    BlinkRate {
        #[arg(help = "Blinks per minute")]
        rate: f64,
        #[arg(short, long, default_value_t = 60, help = "Measurement length in seconds")]
        duration: u64,
    },
    Exercise {
        #[arg(help = "Exercise ID or type, e.g. eye-rolling")]
        exercise: String,
        #[arg(short, long, default_value_t = 60)]
        seconds: u64,
        #[arg(long, help = "Mark the exercise as stopped before the end")]
        partial: bool,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    init_tracing(&config.general.log_level);
    config.validate()?;

    let app = match AppData::open(&config, Arc::new(SystemClock)).await {
        Ok(app) => app,
        Err(e) => {
            error!("Initialization error: {}", e);
            eprintln!("Error initializing app data. Please try restarting the app.");
            std::process::exit(1);
        }
    };

    let json = cli.json;
    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create { name, email } => commands::user::create(&app, &name, email).await?,
            UserAction::Show => commands::user::show(&app, json).await?,
            UserAction::Settings(args) => commands::user::settings(&app, args).await?,
        },
        Commands::Exercise { action } => match action {
            ExerciseAction::List => commands::exercise::list(&app, json).await?,
            ExerciseAction::Show { exercise } => {
                commands::exercise::show(&app, &exercise, json).await?
            }
            ExerciseAction::Start { exercise } => commands::exercise::start(&app, &exercise).await?,
            ExerciseAction::Complete { session_id, partial } => {
                commands::exercise::complete(&app, &session_id, partial).await?
            }
            ExerciseAction::History { limit } => {
                commands::exercise::history(&app, limit, json).await?
            }
        },
        Commands::Track { action } => match action {
            TrackAction::ScreenTime { minutes, category } => {
                commands::track::screen_time(&app, minutes, &category).await?
            }
            TrackAction::BlinkRate { rate, duration } => {
                commands::track::blink_rate(&app, rate, duration).await?
            }
            TrackAction::Exercise { exercise, seconds, partial } => {
                commands::track::exercise(&app, &exercise, seconds, partial).await?
            }
        },
        Commands::Score { preview } => commands::report::score(&app, preview, json).await?,
        Commands::Week => commands::report::week(&app, json).await?,
        Commands::Month { month, year } => commands::report::month(&app, month, year, json).await?,
        Commands::Reset { yes } => commands::report::reset(&app, yes).await?,
    }

    Ok(())
}
