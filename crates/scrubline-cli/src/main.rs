use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrubline_core::AppConfig;

mod commands;

use commands::simulate::Scenario;

#[derive(Parser)]
#[command(name = "scrubline")]
#[command(author, version, about = "Scrub timelines with drag velocity and inertial decay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal demo
    Run,
    /// Drive a controller headlessly and print every frame
    Simulate {
        /// Input script to play
        #[arg(short, long, value_enum, default_value_t = Scenario::Fling)]
        scenario: Scenario,
        /// Maximum number of frames to run
        #[arg(short, long, default_value_t = 120)]
        ticks: u64,
        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
        /// Pace frames in real time instead of stepping as fast as possible
        #[arg(long)]
        realtime: bool,
        /// Decay easing by name, overriding the config (e.g. ease-out-quint)
        #[arg(short, long)]
        easing: Option<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    match cli.command {
        Some(Commands::Run) | None => {
            // The TUI owns the terminal, so logs go to a file
            let log_path = config.log_path();
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            scenario,
            ticks,
            json,
            realtime,
            easing,
        }) => commands::simulate::run(&config, scenario, ticks, json, realtime, easing.as_deref()).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
