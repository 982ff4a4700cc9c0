use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use neuro_snake::config::AppConfig;
use neuro_snake::modes::{PlayMode, TrainConfig, TrainMode, WatchMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neuro_snake")]
#[command(version, about = "Wrap-around Snake with a learned steering policy")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Grid side length (overrides the config file)
    #[arg(long, global = true)]
    grid_size: Option<usize>,

    /// Seed for food placement and exploration
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write logs here; terminal modes discard them otherwise
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Play snake with keyboard controls
    Play,

    /// Explore, train the policy, save it and evaluate it headless
    Train {
        /// Evaluation episodes after training
        #[arg(long, default_value = "20")]
        episodes: usize,

        /// Where to write the trained policy
        #[arg(long, default_value = "models/policy.json")]
        output: PathBuf,
    },

    /// Watch a policy play; explores and trains live without --policy
    Watch {
        /// Trained policy to load
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

impl Command {
    fn uses_terminal(&self) -> bool {
        !matches!(self, Command::Train { .. })
    }
}

/// Level used when `RUST_LOG` is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing(log_file: Option<&Path>, terminal: bool) -> Result<()> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        // the alternate screen would be garbled by log lines
        None if terminal => builder.with_writer(std::io::sink).try_init(),
        None => builder.try_init(),
    };
    installed.map_err(|err| anyhow!(err)).context("Failed to install tracing subscriber")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.command.uses_terminal())?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if config.merge_with_args(cli.grid_size, cli.seed) {
        config.validate().context("Invalid command line overrides")?;
    }
    info!(?config, "configuration loaded");

    match cli.command {
        Command::Play => {
            let mut play_mode = PlayMode::new(config.game, config.driver);
            play_mode.run().await?;
        }
        Command::Train { episodes, output } => {
            let mut train_config = TrainConfig::new(episodes, output);
            train_config.game = config.game;
            train_config.trainer = config.trainer;

            let mut train_mode = TrainMode::new(train_config)?;
            train_mode.run()?;
        }
        Command::Watch { policy } => {
            let mut watch_mode = WatchMode::new(config.game, config.trainer, config.driver, policy.as_deref())?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
