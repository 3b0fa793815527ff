//! MemeVault - content-addressed meme registry for chat channels

use anyhow::Result;
use clap::{Parser, Subcommand};
use memevault::{bot::Bot, config::MemeVaultConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "memevault")]
#[command(version)]
#[command(about = "Content-addressed meme registry for chat channels")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MEMEVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot
    Run {
        /// Override the data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("memevault={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = cli.config {
        let content = std::fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        MemeVaultConfig::default()
    };

    match cli.command {
        Commands::Run { data_dir } => {
            run_bot(config, data_dir).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_bot(mut config: MemeVaultConfig, data_dir: Option<PathBuf>) -> Result<()> {
    if let Some(data_dir) = data_dir {
        config.storage.data_dir = data_dir;
    }

    let bot = Bot::new(config).await?;
    bot.start().await?;

    tracing::info!("MemeVault is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    bot.stop().await?;

    Ok(())
}

fn show_config(config: Option<&MemeVaultConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
