mod check_config_cmd;
mod serve;
mod thumb_cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encore_config::{config_dir, config_file_path, defaults, load_and_validate, EncoreConfig};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore — voice-chat seek controls and now-playing thumbnails for Telegram")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $ENCORE_CONFIG_DIR/config.yaml or ~/.encore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot
    Serve,
    /// Render the now-playing thumbnail for one video and print its path
    Thumb {
        /// Video id, e.g. dQw4w9WgXcQ
        video_id: String,
    },
    /// Validate the configuration and report problems
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Serve => {
            let config = load_for_runtime(&path).await?;
            serve::run(config).await?;
        }
        Commands::Thumb { video_id } => {
            let config = load_for_runtime(&path).await?;
            thumb_cmd::run(&config, &video_id).await?;
        }
        Commands::CheckConfig => check_config_cmd::run(&path).await?,
    }

    Ok(())
}

/// Load the config, start logging with its settings, then surface the report.
async fn load_for_runtime(path: &Path) -> Result<EncoreConfig> {
    let (config, report) = load_and_validate(path).await?;

    let level = config
        .logging
        .level
        .as_deref()
        .unwrap_or(defaults::DEFAULT_LOG_LEVEL);
    let log_dir = config.logging.dir.as_deref().unwrap_or("logs");
    encore_logging::init_logger(log_dir, level, config.logging.json);

    report.log();
    report
        .ensure_valid()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}
