//! `encore-config` — configuration for the Encore bot.
//!
//! Provides:
//! - Typed config schema (telegram, access lists, thumbnails, transport, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Default values and relative-path resolution
//! - Validation with per-field warnings and errors

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, read_config_value};
pub use schema::{
    AccessConfig, ChannelLink, ChannelPlayConfig, EncoreConfig, LocaleConfig, LoggingConfig,
    ResolverConfig, TelegramConfig, ThumbnailsConfig, TransportConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults and validate it.
///
/// Returns the report alongside the config so callers decide whether errors
/// are fatal.
pub async fn load_and_validate(path: &Path) -> Result<(EncoreConfig, ValidationReport)> {
    let raw = read_config_value(path).await?;
    let value = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;

    let config: EncoreConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = apply_all_defaults(config, base_dir);
    let report = validate(&config);
    Ok((config, report))
}
