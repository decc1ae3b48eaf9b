//! Config file location and reading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Encore config directory.
/// Priority: `ENCORE_CONFIG_DIR` env > `~/.encore/` > `./.encore`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ENCORE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".encore"),
        None => PathBuf::from(".encore"),
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the YAML config as an untyped JSON value tree, ready for env
/// substitution. A missing or empty file yields an empty object.
pub async fn read_config_value(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let value = read_config_value(&dir.path().join("nope.yaml")).await.unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn empty_file_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        let value = read_config_value(&path).await.unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_pipeline_applies_env_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(
            &path,
            "telegram:\n  botToken: \"${ENCORE_TEST_TOKEN}\"\nthumbnails:\n  cacheDir: thumbs\n",
        )
        .unwrap();
        std::env::set_var("ENCORE_TEST_TOKEN", "123456789:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

        let (config, report) = crate::load_and_validate(&path).await.unwrap();
        assert_eq!(
            config.telegram.bot_token.as_deref(),
            Some("123456789:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
        );
        assert!(config.thumbnails.cache_dir.ends_with("thumbs"));
        assert!(report.is_valid(), "{:?}", report.errors);
    }
}
