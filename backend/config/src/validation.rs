//! Config validation with field paths in every message.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::EncoreConfig;

static BOT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5,12}:[A-Za-z0-9_-]{30,}$").unwrap());

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding through `tracing`.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    /// Fails with the first error when the config cannot be used.
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        match self.errors.first() {
            None => Ok(()),
            Some(first) => anyhow::bail!(
                "config has {} error(s), first at '{}': {}",
                self.errors.len(),
                first.path,
                first.message
            ),
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &EncoreConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_telegram(config, &mut report);
    validate_access(config, &mut report);
    validate_channel_play(config, &mut report);
    validate_thumbnails(config, &mut report);
    validate_transport(config, &mut report);
    report
}

fn validate_telegram(config: &EncoreConfig, report: &mut ValidationReport) {
    match config.telegram.bot_token.as_deref() {
        None | Some("") => report.error("telegram.botToken", "Telegram bot token is required"),
        Some(token) if !BOT_TOKEN_RE.is_match(token) => {
            report.warn("telegram.botToken", "Token does not look like <id>:<secret>")
        }
        Some(_) => {}
    }
}

fn validate_access(config: &EncoreConfig, report: &mut ValidationReport) {
    let banned: HashSet<u64> = config.access.banned_users.iter().copied().collect();
    for sudoer in &config.access.sudoers {
        if banned.contains(sudoer) {
            report.warn(
                "access.sudoers",
                format!("User {sudoer} is both a sudoer and banned; the ban wins"),
            );
        }
    }
}

fn validate_channel_play(config: &EncoreConfig, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (i, link) in config.channel_play.links.iter().enumerate() {
        if !seen.insert(link.group) {
            report.error(
                format!("channelPlay.links[{i}]"),
                format!("Group {} is linked more than once", link.group),
            );
        }
        if link.group == link.channel {
            report.error(
                format!("channelPlay.links[{i}]"),
                "A group cannot be linked to itself",
            );
        }
    }
}

fn validate_thumbnails(config: &EncoreConfig, report: &mut ValidationReport) {
    let thumbs = &config.thumbnails;
    for (path, value) in [
        ("thumbnails.overlayPath", &thumbs.overlay_path),
        ("thumbnails.titleFont", &thumbs.title_font),
        ("thumbnails.bodyFont", &thumbs.body_font),
    ] {
        if !Path::new(value).exists() {
            report.warn(path, format!("{value} does not exist; thumbnails will be skipped"));
        }
    }
    for (path, value) in [
        ("thumbnails.placeholderUrl", &thumbs.placeholder_url),
        ("thumbnails.metadataBaseUrl", &thumbs.metadata_base_url),
    ] {
        if !is_http_url(value) {
            report.error(path, "Must be an http(s) URL");
        }
    }
    if thumbs.watermark.trim().is_empty() {
        report.warn("thumbnails.watermark", "Empty watermark will not be drawn");
    }
}

fn validate_transport(config: &EncoreConfig, report: &mut ValidationReport) {
    if !is_http_url(&config.transport.seek_endpoint) {
        report.error("transport.seekEndpoint", "Must be an http(s) URL");
    }
    match config.transport.ingress_addr.parse::<SocketAddr>() {
        Ok(addr) if !addr.ip().is_loopback() => report.warn(
            "transport.ingressAddr",
            "Ingress has no authentication; bind it to a loopback address",
        ),
        Ok(_) => {}
        Err(_) => report.error("transport.ingressAddr", "Must be a socket address like 127.0.0.1:8090"),
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
