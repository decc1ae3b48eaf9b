//! Config defaults: default values and relative-path resolution.

use std::path::Path;

use crate::schema::EncoreConfig;

/// Default log level when neither the config nor `RUST_LOG` set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn cache_dir() -> String {
    "cache".to_string()
}

pub fn overlay_path() -> String {
    "assets/overlay.png".to_string()
}

pub fn title_font() -> String {
    "assets/font_title.ttf".to_string()
}

pub fn body_font() -> String {
    "assets/font_body.ttf".to_string()
}

pub fn placeholder_url() -> String {
    "https://telegra.ph/file/6298d377ad3eb46711644.jpg".to_string()
}

pub fn watermark() -> String {
    "@EncoreBot".to_string()
}

pub fn metadata_base_url() -> String {
    "https://inv.nadeko.net".to_string()
}

pub fn seek_endpoint() -> String {
    "http://127.0.0.1:8089/seek".to_string()
}

pub fn ingress_addr() -> String {
    "127.0.0.1:8090".to_string()
}

pub fn yt_dlp_path() -> String {
    "yt-dlp".to_string()
}

/// Apply all defaults to a freshly loaded config.
///
/// Relative asset and cache paths are resolved against `base_dir`, the
/// directory holding the config file.
pub fn apply_all_defaults(config: EncoreConfig, base_dir: &Path) -> EncoreConfig {
    let config = apply_logging_defaults(config, base_dir);
    apply_path_defaults(config, base_dir)
}

fn apply_logging_defaults(mut config: EncoreConfig, base_dir: &Path) -> EncoreConfig {
    if config.logging.level.is_none() {
        config.logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if config.logging.dir.is_none() {
        config.logging.dir = Some(base_dir.join("logs").to_string_lossy().into_owned());
    }
    config
}

fn apply_path_defaults(mut config: EncoreConfig, base_dir: &Path) -> EncoreConfig {
    let thumbs = &mut config.thumbnails;
    for path in [
        &mut thumbs.cache_dir,
        &mut thumbs.overlay_path,
        &mut thumbs.title_font,
        &mut thumbs.body_font,
    ] {
        *path = resolve(base_dir, path);
    }
    if let Some(locale) = config.locale.path.as_mut() {
        *locale = resolve(base_dir, locale);
    }
    config
}

fn resolve(base_dir: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_absolute() {
        path.to_string()
    } else {
        base_dir.join(p).to_string_lossy().into_owned()
    }
}
