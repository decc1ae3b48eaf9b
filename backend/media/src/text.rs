//! Text preparation for the thumbnail card.

use std::sync::LazyLock;

use encore_core::VideoMetadata;
use regex::Regex;

/// Title and channel are cut to this many characters before rendering.
pub const MAX_LABEL_CHARS: usize = 20;

pub const TITLE_MAX_WIDTH: u32 = 600;
pub const TITLE_MAX_SIZE: u32 = 42;
pub const TITLE_MIN_SIZE: u32 = 28;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// The strings drawn on a thumbnail, already cleaned and truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailCard {
    pub title: String,
    /// `"{channel} • {views}"`
    pub info: String,
    /// `"00:00 / {duration}"`
    pub time: String,
}

impl ThumbnailCard {
    pub fn from_metadata(meta: &VideoMetadata) -> Self {
        let title = meta
            .title
            .as_deref()
            .map(clean_title)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unsupported Title".to_string());
        let channel = meta.channel.as_deref().unwrap_or("Unknown Channel");
        let views = meta.views.as_deref().unwrap_or("Unknown Views");
        let duration = meta.duration.as_deref().unwrap_or("00:00");

        Self {
            title: truncate_label(&title),
            info: format!("{} • {}", truncate_label(channel), views),
            time: time_display(duration),
        }
    }
}

/// Collapse runs of non-word characters to a space and title-case the result.
pub fn clean_title(raw: &str) -> String {
    let spaced = NON_WORD_RE.replace_all(raw, " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_cased = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out.trim().to_string()
}

/// Keep the first [`MAX_LABEL_CHARS`] characters, appending `...` if anything was cut.
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_LABEL_CHARS).collect();
    format!("{head}...")
}

/// `"00:00 / {duration}"`. A bare seconds label is prefixed with `00:` and
/// padded to two digits, but never reflowed into minutes.
pub fn time_display(duration: &str) -> String {
    let duration = if duration.contains(':') {
        duration.to_string()
    } else {
        format!("00:{duration:0>2}")
    };
    format!("00:00 / {duration}")
}

/// Largest size in `[min, max]` whose rendered width fits `max_width`,
/// searched downward one point at a time. Falls back to `min`.
pub fn fit_font_size(max: u32, min: u32, max_width: u32, measure: impl Fn(u32) -> u32) -> u32 {
    (min..=max)
        .rev()
        .find(|&size| measure(size) <= max_width)
        .unwrap_or(min)
}

/// Strip the query string from an artwork URL.
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
