//! Direct stream URL resolution through `yt-dlp`.

use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use encore_core::{ResolveError, VideoResolver};
use tokio::process::Command;
use tracing::{debug, warn};

/// Best muxed format no larger than 720p, matching what the bridge streams.
const FORMAT: &str = "best[height<=?720][width<=?1280]";

pub struct YtDlpResolver {
    binary: String,
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

#[async_trait]
impl VideoResolver for YtDlpResolver {
    async fn resolve(&self, video_id: &str, direct: bool) -> Result<String, ResolveError> {
        let url = format!("https://www.youtube.com/watch?v={video_id}");
        let mut cmd = Command::new(&self.binary);
        if direct {
            cmd.arg("-g");
        }
        let output = cmd
            .args(["-f", FORMAT, "--no-warnings", "--", &url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(video_id, stderr = %stderr.trim(), "yt-dlp exited with an error");
            return Err(ResolveError::NotFound(video_id.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match first_line(&stdout) {
            Some(line) => {
                debug!(video_id, "Resolved direct stream URL");
                Ok(line.to_string())
            }
            None => Err(ResolveError::NotFound(video_id.to_string())),
        }
    }
}

fn first_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_non_empty_line() {
        assert_eq!(first_line("\nhttps://a\nhttps://b\n"), Some("https://a"));
        assert_eq!(first_line("  \n"), None);
    }

    #[tokio::test]
    async fn missing_binary_is_a_backend_error() {
        let resolver = YtDlpResolver::new("/nonexistent/yt-dlp-binary");
        let err = resolver.resolve("abc", true).await.unwrap_err();
        assert!(matches!(err, ResolveError::Backend(_)));
    }
}
