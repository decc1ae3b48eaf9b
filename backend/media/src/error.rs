use thiserror::Error;

/// Any failure while building a thumbnail. The public entry point collapses
/// all of these into "no thumbnail".
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(#[source] anyhow::Error),

    #[error("artwork download failed: {0}")]
    DownloadFailed(String),

    #[error("render failed: {0}")]
    RenderFailed(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
