//! "Now playing" thumbnail generation.
//!
//! Metadata and cover art are fetched for a video, laid out relative to the
//! transparent window of an overlay template, and rendered to a PNG in the
//! cache directory.

pub mod composer;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod metadata;
pub mod render;
pub mod text;

pub use composer::{ThumbnailComposer, ThumbnailSettings};
pub use error::ThumbnailError;
pub use fetch::HttpBlobFetcher;
pub use layout::{derive_content_box, CardLayout, Rect};
pub use metadata::InvidiousSearch;
pub use text::ThumbnailCard;
