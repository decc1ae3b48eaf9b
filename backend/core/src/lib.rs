pub mod error;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{ResolveError, SeekError, TransportError};
pub use time::seconds_to_min;
pub use traits::{BlobFetcher, ChatMemberLookup, MetadataSearch, StreamSeeker, VideoResolver};
pub use types::{
    ChatId, FetchedBlob, MediaSource, PlaybackState, SeekDirection, SeekTarget, SourceKind,
    StreamKind, UserId, VideoMetadata,
};
