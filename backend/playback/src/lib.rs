//! Playback control for Encore: the per-chat "now playing" store, the seek
//! controller, the HTTP ingress that feeds the store, and adapters for the
//! voice-chat bridge and the video resolver.

pub mod ingress;
pub mod lanes;
pub mod resolver;
pub mod seek;
pub mod store;
pub mod transport;

pub use ingress::serve_ingress;
pub use lanes::SeekService;
pub use resolver::YtDlpResolver;
pub use seek::{parse_offset, plan_seek, SeekController, SeekOutcome, SeekPlan, BOUNDARY_FLOOR_SECONDS, QUICK_SEEK_SECONDS};
pub use store::{PlaybackStore, StoreClosed};
pub use transport::HttpStreamSeeker;
