//! `encore-channels` — the Telegram front end.
//!
//! Parses the seek commands, gates callers, runs seeks through the per-chat
//! lanes and renders the localized replies.

pub mod auth;
pub mod command;
pub mod locale;
pub mod replies;
pub mod telegram;

pub use auth::{AuthDecision, CallerAuthorization, TelegramMemberLookup};
pub use command::{detect_seek_command, SeekCommand};
pub use locale::Locale;
pub use telegram::{BotContext, TelegramAdapter};
