//! Telegram adapter: `/seek` family commands and the inline seek buttons.

use std::sync::Arc;

use anyhow::Context;
use encore_config::{ChannelPlayConfig, EncoreConfig};
use encore_core::SeekDirection;
use encore_playback::{parse_offset, SeekService};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::utils::html;
use tracing::{debug, info, warn};

use crate::auth::{AuthDecision, CallerAuthorization, TelegramMemberLookup};
use crate::command::detect_seek_command;
use crate::locale::Locale;
use crate::replies::{command_error, command_reply, quick_reply};

pub const CB_SEEK_FORWARD: &str = "seek_forward_20";
pub const CB_SEEK_BACKWARD: &str = "seek_backward_20";
pub const CB_CLOSE: &str = "close";

/// Shared state handed to every update handler.
pub struct BotContext {
    pub seeks: SeekService,
    pub auth: CallerAuthorization,
    pub locale: Locale,
    pub channel_play: ChannelPlayConfig,
    pub bot_username: String,
}

pub struct TelegramAdapter {
    bot: Bot,
}

impl TelegramAdapter {
    pub fn new(token: String) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    /// Long-poll until interrupted.
    pub async fn start(
        &self,
        seeks: SeekService,
        config: &EncoreConfig,
        locale: Locale,
    ) -> anyhow::Result<()> {
        let me = self.bot.get_me().await.context("Failed to reach the Bot API")?;
        info!(username = %me.username(), "Starting Telegram adapter");

        let lookup = Arc::new(TelegramMemberLookup::new(self.bot.clone()));
        let ctx = Arc::new(BotContext {
            seeks,
            auth: CallerAuthorization::new(&config.access, lookup),
            locale,
            channel_play: config.channel_play.clone(),
            bot_username: me.username().to_string(),
        });

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![ctx])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(cmd) = detect_seek_command(text, &ctx.bot_username) else {
        return Ok(());
    };
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        return Ok(());
    }
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let group_id = msg.chat.id.0;
    info!(chat_id = group_id, user_id = user.id.0, command = %cmd.name, "Seek command");

    match ctx.auth.check(group_id, user.id.0).await {
        AuthDecision::Allowed => {}
        AuthDecision::Banned => {
            debug!(user_id = user.id.0, "Ignoring command from banned user");
            return Ok(());
        }
        AuthDecision::MissingPrivilege => {
            bot.send_message(msg.chat.id, ctx.locale.get("quick_no_privilege"))
                .await?;
            return Ok(());
        }
    }

    let Some(target_chat) = resolve_target_chat(&ctx.channel_play, group_id, cmd.channel_mode)
    else {
        bot.send_message(msg.chat.id, ctx.locale.get("channel_play_not_set"))
            .await?;
        return Ok(());
    };

    if let Err(err) = parse_offset(cmd.raw_offset.as_deref()) {
        bot.send_message(msg.chat.id, command_error(&ctx.locale, &err))
            .await?;
        return Ok(());
    }

    let progress = bot
        .send_message(msg.chat.id, ctx.locale.get("seek_in_progress"))
        .await?;

    let result = ctx
        .seeks
        .seek(target_chat, cmd.raw_offset.as_deref(), cmd.direction)
        .await;
    let mention = html::user_mention(user.id, &html::escape(&user.full_name()));
    let markup = if result.is_ok() {
        seek_markup(&ctx.locale)
    } else {
        close_markup(&ctx.locale)
    };

    bot.edit_message_text(msg.chat.id, progress.id, command_reply(&ctx.locale, &result, &mention))
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;
    Ok(())
}

/// What a callback query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Close,
    QuickSeek(SeekDirection),
    /// Missing or unrecognized data. Still answered so the button stops spinning.
    Ignore,
}

pub fn classify_callback(data: Option<&str>) -> CallbackAction {
    match data {
        Some(CB_CLOSE) => CallbackAction::Close,
        Some(other) => quick_direction(other).map_or(CallbackAction::Ignore, CallbackAction::QuickSeek),
        None => CallbackAction::Ignore,
    }
}

async fn handle_callback(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let alert = match (classify_callback(q.data.as_deref()), q.message.as_ref()) {
        (CallbackAction::Close, Some(message)) => {
            let chat_id = message.chat().id;
            if let Err(e) = bot.delete_message(chat_id, message.id()).await {
                debug!(chat_id = chat_id.0, error = %e, "Close button could not delete message");
            }
            None
        }
        (CallbackAction::QuickSeek(direction), Some(message)) => {
            let chat_id = message.chat().id.0;
            Some(match ctx.auth.check(chat_id, q.from.id.0).await {
                AuthDecision::Banned => ctx.locale.get("quick_banned").to_string(),
                AuthDecision::MissingPrivilege => ctx.locale.get("quick_no_privilege").to_string(),
                AuthDecision::Allowed => {
                    let result = ctx.seeks.quick_seek(chat_id, direction).await;
                    if let Err(e) = &result {
                        warn!(chat_id, %direction, error = %e, "Quick seek not applied");
                    }
                    quick_reply(&ctx.locale, direction, &result)
                }
            })
        }
        (action, _) => {
            debug!(?action, data = ?q.data, "Ignoring callback query");
            None
        }
    };

    let answer = bot.answer_callback_query(q.id.clone());
    match alert {
        Some(text) => answer.text(text).show_alert(true).await?,
        None => answer.await?,
    };
    Ok(())
}

/// The chat a command acts on: the group itself, or its linked channel.
pub fn resolve_target_chat(
    channel_play: &ChannelPlayConfig,
    group_id: i64,
    channel_mode: bool,
) -> Option<i64> {
    if channel_mode {
        channel_play.linked_channel(group_id)
    } else {
        Some(group_id)
    }
}

pub fn quick_direction(data: &str) -> Option<SeekDirection> {
    match data {
        CB_SEEK_FORWARD => Some(SeekDirection::Forward),
        CB_SEEK_BACKWARD => Some(SeekDirection::Backward),
        _ => None,
    }
}

pub fn close_markup(locale: &Locale) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
        locale.get("button_close"),
        CB_CLOSE,
    )]])
}

/// Quick seek buttons above a close button.
pub fn seek_markup(locale: &Locale) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback(locale.get("button_back_20"), CB_SEEK_BACKWARD),
            InlineKeyboardButton::callback(locale.get("button_forward_20"), CB_SEEK_FORWARD),
        ],
        vec![InlineKeyboardButton::callback(locale.get("button_close"), CB_CLOSE)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_config::ChannelLink;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn channel_mode_uses_linked_channel() {
        let links = ChannelPlayConfig {
            links: vec![ChannelLink {
                group: -100,
                channel: -200,
            }],
        };
        assert_eq!(resolve_target_chat(&links, -100, false), Some(-100));
        assert_eq!(resolve_target_chat(&links, -100, true), Some(-200));
        assert_eq!(resolve_target_chat(&links, -300, true), None);
    }

    #[test]
    fn callback_data_maps_to_direction() {
        assert_eq!(quick_direction("seek_forward_20"), Some(SeekDirection::Forward));
        assert_eq!(quick_direction("seek_backward_20"), Some(SeekDirection::Backward));
        assert_eq!(quick_direction("close"), None);
    }

    #[test]
    fn unrecognized_callbacks_are_still_answered() {
        assert_eq!(classify_callback(Some(CB_CLOSE)), CallbackAction::Close);
        assert_eq!(
            classify_callback(Some(CB_SEEK_BACKWARD)),
            CallbackAction::QuickSeek(SeekDirection::Backward)
        );
        assert_eq!(classify_callback(Some("stale_button_v1")), CallbackAction::Ignore);
        assert_eq!(classify_callback(Some("")), CallbackAction::Ignore);
        assert_eq!(classify_callback(None), CallbackAction::Ignore);
    }

    #[test]
    fn seek_markup_carries_quick_actions() {
        let markup = seek_markup(&Locale::english());
        let data: Vec<String> = markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(data, vec![CB_SEEK_BACKWARD, CB_SEEK_FORWARD, CB_CLOSE]);
    }
}
