//! Caller authorization for seek controls.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use encore_config::AccessConfig;
use encore_core::{ChatId, ChatMemberLookup, UserId};
use teloxide::prelude::*;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Banned,
    /// Not a sudoer and lacks the "manage video chats" admin right.
    MissingPrivilege,
}

/// Decides who may seek: the denylist wins, then sudoers, then chat admins
/// with the video-chat right.
pub struct CallerAuthorization {
    banned: HashSet<UserId>,
    sudoers: HashSet<UserId>,
    lookup: Arc<dyn ChatMemberLookup>,
}

impl CallerAuthorization {
    pub fn new(access: &AccessConfig, lookup: Arc<dyn ChatMemberLookup>) -> Self {
        Self {
            banned: access.banned_users.iter().copied().collect(),
            sudoers: access.sudoers.iter().copied().collect(),
            lookup,
        }
    }

    pub fn is_banned(&self, user_id: UserId) -> bool {
        self.banned.contains(&user_id)
    }

    pub async fn check(&self, chat_id: ChatId, user_id: UserId) -> AuthDecision {
        if self.is_banned(user_id) {
            return AuthDecision::Banned;
        }
        if self.sudoers.contains(&user_id) {
            return AuthDecision::Allowed;
        }
        match self.lookup.can_manage_video_chats(chat_id, user_id).await {
            Ok(true) => AuthDecision::Allowed,
            Ok(false) => AuthDecision::MissingPrivilege,
            Err(e) => {
                warn!(chat_id, user_id, error = %e, "Chat member lookup failed");
                AuthDecision::MissingPrivilege
            }
        }
    }
}

/// Member lookups through the Bot API.
pub struct TelegramMemberLookup {
    bot: Bot,
}

impl TelegramMemberLookup {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatMemberLookup for TelegramMemberLookup {
    async fn can_manage_video_chats(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        let member = self
            .bot
            .get_chat_member(teloxide::types::ChatId(chat_id), teloxide::types::UserId(user_id))
            .await?;
        Ok(member.kind.can_manage_video_chats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeLookup {
        admins: Vec<(ChatId, UserId)>,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(admins: Vec<(ChatId, UserId)>) -> Arc<Self> {
            Arc::new(Self {
                admins,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatMemberLookup for FakeLookup {
        async fn can_manage_video_chats(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if chat_id == -999 {
                anyhow::bail!("chat not found");
            }
            Ok(self.admins.contains(&(chat_id, user_id)))
        }
    }

    fn access(banned: Vec<UserId>, sudoers: Vec<UserId>) -> AccessConfig {
        AccessConfig {
            banned_users: banned,
            sudoers,
        }
    }

    #[tokio::test]
    async fn banned_wins_over_sudo() {
        let lookup = FakeLookup::new(vec![]);
        let auth = CallerAuthorization::new(&access(vec![7], vec![7]), lookup.clone());
        assert_eq!(auth.check(-100, 7).await, AuthDecision::Banned);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sudoers_skip_the_member_lookup() {
        let lookup = FakeLookup::new(vec![]);
        let auth = CallerAuthorization::new(&access(vec![], vec![42]), lookup.clone());
        assert_eq!(auth.check(-100, 42).await, AuthDecision::Allowed);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_admins_need_the_video_chat_right() {
        let lookup = FakeLookup::new(vec![(-100, 5)]);
        let auth = CallerAuthorization::new(&access(vec![], vec![]), lookup);
        assert_eq!(auth.check(-100, 5).await, AuthDecision::Allowed);
        assert_eq!(auth.check(-100, 6).await, AuthDecision::MissingPrivilege);
        assert_eq!(auth.check(-200, 5).await, AuthDecision::MissingPrivilege);
    }

    #[tokio::test]
    async fn lookup_errors_deny() {
        let lookup = FakeLookup::new(vec![(-999, 5)]);
        let auth = CallerAuthorization::new(&access(vec![], vec![]), lookup);
        assert_eq!(auth.check(-999, 5).await, AuthDecision::MissingPrivilege);
    }
}
