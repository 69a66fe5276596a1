use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Discord returns at most this many bans per request.
const BAN_PAGE_SIZE: usize = 1000;

/// Process-local view of the guild's ban list.
///
/// Seeded from Discord once the gateway is ready and kept current by the
/// ban/unban commands and gateway events. Lookups made before the first
/// refresh finishes may miss existing bans.
#[derive(Clone, Debug, Default)]
pub struct BanCache {
    banned: Arc<RwLock<HashSet<u64>>>,
}

impl BanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_banned(&self, user_id: u64) -> bool {
        self.banned.read().await.contains(&user_id)
    }

    pub async fn ban(&self, user_id: u64) {
        self.banned.write().await.insert(user_id);
    }

    pub async fn unban(&self, user_id: u64) {
        self.banned.write().await.remove(&user_id);
    }

    pub async fn len(&self) -> usize {
        self.banned.read().await.len()
    }

    /// Swap in a complete ban list.
    pub async fn replace(&self, banned: HashSet<u64>) {
        *self.banned.write().await = banned;
    }

    /// Re-fetch the full ban list and replace the cached set with it. On
    /// failure the current set is left untouched.
    pub async fn refresh(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
    ) -> anyhow::Result<usize> {
        let banned = fetch_banned_user_ids(http, guild_id).await?;
        let count = banned.len();
        self.replace(banned).await;
        Ok(count)
    }

    /// Refresh in the background; failures are logged and otherwise ignored.
    pub fn spawn_refresh(
        &self,
        http: Arc<serenity::Http>,
        guild_id: serenity::GuildId,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            match cache.refresh(&http, guild_id).await {
                Ok(count) => info!(count, guild_id = %guild_id, "ban cache loaded"),
                Err(err) => warn!(?err, guild_id = %guild_id, "failed to refresh ban cache; keeping previous entries"),
            }
        })
    }
}

async fn fetch_banned_user_ids(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
) -> anyhow::Result<HashSet<u64>> {
    let mut banned = HashSet::new();
    let mut after: Option<serenity::UserId> = None;

    loop {
        let page = guild_id
            .bans(http, after.map(serenity::UserPagination::After), None)
            .await
            .context("failed to fetch guild ban list")?;

        banned.extend(page.iter().map(|ban| ban.user.id.get()));

        let last_seen = page.iter().map(|ban| ban.user.id).max();
        match last_seen {
            Some(last_seen) if page.len() >= BAN_PAGE_SIZE => after = Some(last_seen),
            _ => break,
        }
    }

    Ok(banned)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::BanCache;

    #[tokio::test]
    async fn ban_then_unban() {
        let cache = BanCache::new();
        assert!(!cache.is_banned(42).await);

        cache.ban(42).await;
        assert!(cache.is_banned(42).await);

        cache.unban(42).await;
        assert!(!cache.is_banned(42).await);
    }

    #[tokio::test]
    async fn ban_and_unban_are_idempotent() {
        let cache = BanCache::new();
        cache.ban(7).await;
        cache.ban(7).await;
        assert_eq!(cache.len().await, 1);

        cache.unban(7).await;
        cache.unban(7).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn replace_drops_users_missing_from_new_list() {
        let cache = BanCache::new();
        cache.ban(1).await;
        cache.ban(2).await;

        cache.replace(HashSet::from([2, 3])).await;

        assert!(!cache.is_banned(1).await);
        assert!(cache.is_banned(2).await);
        assert!(cache.is_banned(3).await);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let cache = BanCache::new();
        let handle = cache.clone();
        handle.ban(99).await;
        assert!(cache.is_banned(99).await);
    }
}
