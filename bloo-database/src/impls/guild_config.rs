use crate::cache::{CONFIG_CACHE_TTL, guild_config_key};
use crate::database::Database;
use crate::impls::{optional_id, to_i64};
use crate::model::guild_config::GuildConfig;

#[derive(sqlx::FromRow)]
struct GuildConfigRow {
    channel_subnews: Option<i64>,
    channel_common_issues: Option<i64>,
    role_sub_news: Option<i64>,
    role_sub_mod: Option<i64>,
    role_moderator: Option<i64>,
    role_administrator: Option<i64>,
}

impl GuildConfigRow {
    fn into_config(self, guild_id: u64) -> anyhow::Result<GuildConfig> {
        Ok(GuildConfig {
            guild_id,
            channel_subnews: optional_id(self.channel_subnews, "channel_subnews")?,
            channel_common_issues: optional_id(self.channel_common_issues, "channel_common_issues")?,
            role_sub_news: optional_id(self.role_sub_news, "role_sub_news")?,
            role_sub_mod: optional_id(self.role_sub_mod, "role_sub_mod")?,
            role_moderator: optional_id(self.role_moderator, "role_moderator")?,
            role_administrator: optional_id(self.role_administrator, "role_administrator")?,
        })
    }
}

/// Stored configuration for a guild, if any row exists.
pub async fn get_guild_config(db: &Database, guild_id: u64) -> anyhow::Result<Option<GuildConfig>> {
    let cache_key = guild_config_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let row: Option<GuildConfigRow> = sqlx::query_as(
                "SELECT channel_subnews, channel_common_issues, role_sub_news,
                        role_sub_mod, role_moderator, role_administrator
                 FROM guild_config
                 WHERE guild_id = $1",
            )
            .bind(to_i64(guild_id, "guild_id")?)
            .fetch_optional(db.pool())
            .await?;

            row.map(|row| row.into_config(guild_id)).transpose()
        })
        .await
}

/// Stored configuration, or an all-unset config when the guild has none.
pub async fn guild_config_or_default(db: &Database, guild_id: u64) -> anyhow::Result<GuildConfig> {
    Ok(get_guild_config(db, guild_id)
        .await?
        .unwrap_or_else(|| GuildConfig {
            guild_id,
            ..GuildConfig::default()
        }))
}
