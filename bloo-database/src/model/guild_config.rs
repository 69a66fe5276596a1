use serde::{Deserialize, Serialize};

/// Channel and role ids configured for a guild. Any of them may be unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: u64,
    pub channel_subnews: Option<u64>,
    pub channel_common_issues: Option<u64>,
    pub role_sub_news: Option<u64>,
    pub role_sub_mod: Option<u64>,
    pub role_moderator: Option<u64>,
    pub role_administrator: Option<u64>,
}
