use poise::serenity_prelude as serenity;
use tracing::debug;

use bloo_core::Data;

/// Keep the ban cache in line with bans made outside the bot.
pub async fn handle_ban_addition(data: &Data, guild_id: serenity::GuildId, user: &serenity::User) {
    if guild_id.get() != data.settings.guild_id {
        return;
    }

    data.bans.ban(user.id.get()).await;
    debug!(user_id = %user.id, "ban cache updated from gateway");
}

pub async fn handle_ban_removal(data: &Data, guild_id: serenity::GuildId, user: &serenity::User) {
    if guild_id.get() != data.settings.guild_id {
        return;
    }

    data.bans.unban(user.id.get()).await;
    debug!(user_id = %user.id, "ban cache entry removed from gateway");
}
