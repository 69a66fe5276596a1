use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::checks::moderator_or_above;
use bloo_core::{Context, Error};
use bloo_database::impls::guild_config::guild_config_or_default;
use bloo_utils::embed::{Status, status_embed};
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "refreshcaches",
    desc: "Reload the catalogs, the common issue list and the ban list.",
    category: "moderation",
    usage: "/refreshcaches",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn refreshcaches(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    let data = ctx.data();
    data.catalog.invalidate().await;
    data.bans
        .spawn_refresh(ctx.serenity_context().http.clone(), guild_id);

    let config = guild_config_or_default(&data.db, guild_id.get()).await?;
    let issues_note = match config.channel_common_issues {
        Some(channel_id) => {
            let bot_user_id = ctx.framework().bot_id;
            data.issues.spawn_rebuild(
                ctx.serenity_context().http.clone(),
                bot_user_id,
                serenity::ChannelId::new(channel_id),
            );
            "Rebuilding the common issue list."
        }
        None => "No common issues channel is configured; skipped the issue list.",
    };
    info!(guild_id = %guild_id, author_id = %ctx.author().id, "cache refresh requested");

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .embed(status_embed(
                Status::Success,
                format!("Catalogs will reload on next use. Refreshing the ban list.\n{issues_note}"),
            )),
    )
    .await?;
    Ok(())
}
