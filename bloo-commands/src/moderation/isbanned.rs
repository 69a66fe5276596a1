use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::sub_moderator_or_above;
use bloo_core::{Context, Error};
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "isbanned",
    desc: "Check whether a user is banned.",
    category: "moderation",
    usage: "/isbanned <user>",
    permission: PermissionLevel::SubModerator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "sub_moderator_or_above"
)]
pub async fn isbanned(
    ctx: Context<'_>,
    #[description = "The user to look up"] user: serenity::User,
) -> Result<(), Error> {
    let banned = ctx.data().bans.is_banned(user.id.get()).await;
    let text = if banned {
        format!("<@{}> is banned.", user.id)
    } else {
        format!("<@{}> is not banned.", user.id)
    };

    ctx.send(poise::CreateReply::default().ephemeral(true).content(text))
        .await?;
    Ok(())
}
