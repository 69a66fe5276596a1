use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::moderator_or_above;
use crate::moderation::{case_embed, reason_or_default};
use bloo_core::{Context, Error};
use bloo_database::impls::cases::{NewCase, create_case};
use bloo_database::model::cases::CASE_TYPE_UNBAN;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Unban a user.",
    category: "moderation",
    usage: "/unban <user> [reason]",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "The user to unban"] user: serenity::User,
    #[description = "Reason for the unban"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    if let Err(source) = guild_id.unban(ctx.http(), user.id).await {
        error!(?source, user_id = %user.id, "unban request failed");
        return Err(UserError::bad_argument("I couldn't unban that user. Are they banned?").into());
    }
    ctx.data().bans.unban(user.id.get()).await;

    let case = create_case(
        &ctx.data().db,
        NewCase {
            guild_id: guild_id.get(),
            user_id: user.id.get(),
            moderator_id: ctx.author().id.get(),
            case_type: CASE_TYPE_UNBAN,
            reason: reason_or_default(reason.as_deref()),
        },
    )
    .await?;
    info!(guild_id = %guild_id, user_id = %user.id, case_id = case.case_id, "user unbanned");

    ctx.send(poise::CreateReply::default().embed(case_embed(&user, "unbanned", &case)))
        .await?;
    Ok(())
}
