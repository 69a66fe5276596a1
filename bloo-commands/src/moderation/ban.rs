use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::moderator_or_above;
use crate::moderation::{case_embed, reason_or_default};
use bloo_core::{Context, Error};
use bloo_database::impls::cases::{NewCase, create_case};
use bloo_database::model::cases::CASE_TYPE_BAN;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "/ban <user> [reason]",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: serenity::User,
    #[description = "Reason for the ban"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    if user.id == ctx.author().id {
        return Err(UserError::bad_argument("You can't ban yourself.").into());
    }

    let reason = reason_or_default(reason.as_deref());
    if let Err(source) = guild_id.ban_with_reason(ctx.http(), user.id, 0, reason).await {
        error!(?source, user_id = %user.id, "ban request failed");
        return Err(UserError::bad_argument(
            "I couldn't ban that user. Check role hierarchy and permissions.",
        )
        .into());
    }
    ctx.data().bans.ban(user.id.get()).await;

    let case = create_case(
        &ctx.data().db,
        NewCase {
            guild_id: guild_id.get(),
            user_id: user.id.get(),
            moderator_id: ctx.author().id.get(),
            case_type: CASE_TYPE_BAN,
            reason,
        },
    )
    .await?;
    info!(guild_id = %guild_id, user_id = %user.id, case_id = case.case_id, "user banned");

    ctx.send(poise::CreateReply::default().embed(case_embed(&user, "banned", &case)))
        .await?;
    Ok(())
}
