use tracing::info;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::moderator_or_above;
use crate::moderation::{case_embed, reason_or_default};
use bloo_core::{Context, Error};
use bloo_database::impls::cases::{NewCase, create_case};
use bloo_database::model::cases::CASE_TYPE_WARN;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Warn a user.",
    category: "moderation",
    usage: "/warn <user> [reason]",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: serenity::User,
    #[description = "Reason for the warning"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    if user.bot {
        return Err(UserError::bad_argument("Bots can't be warned.").into());
    }

    let case = create_case(
        &ctx.data().db,
        NewCase {
            guild_id: guild_id.get(),
            user_id: user.id.get(),
            moderator_id: ctx.author().id.get(),
            case_type: CASE_TYPE_WARN,
            reason: reason_or_default(reason.as_deref()),
        },
    )
    .await?;
    info!(guild_id = %guild_id, user_id = %user.id, case_id = case.case_id, "user warned");

    ctx.send(poise::CreateReply::default().embed(case_embed(&user, "warned", &case)))
        .await?;
    Ok(())
}
