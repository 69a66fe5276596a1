use tracing::info;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use crate::checks::moderator_or_above;
use crate::moderation::{case_embed, reason_or_default};
use bloo_core::{Context, Error};
use bloo_database::impls::cases::lift_warn_case;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "liftwarn",
    desc: "Lift one of a user's warnings.",
    category: "moderation",
    usage: "/liftwarn <user> <case_id> [reason]",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn liftwarn(
    ctx: Context<'_>,
    #[description = "The user whose warning to lift"] user: serenity::User,
    #[description = "Case number of the warning"]
    #[autocomplete = "autocomplete::liftable_warn"]
    case_id: String,
    #[description = "Reason for lifting"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    let Ok(case_id) = case_id.trim().trim_start_matches('#').parse::<u64>() else {
        return Err(UserError::bad_argument("Case ids are numbers.").into());
    };

    let lifted = lift_warn_case(
        &ctx.data().db,
        guild_id.get(),
        user.id.get(),
        case_id,
        reason_or_default(reason.as_deref()),
    )
    .await?;
    let Some(case) = lifted else {
        return Err(UserError::bad_argument(format!(
            "{} has no un-lifted warning with case id {}.",
            user.name, case_id
        ))
        .into());
    };
    info!(guild_id = %guild_id, user_id = %user.id, case_id, "warning lifted");

    let lifted_reason = case.lifted_reason.clone().unwrap_or_default();
    let embed = case_embed(&user, "cleared of a warning", &case).field("Lift reason", lifted_reason, false);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
