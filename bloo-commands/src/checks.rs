use bloo_core::{Context, Error};
use bloo_database::impls::guild_config::guild_config_or_default;
use bloo_database::model::guild_config::GuildConfig;
use bloo_utils::permissions::{PermissionLevel, StaffRoles, member_level};

pub fn staff_roles(config: &GuildConfig) -> StaffRoles {
    StaffRoles {
        sub_moderator: config.role_sub_mod,
        moderator: config.role_moderator,
        administrator: config.role_administrator,
    }
}

/// The invoker's staff tier in the current guild.
pub async fn invoker_level(ctx: Context<'_>) -> Result<PermissionLevel, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(PermissionLevel::Everyone);
    };

    let config = guild_config_or_default(&ctx.data().db, guild_id.get()).await?;
    member_level(ctx.http(), guild_id, ctx.author().id, &staff_roles(&config)).await
}

async fn has_level(ctx: Context<'_>, required: PermissionLevel) -> Result<bool, Error> {
    Ok(invoker_level(ctx).await? >= required)
}

pub async fn sub_moderator_or_above(ctx: Context<'_>) -> Result<bool, Error> {
    has_level(ctx, PermissionLevel::SubModerator).await
}

pub async fn moderator_or_above(ctx: Context<'_>) -> Result<bool, Error> {
    has_level(ctx, PermissionLevel::Moderator).await
}
