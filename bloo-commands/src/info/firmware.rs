use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use crate::info::firmware_catalog;
use bloo_catalog::{FirmwareEntry, query};
use bloo_core::{Context, Error};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "firmware",
    desc: "Show details about a firmware release.",
    category: "info",
    usage: "/firmware <version>",
    permission: PermissionLevel::Everyone,
};

pub const BETA_META: CommandMeta = CommandMeta {
    name: "betafirmware",
    desc: "Show details about a beta firmware release.",
    category: "info",
    usage: "/betafirmware <version>",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, category = "Info")]
pub async fn firmware(
    ctx: Context<'_>,
    #[description = "Version or build number"]
    #[autocomplete = "autocomplete::firmware"]
    version: String,
) -> Result<(), Error> {
    show_firmware(ctx, &version, false).await
}

#[poise::command(slash_command, category = "Info")]
pub async fn betafirmware(
    ctx: Context<'_>,
    #[description = "Version or build number"]
    #[autocomplete = "autocomplete::beta_firmware"]
    version: String,
) -> Result<(), Error> {
    show_firmware(ctx, &version, true).await
}

async fn show_firmware(ctx: Context<'_>, version: &str, beta: bool) -> Result<(), Error> {
    let catalog = firmware_catalog(ctx).await?;
    let Some(entry) = query::find_firmware(&catalog, version, beta) else {
        return Err(UserError::bad_argument(format!("No firmware matching `{}` was found.", version.trim())).into());
    };

    ctx.send(poise::CreateReply::default().embed(firmware_embed(entry)))
        .await?;
    Ok(())
}

pub(crate) fn firmware_embed(entry: &FirmwareEntry) -> serenity::CreateEmbed {
    let device_count = entry.devices.as_ref().map_or(0, Vec::len);

    serenity::CreateEmbed::new()
        .title(query::firmware_label(entry))
        .color(DEFAULT_EMBED_COLOR)
        .field("OS", query::resolve_os_version(entry), true)
        .field("Version", entry.version.clone(), true)
        .field("Build", entry.build.clone(), true)
        .field("Released", entry.released.as_deref().unwrap_or("Unknown"), true)
        .field("Beta", if entry.beta { "Yes" } else { "No" }, true)
        .field("Devices", device_count.to_string(), true)
}
