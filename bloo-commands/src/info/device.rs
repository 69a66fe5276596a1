use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use crate::info::firmware::firmware_embed;
use crate::info::firmware_catalog;
use bloo_catalog::{DeviceGroup, query};
use bloo_core::{Context, Error};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "deviceinfo",
    desc: "Show the identifiers of a device.",
    category: "info",
    usage: "/deviceinfo <device>",
    permission: PermissionLevel::Everyone,
};

pub const FIRMWARE_META: CommandMeta = CommandMeta {
    name: "devicefirmware",
    desc: "Show a firmware release for a specific device.",
    category: "info",
    usage: "/devicefirmware <device> <version>",
    permission: PermissionLevel::Everyone,
};

/// Identifiers shown before the list is cut short.
const MAX_LISTED_IDENTIFIERS: usize = 20;

#[poise::command(slash_command, category = "Info")]
pub async fn deviceinfo(
    ctx: Context<'_>,
    #[description = "Device name or identifier"]
    #[autocomplete = "autocomplete::device"]
    device: String,
) -> Result<(), Error> {
    let catalog = firmware_catalog(ctx).await?;
    let group = query::find_device_group(&catalog, &device).ok_or_else(|| unknown_device(&device))?;

    ctx.send(poise::CreateReply::default().embed(device_embed(&group)))
        .await?;
    Ok(())
}

#[poise::command(slash_command, category = "Info")]
pub async fn devicefirmware(
    ctx: Context<'_>,
    #[description = "Device name or identifier"]
    #[autocomplete = "autocomplete::jailbreak_device"]
    device: String,
    #[description = "Firmware version"]
    #[autocomplete = "autocomplete::firmware_on_device"]
    version: String,
) -> Result<(), Error> {
    let catalog = firmware_catalog(ctx).await?;
    let group = query::find_device_group(&catalog, &device).ok_or_else(|| unknown_device(&device))?;
    let Some(device_id) = group.devices.first() else {
        return Err(unknown_device(&device));
    };

    let Some(entry) = query::find_firmware_on_device(&catalog, device_id, &version) else {
        return Err(UserError::bad_argument(format!(
            "{} does not support firmware `{}`.",
            group.name,
            version.trim()
        ))
        .into());
    };

    let embed = firmware_embed(entry).description(format!("Available for **{}** (`{}`)", group.name, device_id));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn unknown_device(device: &str) -> Error {
    UserError::bad_argument(format!("No device matching `{}` was found.", device.trim())).into()
}

fn device_embed(group: &DeviceGroup) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(group.name.clone())
        .color(DEFAULT_EMBED_COLOR)
        .field("Type", group.kind.as_deref().unwrap_or("Unknown"), true)
        .field("Identifiers", identifier_list(&group.devices), false)
}

fn identifier_list(devices: &[String]) -> String {
    if devices.is_empty() {
        return "None".to_owned();
    }

    let mut listed = devices
        .iter()
        .take(MAX_LISTED_IDENTIFIERS)
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ");
    if devices.len() > MAX_LISTED_IDENTIFIERS {
        listed.push_str(&format!(" and {} more", devices.len() - MAX_LISTED_IDENTIFIERS));
    }
    listed
}
