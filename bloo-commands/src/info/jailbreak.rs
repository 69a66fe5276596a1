use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use crate::info::firmware_catalog;
use bloo_catalog::{JailbreakApp, query};
use bloo_core::{Context, Error};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "jailbreak",
    desc: "Show details about a jailbreak.",
    category: "info",
    usage: "/jailbreak <name>",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, category = "Info")]
pub async fn jailbreak(
    ctx: Context<'_>,
    #[description = "Name of the jailbreak"]
    #[autocomplete = "autocomplete::jailbreak"]
    name: String,
) -> Result<(), Error> {
    let catalog = firmware_catalog(ctx).await?;
    let Some(app) = query::find_jailbreak(&catalog, &name) else {
        return Err(UserError::bad_argument(format!("No jailbreak named `{}` was found.", name.trim())).into());
    };

    ctx.send(poise::CreateReply::default().embed(jailbreak_embed(app)))
        .await?;
    Ok(())
}

fn jailbreak_embed(app: &JailbreakApp) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(app.name.clone())
        .color(DEFAULT_EMBED_COLOR)
        .field("Type", app.kind().unwrap_or("Unknown"), true);

    if let Some(url) = app.website_url() {
        embed = embed.field("Website", url, true).url(url);
    }
    embed
}
