use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use bloo_catalog::{Repository, query};
use bloo_core::{Context, Error};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "repo",
    desc: "Show a package repository.",
    category: "info",
    usage: "/repo <slug>",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, category = "Info")]
pub async fn repo(
    ctx: Context<'_>,
    #[description = "Repository slug"]
    #[autocomplete = "autocomplete::repository"]
    slug: String,
) -> Result<(), Error> {
    let Some(repositories) = ctx.data().catalog.repositories().await else {
        return Err(UserError::unavailable("The repository list is unavailable right now. Try again later.").into());
    };
    let Some(repository) = query::find_repository(&repositories, &slug) else {
        return Err(UserError::bad_argument(format!("No repository `{}` was found.", slug.trim())).into());
    };

    ctx.send(poise::CreateReply::default().embed(repository_embed(repository)))
        .await?;
    Ok(())
}

fn repository_embed(repository: &Repository) -> serenity::CreateEmbed {
    let title = repository
        .name
        .as_deref()
        .or(repository.slug.as_deref())
        .unwrap_or("Repository");

    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR);
    if let Some(uri) = repository.uri.as_deref() {
        embed = embed.field("URL", uri, false);
    }
    if let Some(slug) = repository.slug.as_deref() {
        embed = embed.footer(serenity::CreateEmbedFooter::new(slug));
    }
    embed
}
