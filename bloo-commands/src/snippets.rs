use tracing::warn;

use crate::CommandMeta;
use crate::autocomplete;
use bloo_core::{Context, Error};
use bloo_database::impls::snippets::{get_snippet, record_snippet_use};
use bloo_database::model::snippets::SnippetKind;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const TAG_META: CommandMeta = CommandMeta {
    name: "tag",
    desc: "Post a saved tag.",
    category: "snippets",
    usage: "/tag <name>",
    permission: PermissionLevel::Everyone,
};

pub const MEME_META: CommandMeta = CommandMeta {
    name: "meme",
    desc: "Post a saved meme.",
    category: "snippets",
    usage: "/meme <name>",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, guild_only, category = "Snippets")]
pub async fn tag(
    ctx: Context<'_>,
    #[description = "Name of the tag"]
    #[autocomplete = "autocomplete::tag"]
    name: String,
) -> Result<(), Error> {
    post_snippet(ctx, SnippetKind::Tag, &name).await
}

#[poise::command(slash_command, guild_only, category = "Snippets")]
pub async fn meme(
    ctx: Context<'_>,
    #[description = "Name of the meme"]
    #[autocomplete = "autocomplete::meme"]
    name: String,
) -> Result<(), Error> {
    post_snippet(ctx, SnippetKind::Meme, &name).await
}

async fn post_snippet(ctx: Context<'_>, kind: SnippetKind, name: &str) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    let db = &ctx.data().db;
    let Some(snippet) = get_snippet(db, guild_id.get(), kind, name).await? else {
        return Err(UserError::bad_argument(format!(
            "That {} does not exist.",
            kind.label()
        ))
        .into());
    };

    ctx.say(snippet.content.clone()).await?;

    if let Err(source) = record_snippet_use(db, guild_id.get(), kind, &snippet.name).await {
        warn!(?source, name = %snippet.name, kind = kind.label(), "failed to record snippet use");
    }
    Ok(())
}
