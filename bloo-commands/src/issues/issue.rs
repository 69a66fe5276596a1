use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::autocomplete;
use bloo_core::{Context, Error, IssueEntry};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "issue",
    desc: "Link a common issue.",
    category: "issues",
    usage: "/issue <title>",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, guild_only, category = "Issues")]
pub async fn issue(
    ctx: Context<'_>,
    #[description = "Title of the issue"]
    #[autocomplete = "autocomplete::issue"]
    title: String,
) -> Result<(), Error> {
    let Some(entry) = ctx.data().issues.get(&title).await else {
        return Err(UserError::bad_argument("No issue with that title exists.").into());
    };

    ctx.send(poise::CreateReply::default().embed(issue_embed(&entry)))
        .await?;
    Ok(())
}

fn issue_embed(entry: &IssueEntry) -> serenity::CreateEmbed {
    let mut description = entry.description.clone().unwrap_or_default();
    if !description.is_empty() {
        description.push_str("\n\n");
    }
    description.push_str(&format!("[Jump to issue]({})", entry.jump_url()));

    serenity::CreateEmbed::new()
        .title(entry.title.clone())
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}
