use crate::CommandMeta;
use crate::autocomplete;
use crate::checks::moderator_or_above;
use bloo_core::{Context, Error};
use bloo_database::impls::filter_words::remove_filter_word;
use bloo_utils::embed::{Status, sanitize_mentions, status_embed};
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "unfilter",
    desc: "Remove a word from the filter.",
    category: "moderation",
    usage: "/unfilter <word>",
    permission: PermissionLevel::Moderator,
};

#[poise::command(
    slash_command,
    guild_only,
    category = "Moderation",
    check = "moderator_or_above"
)]
pub async fn unfilter(
    ctx: Context<'_>,
    #[description = "Filtered word to remove"]
    #[autocomplete = "autocomplete::filter_word"]
    word: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    let word = word.trim();
    if !remove_filter_word(&ctx.data().db, guild_id.get(), word).await? {
        return Err(UserError::bad_argument("That word is not filtered.").into());
    }

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .embed(status_embed(
                Status::Success,
                format!("Removed `{}` from the filter.", sanitize_mentions(word)),
            )),
    )
    .await?;
    Ok(())
}
