use poise::serenity_prelude as serenity;
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use crate::CommandMeta;
use crate::checks::sub_moderator_or_above;
use bloo_core::{Context, Error};
use bloo_database::impls::guild_config::guild_config_or_default;
use bloo_database::model::guild_config::GuildConfig;
use bloo_utils::attachments::ensure_image_content_type;
use bloo_utils::embed::{Status, status_embed};
use bloo_utils::error::UserError;
use bloo_utils::permissions::PermissionLevel;
use bloo_utils::prompt::{PromptData, PromptState, prompt_for_reply};

pub const META: CommandMeta = CommandMeta {
    name: "subnews",
    desc: "Post a new subreddit news post.",
    category: "misc",
    usage: "/subnews",
    permission: PermissionLevel::SubModerator,
};

const SUCCESS_NOTICE_LIFETIME: Duration = Duration::from_secs(5);
const CANCELLED_NOTICE: &str = "Cancelled subnews post.";

/// What gets broadcast once the invoker has answered the prompt.
#[derive(Debug, PartialEq, Eq)]
struct SubnewsPost {
    content: String,
    has_image: bool,
}

#[poise::command(
    slash_command,
    guild_only,
    category = "Misc",
    check = "sub_moderator_or_above"
)]
pub async fn subnews(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err(UserError::GuildOnly.into());
    };

    let config = guild_config_or_default(&ctx.data().db, guild_id.get()).await?;
    let (channel_id, role_id) = resolve_targets(ctx, guild_id, &config).await?;

    ctx.defer_ephemeral().await?;
    let prompt = PromptData::new(
        "description",
        "Please enter a description of this post (and attach an image if you want).",
    );
    let state = prompt_for_reply(ctx, &prompt).await?;

    let reply = match prompt_outcome(state) {
        Ok(reply) => reply,
        Err(notice) => {
            ctx.send(
                poise::CreateReply::default()
                    .ephemeral(true)
                    .embed(status_embed(Status::Warning, notice)),
            )
            .await?;
            return Ok(());
        }
    };

    let image = reply.attachments.first();
    let post = match compose_post(
        role_id,
        &reply.content,
        image.map(|attachment| attachment.content_type.as_deref()),
    ) {
        Ok(post) => post,
        Err(rejection) => {
            delete_prompt_reply(ctx, &reply).await;
            return Err(rejection.into());
        }
    };

    let mut message = serenity::CreateMessage::new()
        .content(post.content)
        .allowed_mentions(serenity::CreateAllowedMentions::new().roles([role_id]));
    if let Some(attachment) = image.filter(|_| post.has_image) {
        let bytes = attachment.download().await?;
        message = message.add_file(serenity::CreateAttachment::bytes(
            bytes,
            attachment.filename.clone(),
        ));
    }
    delete_prompt_reply(ctx, &reply).await;

    channel_id.send_message(ctx.http(), message).await?;
    info!(
        guild_id = %guild_id,
        channel_id = %channel_id,
        author_id = %ctx.author().id,
        "posted subreddit news"
    );

    let notice = ctx
        .send(
            poise::CreateReply::default()
                .ephemeral(true)
                .embed(status_embed(Status::Success, "Posted subreddit news post!")),
        )
        .await?;
    sleep(SUCCESS_NOTICE_LIFETIME).await;
    let _ = notice.delete(ctx).await;

    Ok(())
}

/// The configured news channel and role, both of which must still exist in
/// the guild. The gateway cache is consulted first.
async fn resolve_targets(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    config: &GuildConfig,
) -> Result<(serenity::ChannelId, serenity::RoleId), Error> {
    let channel_id = config.channel_subnews.map(serenity::ChannelId::new);
    let channel_id = match channel_id {
        Some(id) if channel_exists(ctx, guild_id, id).await? => id,
        _ => {
            return Err(UserError::missing_config(
                "A subreddit news channel was not found. Contact Slim.",
            )
            .into());
        }
    };

    let role_id = config.role_sub_news.map(serenity::RoleId::new);
    let role_id = match role_id {
        Some(id) if role_exists(ctx, guild_id, id).await? => id,
        _ => {
            return Err(UserError::missing_config(
                "A subreddit news role was not found. Contact Slim.",
            )
            .into());
        }
    };

    Ok((channel_id, role_id))
}

async fn channel_exists(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> Result<bool, Error> {
    let cached = ctx.guild().map(|guild| guild.channels.contains_key(&channel_id));
    if cached == Some(true) {
        return Ok(true);
    }

    debug!(channel_id = %channel_id, "subnews channel not cached; asking the API");
    Ok(guild_id.channels(ctx.http()).await?.contains_key(&channel_id))
}

async fn role_exists(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    role_id: serenity::RoleId,
) -> Result<bool, Error> {
    let cached = ctx.guild().map(|guild| guild.roles.contains_key(&role_id));
    if cached == Some(true) {
        return Ok(true);
    }

    debug!(role_id = %role_id, "subnews role not cached; asking the API");
    Ok(guild_id.roles(ctx.http()).await?.contains_key(&role_id))
}

async fn delete_prompt_reply(ctx: Context<'_>, reply: &serenity::Message) {
    if let Err(source) = reply.delete(ctx.http()).await {
        debug!(?source, "could not delete subnews prompt reply");
    }
}

/// The invoker's answer, or the notice to show when there is nothing to post.
fn prompt_outcome<R>(state: PromptState<R>) -> Result<R, &'static str> {
    match state {
        PromptState::Resolved(reply) => Ok(reply),
        PromptState::AwaitingResponse { .. } | PromptState::Cancelled | PromptState::TimedOut => {
            Err(CANCELLED_NOTICE)
        }
    }
}

/// Build the broadcast body. `attachment` carries the content type of the
/// first attached file, if any; anything other than an image is rejected.
fn compose_post(
    role_id: serenity::RoleId,
    description: &str,
    attachment: Option<Option<&str>>,
) -> Result<SubnewsPost, UserError> {
    if let Some(content_type) = attachment {
        ensure_image_content_type(content_type)?;
    }

    Ok(SubnewsPost {
        content: format!("<@&{role_id}> New Subreddit news post!\n\n{description}"),
        has_image: attachment.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use poise::serenity_prelude as serenity;

    use super::{CANCELLED_NOTICE, SubnewsPost, compose_post, prompt_outcome};
    use bloo_utils::error::UserError;
    use bloo_utils::prompt::{PromptEvent, PromptState};

    const ROLE: serenity::RoleId = serenity::RoleId::new(77);

    #[test]
    fn body_mentions_role_then_description() {
        let post = compose_post(ROLE, "New rules are up.", None).unwrap();
        assert_eq!(
            post,
            SubnewsPost {
                content: "<@&77> New Subreddit news post!\n\nNew rules are up.".to_owned(),
                has_image: false,
            }
        );
    }

    #[test]
    fn images_are_attached() {
        let post = compose_post(ROLE, "Banner", Some(Some("image/webp"))).unwrap();
        assert!(post.has_image);
    }

    #[test]
    fn non_images_are_rejected() {
        assert_eq!(
            compose_post(ROLE, "Slides", Some(Some("application/pdf"))),
            Err(UserError::bad_argument("Attached file was not an image."))
        );
        assert!(compose_post(ROLE, "Unknown", Some(None)).is_err());
    }

    #[tokio::test]
    async fn cancelled_prompt_posts_notice_only() {
        let state = PromptState::awaiting(Duration::from_secs(120)).on_event(PromptEvent::Reply {
            reply: "cancel".to_owned(),
            received_at: tokio::time::Instant::now(),
        });
        assert_eq!(prompt_outcome(state), Err(CANCELLED_NOTICE));
    }

    #[tokio::test]
    async fn timed_out_prompt_posts_notice_only() {
        let state: PromptState<String> =
            PromptState::awaiting(Duration::from_secs(120)).on_event(PromptEvent::Elapsed);
        assert_eq!(prompt_outcome(state), Err("Cancelled subnews post."));
    }

    #[test]
    fn answered_prompt_becomes_a_post() {
        let reply = prompt_outcome(PromptState::Resolved("Mod applications are open.".to_owned()))
            .unwrap();
        let post = compose_post(ROLE, &reply, None).unwrap();
        assert_eq!(
            post.content,
            "<@&77> New Subreddit news post!\n\nMod applications are open."
        );
    }
}
