use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::time::Instant;

use crate::embed::DEFAULT_EMBED_COLOR;

/// How long a prompt waits for the invoker before giving up.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Replying with this word (any case) aborts a prompt.
pub const CANCEL_KEYWORD: &str = "cancel";

/// What to ask the invoker for.
#[derive(Clone, Debug)]
pub struct PromptData {
    pub value_name: &'static str,
    pub description: String,
    pub timeout: Duration,
}

impl PromptData {
    pub fn new(value_name: &'static str, description: impl Into<String>) -> Self {
        Self {
            value_name,
            description: description.into(),
            timeout: DEFAULT_PROMPT_TIMEOUT,
        }
    }
}

/// Anything a prompt can receive as an answer.
pub trait PromptReply {
    fn text(&self) -> &str;
}

impl PromptReply for serenity::Message {
    fn text(&self) -> &str {
        &self.content
    }
}

impl PromptReply for String {
    fn text(&self) -> &str {
        self
    }
}

#[derive(Debug)]
pub enum PromptEvent<R> {
    Reply { reply: R, received_at: Instant },
    Elapsed,
}

/// A prompt waits in `AwaitingResponse` until one event moves it into one of
/// the terminal states. Terminal states ignore further events.
#[derive(Debug)]
pub enum PromptState<R> {
    AwaitingResponse { deadline: Instant },
    Resolved(R),
    Cancelled,
    TimedOut,
}

impl<R: PromptReply> PromptState<R> {
    pub fn awaiting(timeout: Duration) -> Self {
        Self::AwaitingResponse {
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline; zero once terminal.
    pub fn remaining(&self) -> Duration {
        match self {
            Self::AwaitingResponse { deadline } => {
                deadline.saturating_duration_since(Instant::now())
            }
            _ => Duration::ZERO,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::AwaitingResponse { .. })
    }

    pub fn on_event(self, event: PromptEvent<R>) -> Self {
        let Self::AwaitingResponse { deadline } = self else {
            return self;
        };

        match event {
            PromptEvent::Elapsed => Self::TimedOut,
            PromptEvent::Reply { received_at, .. } if received_at > deadline => Self::TimedOut,
            PromptEvent::Reply { reply, .. } if is_cancel(reply.text()) => Self::Cancelled,
            PromptEvent::Reply { reply, .. } => Self::Resolved(reply),
        }
    }

    pub fn into_reply(self) -> Option<R> {
        match self {
            Self::Resolved(reply) => Some(reply),
            _ => None,
        }
    }
}

fn is_cancel(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(CANCEL_KEYWORD)
}

/// Ask the invoker for a value and wait for their next message in the same
/// channel.
pub async fn prompt_for_reply<U, E>(
    ctx: poise::Context<'_, U, E>,
    prompt: &PromptData,
) -> Result<PromptState<serenity::Message>, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let state = PromptState::awaiting(prompt.timeout);

    let embed = serenity::CreateEmbed::new()
        .title(format!("Please enter a {}", prompt.value_name))
        .color(DEFAULT_EMBED_COLOR)
        .description(prompt.description.clone())
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Send '{}' to cancel.",
            CANCEL_KEYWORD
        )));
    ctx.send(poise::CreateReply::default().ephemeral(true).embed(embed))
        .await?;

    let reply = serenity::MessageCollector::new(ctx)
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(state.remaining())
        .await;

    let event = match reply {
        Some(reply) => PromptEvent::Reply {
            reply,
            received_at: Instant::now(),
        },
        None => PromptEvent::Elapsed,
    };

    Ok(state.on_event(event))
}
