use bloo_core::{Context, Error};
use bloo_utils::permissions::PermissionLevel;

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong! and the gateway latency.",
    category: "utility",
    usage: "/ping",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    if latency.is_zero() {
        ctx.say("Pong!").await?;
    } else {
        ctx.say(format!("Pong! ({} ms)", latency.as_millis())).await?;
    }
    Ok(())
}
