//! Autocomplete callbacks. None of these fail: any error while loading
//! candidates yields an empty suggestion list.

use poise::serenity_prelude as serenity;
use tracing::debug;

use bloo_catalog::query;
use bloo_core::Context;
use bloo_database::impls::cases::list_liftable_warn_ids;
use bloo_database::impls::filter_words::list_filter_words;
use bloo_database::impls::snippets::list_snippet_names;
use bloo_database::model::snippets::SnippetKind;
use bloo_utils::suggest::{case_id_suggestions, prefix_suggestions, substring_suggestions};

pub async fn jailbreak(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let names = match ctx.data().catalog.firmware().await {
        Some(catalog) => query::jailbreak_names(&catalog, partial),
        None => Vec::new(),
    };
    names.into_iter()
}

pub async fn firmware(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    firmware_versions(ctx, partial, false).await.into_iter()
}

pub async fn beta_firmware(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    firmware_versions(ctx, partial, true).await.into_iter()
}

async fn firmware_versions(ctx: Context<'_>, partial: &str, beta: bool) -> Vec<String> {
    match ctx.data().catalog.firmware().await {
        Some(catalog) => query::firmware_versions(&catalog, partial, beta),
        None => Vec::new(),
    }
}

pub async fn device(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let names = match ctx.data().catalog.firmware().await {
        Some(catalog) => query::device_names(&catalog, partial, false),
        None => Vec::new(),
    };
    names.into_iter()
}

/// Devices that can be jailbroken (no Apple TV or Apple Watch).
pub async fn jailbreak_device(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let names = match ctx.data().catalog.firmware().await {
        Some(catalog) => query::device_names(&catalog, partial, true),
        None => Vec::new(),
    };
    names.into_iter()
}

/// Firmware for whatever was already entered in the `device` option.
pub async fn firmware_on_device(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let versions = match (option_value(ctx, "device"), ctx.data().catalog.firmware().await) {
        (Some(device), Some(catalog)) => query::firmware_versions_on_device(&catalog, &device, partial),
        _ => Vec::new(),
    };
    versions.into_iter()
}

pub async fn repository(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let slugs = match ctx.data().catalog.repositories().await {
        Some(repositories) => query::repository_slugs(&repositories, partial),
        None => Vec::new(),
    };
    slugs.into_iter()
}

pub async fn tag(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    snippet_names(ctx, partial, SnippetKind::Tag).await.into_iter()
}

pub async fn meme(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    snippet_names(ctx, partial, SnippetKind::Meme).await.into_iter()
}

async fn snippet_names(ctx: Context<'_>, partial: &str, kind: SnippetKind) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    match list_snippet_names(&ctx.data().db, guild_id.get(), kind).await {
        Ok(names) => substring_suggestions(names, partial),
        Err(source) => {
            debug!(?source, kind = kind.label(), "autocomplete lookup failed");
            Vec::new()
        }
    }
}

pub async fn filter_word(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let words = match ctx.guild_id() {
        Some(guild_id) => match list_filter_words(&ctx.data().db, guild_id.get()).await {
            Ok(words) => prefix_suggestions(words, partial),
            Err(source) => {
                debug!(?source, "filter word autocomplete lookup failed");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    words.into_iter()
}

/// Un-lifted warn cases of the user picked in the `user` option.
pub async fn liftable_warn(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let user_id = option_value(ctx, "user").and_then(|raw| raw.parse::<u64>().ok());
    let ids = match (ctx.guild_id(), user_id) {
        (Some(guild_id), Some(user_id)) => {
            match list_liftable_warn_ids(&ctx.data().db, guild_id.get(), user_id).await {
                Ok(ids) => case_id_suggestions(ids, partial),
                Err(source) => {
                    debug!(?source, "case autocomplete lookup failed");
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    };
    ids.into_iter()
}

pub async fn issue(ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    ctx.data().issues.titles_matching(partial).await.into_iter()
}

/// Raw value of another option in the interaction being completed.
fn option_value(ctx: Context<'_>, name: &str) -> Option<String> {
    let poise::Context::Application(app_ctx) = ctx else {
        return None;
    };
    find_option(&app_ctx.interaction.data.options, name)
}

fn find_option(options: &[serenity::CommandDataOption], name: &str) -> Option<String> {
    for option in options {
        match &option.value {
            serenity::CommandDataOptionValue::SubCommand(nested)
            | serenity::CommandDataOptionValue::SubCommandGroup(nested) => {
                if let Some(value) = find_option(nested, name) {
                    return Some(value);
                }
            }
            value if option.name == name => return option_text(value),
            _ => {}
        }
    }
    None
}

fn option_text(value: &serenity::CommandDataOptionValue) -> Option<String> {
    match value {
        serenity::CommandDataOptionValue::String(text) => Some(text.clone()),
        serenity::CommandDataOptionValue::Autocomplete { value, .. } => Some(value.clone()),
        serenity::CommandDataOptionValue::User(user_id) => Some(user_id.get().to_string()),
        serenity::CommandDataOptionValue::Integer(number) => Some(number.to_string()),
        _ => None,
    }
}
