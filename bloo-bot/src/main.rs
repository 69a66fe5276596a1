mod config;
mod events;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use bloo_catalog::CatalogService;
use bloo_core::{BanCache, BotSettings, Data, Error, IssueCache};
use bloo_database::impls::guild_config::guild_config_or_default;
use bloo_database::{CacheService, Database, MIGRATOR};
use bloo_utils::embed::{Status, status_embed};
use bloo_utils::error::{UserError, as_user_error, fatal_error_message};

use config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let config = BotConfig::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = build_cache(&config);
    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    if config.auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let catalog = CatalogService::new(config.catalog_ttl)?;
    info!(ttl_seconds = catalog.ttl().as_secs(), "Catalog service ready.");

    let settings = BotSettings {
        guild_id: config.guild_id,
        maintainer_id: config.maintainer_id,
    };

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MODERATION
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: bloo_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(bot_user = %ready.user.name, "Bloo has awoken!");

                let guild_id = serenity::GuildId::new(settings.guild_id);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                let data = Data {
                    db,
                    catalog,
                    bans: BanCache::new(),
                    issues: IssueCache::new(),
                    settings,
                };
                warm_caches(ctx, ready, &data).await;

                Ok(data)
            })
        })
        .build();

    info!("Bloo is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn build_cache(config: &BotConfig) -> CacheService {
    let prefix = config.redis_key_prefix.clone();
    if !config.redis_enabled {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(prefix);
    }

    let Some(redis_url) = config.redis_url.as_deref() else {
        warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
        return CacheService::disabled(prefix);
    };

    match CacheService::redis(redis_url, prefix.clone()) {
        Ok(cache) => {
            info!(key_prefix = %prefix, "Redis cache enabled.");
            cache
        }
        Err(err) => {
            warn!(?err, key_prefix = %prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
            CacheService::disabled(prefix)
        }
    }
}

/// Start the ban list and common issue scans without holding up startup.
async fn warm_caches(ctx: &serenity::Context, ready: &serenity::Ready, data: &Data) {
    let guild_id = serenity::GuildId::new(data.settings.guild_id);
    data.bans.spawn_refresh(ctx.http.clone(), guild_id);

    match guild_config_or_default(&data.db, guild_id.get()).await {
        Ok(config) => match config.channel_common_issues {
            Some(channel_id) => {
                data.issues.spawn_rebuild(
                    ctx.http.clone(),
                    ready.user.id,
                    serenity::ChannelId::new(channel_id),
                );
            }
            None => info!("No common issues channel configured; issue cache stays empty."),
        },
        Err(err) => warn!(?err, "failed to read guild config; issue cache stays empty"),
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let description = match as_user_error(&error) {
                Some(user_error) => {
                    debug!(%user_error, command = %ctx.command().qualified_name, "command rejected");
                    user_error.to_string()
                }
                None => {
                    error!(?error, command = %ctx.command().qualified_name, "command error");
                    fatal_error_message(ctx.data().settings.maintainer_id)
                }
            };

            send_error(ctx, description).await;
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let description = match error {
                Some(error) => {
                    error!(?error, command = %ctx.command().qualified_name, "permission check failed");
                    fatal_error_message(ctx.data().settings.maintainer_id)
                }
                None => UserError::PermissionDenied.to_string(),
            };

            send_error(ctx, description).await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            send_error(ctx, UserError::GuildOnly.to_string()).await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = bloo_commands::find_meta(&ctx.command().name)
                .map_or_else(|| format!("/{}", ctx.command().qualified_name), |meta| meta.usage.to_owned());
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\nUsage: `{}`", input, usage)
            } else {
                format!("Missing required argument.\nUsage: `{}`", usage)
            };

            send_error(ctx, description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn send_error(ctx: bloo_core::Context<'_>, description: String) {
    let reply = poise::CreateReply::default()
        .ephemeral(true)
        .embed(status_embed(Status::Error, description));

    if let Err(source) = ctx.send(reply).await {
        warn!(?source, "failed to report command error");
    }
}

async fn handle_event(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildBanAddition {
            guild_id,
            banned_user,
        } => {
            events::bans::handle_ban_addition(data, *guild_id, banned_user).await;
        }
        serenity::FullEvent::GuildBanRemoval {
            guild_id,
            unbanned_user,
        } => {
            events::bans::handle_ban_removal(data, *guild_id, unbanned_user).await;
        }
        _ => {}
    }

    Ok(())
}
