use std::env;
use std::time::Duration;

use anyhow::Context as _;

use bloo_catalog::DEFAULT_CATALOG_TTL;

const DEFAULT_REDIS_KEY_PREFIX: &str = "bloo:prod";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// Process configuration read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub database_url: String,
    pub guild_id: u64,
    pub maintainer_id: Option<u64>,
    pub redis_enabled: bool,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub auto_run_migrations: bool,
    pub catalog_ttl: Duration,
    pub max_db_connections: u32,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let guild_id = env::var("DISCORD_GUILD_ID")
            .context("DISCORD_GUILD_ID is not set")?
            .trim()
            .parse::<u64>()
            .context("DISCORD_GUILD_ID is not a valid id")?;

        let maintainer_id = match env::var("MAINTAINER_USER_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .context("MAINTAINER_USER_ID is not a valid id")?,
            ),
            _ => None,
        };

        Ok(Self {
            token,
            database_url,
            guild_id,
            maintainer_id,
            redis_enabled: env_bool("REDIS_ENABLED", false),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_REDIS_KEY_PREFIX.to_owned()),
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
            catalog_ttl: Duration::from_secs(env_u64(
                "CATALOG_TTL_SECONDS",
                DEFAULT_CATALOG_TTL.as_secs(),
            )),
            max_db_connections: u32::try_from(env_u64(
                "DATABASE_MAX_CONNECTIONS",
                u64::from(DEFAULT_MAX_DB_CONNECTIONS),
            ))
            .unwrap_or(DEFAULT_MAX_DB_CONNECTIONS),
        })
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |value| parse_bool(&value))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
