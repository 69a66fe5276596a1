pub mod ban_cache;
pub mod issue_cache;

use bloo_catalog::CatalogService;
use bloo_database::Database;

pub use ban_cache::BanCache;
pub use issue_cache::{IssueCache, IssueEntry};

pub type Error = anyhow::Error;

/// Process-wide settings that do not live in the guild config store.
#[derive(Clone, Copy, Debug)]
pub struct BotSettings {
    pub guild_id: u64,
    pub maintainer_id: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub catalog: CatalogService,
    pub bans: BanCache,
    pub issues: IssueCache,
    pub settings: BotSettings,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
