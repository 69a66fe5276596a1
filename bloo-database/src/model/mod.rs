pub mod cases;
pub mod guild_config;
pub mod snippets;
