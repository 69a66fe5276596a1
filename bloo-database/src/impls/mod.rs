pub mod cases;
pub mod filter_words;
pub mod guild_config;
pub mod snippets;

use anyhow::Context as _;

pub(crate) fn to_i64(value: u64, what: &str) -> anyhow::Result<i64> {
    i64::try_from(value).with_context(|| format!("{what} out of i64 range"))
}

pub(crate) fn to_u64(value: i64, what: &str) -> anyhow::Result<u64> {
    u64::try_from(value).with_context(|| format!("{what} out of u64 range"))
}

pub(crate) fn optional_id(value: Option<i64>, what: &str) -> anyhow::Result<Option<u64>> {
    value.map(|raw| to_u64(raw, what)).transpose()
}

pub fn now_unix_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
