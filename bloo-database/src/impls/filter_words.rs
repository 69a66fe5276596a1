use crate::cache::{LIST_CACHE_TTL, filter_words_key, invalidate_filter_words};
use crate::database::Database;
use crate::impls::to_i64;

/// Every filtered word configured for the guild.
pub async fn list_filter_words(db: &Database, guild_id: u64) -> anyhow::Result<Vec<String>> {
    let cache_key = filter_words_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, LIST_CACHE_TTL, || async {
            let words: Vec<String> =
                sqlx::query_scalar("SELECT word FROM filter_words WHERE guild_id = $1")
                    .bind(to_i64(guild_id, "guild_id")?)
                    .fetch_all(db.pool())
                    .await?;
            Ok(words)
        })
        .await
}

/// Remove a word from the guild's filter. Returns `true` if it was present.
pub async fn remove_filter_word(db: &Database, guild_id: u64, word: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM filter_words WHERE guild_id = $1 AND word = $2")
        .bind(to_i64(guild_id, "guild_id")?)
        .bind(word)
        .execute(db.pool())
        .await?;

    invalidate_filter_words(db.cache(), guild_id).await?;

    Ok(result.rows_affected() > 0)
}
