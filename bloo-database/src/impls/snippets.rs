use crate::cache::{LIST_CACHE_TTL, snippet_names_key};
use crate::database::Database;
use crate::impls::{to_i64, to_u64};
use crate::model::snippets::{Snippet, SnippetKind};

#[derive(sqlx::FromRow)]
struct SnippetRow {
    name: String,
    content: String,
    added_by: i64,
    use_count: i64,
}

/// Names of every tag or meme in the guild.
pub async fn list_snippet_names(
    db: &Database,
    guild_id: u64,
    kind: SnippetKind,
) -> anyhow::Result<Vec<String>> {
    let cache_key = snippet_names_key(db.cache(), guild_id, kind.table());
    db.cache()
        .get_or_load_json(&cache_key, LIST_CACHE_TTL, || async {
            let query = format!("SELECT name FROM {} WHERE guild_id = $1", kind.table());
            let names: Vec<String> = sqlx::query_scalar(&query)
                .bind(to_i64(guild_id, "guild_id")?)
                .fetch_all(db.pool())
                .await?;
            Ok(names)
        })
        .await
}

/// Look a tag or meme up by name, ignoring case.
pub async fn get_snippet(
    db: &Database,
    guild_id: u64,
    kind: SnippetKind,
    name: &str,
) -> anyhow::Result<Option<Snippet>> {
    let query = format!(
        "SELECT name, content, added_by, use_count FROM {} WHERE guild_id = $1 AND LOWER(name) = LOWER($2)",
        kind.table()
    );
    let row: Option<SnippetRow> = sqlx::query_as(&query)
        .bind(to_i64(guild_id, "guild_id")?)
        .bind(name.trim())
        .fetch_optional(db.pool())
        .await?;

    row.map(|row| {
        Ok(Snippet {
            name: row.name,
            content: row.content,
            added_by: to_u64(row.added_by, "added_by")?,
            use_count: to_u64(row.use_count, "use_count")?,
        })
    })
    .transpose()
}

pub async fn record_snippet_use(
    db: &Database,
    guild_id: u64,
    kind: SnippetKind,
    name: &str,
) -> anyhow::Result<()> {
    let query = format!(
        "UPDATE {} SET use_count = use_count + 1 WHERE guild_id = $1 AND name = $2",
        kind.table()
    );
    sqlx::query(&query)
        .bind(to_i64(guild_id, "guild_id")?)
        .bind(name)
        .execute(db.pool())
        .await?;

    Ok(())
}
