use crate::database::Database;
use crate::impls::{now_unix_secs, to_i64, to_u64};
use crate::model::cases::{CASE_TYPE_WARN, Case};

pub struct NewCase<'a> {
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub case_type: &'a str,
    pub reason: &'a str,
}

#[derive(sqlx::FromRow)]
struct CaseRow {
    case_id: i64,
    user_id: i64,
    moderator_id: i64,
    case_type: String,
    reason: String,
    lifted: bool,
    lifted_reason: Option<String>,
    created_at: i64,
}

impl CaseRow {
    fn into_case(self) -> anyhow::Result<Case> {
        Ok(Case {
            case_id: to_u64(self.case_id, "case_id")?,
            user_id: to_u64(self.user_id, "user_id")?,
            moderator_id: to_u64(self.moderator_id, "moderator_id")?,
            case_type: self.case_type,
            reason: self.reason,
            lifted: self.lifted,
            lifted_reason: self.lifted_reason,
            created_at: to_u64(self.created_at, "created_at")?,
        })
    }
}

/// Record a case under the guild's next case number.
pub async fn create_case(db: &Database, new_case: NewCase<'_>) -> anyhow::Result<Case> {
    let created_at = to_i64(now_unix_secs(), "created_at")?;

    let row: CaseRow = sqlx::query_as(
        "INSERT INTO mod_cases (guild_id, case_id, user_id, moderator_id, case_type, reason, created_at)
         SELECT $1, COALESCE(MAX(case_id), 0) + 1, $2, $3, $4, $5, $6
         FROM mod_cases
         WHERE guild_id = $1
         RETURNING case_id, user_id, moderator_id, case_type, reason, lifted, lifted_reason, created_at",
    )
    .bind(to_i64(new_case.guild_id, "guild_id")?)
    .bind(to_i64(new_case.user_id, "user_id")?)
    .bind(to_i64(new_case.moderator_id, "moderator_id")?)
    .bind(new_case.case_type)
    .bind(new_case.reason)
    .bind(created_at)
    .fetch_one(db.pool())
    .await?;

    row.into_case()
}

/// Ids of a user's warn cases that have not been lifted.
pub async fn list_liftable_warn_ids(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Vec<u64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT case_id FROM mod_cases
         WHERE guild_id = $1 AND user_id = $2 AND case_type = $3 AND lifted = FALSE",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(CASE_TYPE_WARN)
    .fetch_all(db.pool())
    .await?;

    ids.into_iter().map(|id| to_u64(id, "case_id")).collect()
}

/// Mark a warn case as lifted. Returns `None` when the user has no such
/// un-lifted warn case.
pub async fn lift_warn_case(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    case_id: u64,
    reason: &str,
) -> anyhow::Result<Option<Case>> {
    let row: Option<CaseRow> = sqlx::query_as(
        "UPDATE mod_cases
         SET lifted = TRUE, lifted_reason = $5
         WHERE guild_id = $1 AND user_id = $2 AND case_id = $3 AND case_type = $4 AND lifted = FALSE
         RETURNING case_id, user_id, moderator_id, case_type, reason, lifted, lifted_reason, created_at",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(to_i64(case_id, "case_id")?)
    .bind(CASE_TYPE_WARN)
    .bind(reason)
    .fetch_optional(db.pool())
    .await?;

    row.map(CaseRow::into_case).transpose()
}
