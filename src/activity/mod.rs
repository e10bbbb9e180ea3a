//! Activity log. Every mutation writes one row; a failed write is logged
//! and swallowed so it never fails the request that caused it.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

/// Entries older than this are purged at startup.
const RETENTION_DAYS: i64 = 90;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: String,
    pub created_at: String,
}

pub async fn log(
    pool: &DbPool,
    user_id: i64,
    action: &str,
    entity_type: &str,
    entity_id: i64,
    details: Value,
) {
    let result = sqlx::query(
        "INSERT INTO activities (user_id, action, entity_type, entity_id, details, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details.to_string())
    .bind(now_string())
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::warn!("Failed to write activity entry '{action}': {e}");
    }
}

/// The newest entries with usernames resolved, newest first.
pub async fn find_recent(pool: &DbPool, limit: i64) -> Result<Vec<Activity>, AppError> {
    let limit = limit.clamp(1, 200);
    let entries = sqlx::query_as::<_, Activity>(
        "SELECT a.id, a.user_id, \
                COALESCE(NULLIF(u.display_name, ''), u.username, '') AS username, \
                a.action, a.entity_type, a.entity_id, a.details, a.created_at \
         FROM activities a \
         LEFT JOIN users u ON a.user_id = u.id \
         ORDER BY a.created_at DESC, a.id DESC \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Retention cleanup, run at startup.
pub async fn cleanup_old_entries(pool: &DbPool) {
    let cutoff = (chrono::Local::now() - chrono::Duration::days(RETENTION_DAYS))
        .format(crate::db::DATETIME_FMT)
        .to_string();
    match sqlx::query("DELETE FROM activities WHERE created_at < ?")
        .bind(&cutoff)
        .execute(pool)
        .await
    {
        Ok(r) if r.rows_affected() > 0 => {
            log::info!("Purged {} activity entries older than {RETENTION_DAYS} days", r.rows_affected());
        }
        Ok(_) => {}
        Err(e) => log::warn!("Activity cleanup failed: {e}"),
    }
}
