use serde::Serialize;
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

pub const PARENT_TYPES: &[&str] = &["purchase_order", "case", "repair"];

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: i64,
    pub parent_type: String,
    pub parent_id: i64,
    pub author_id: Option<i64>,
    pub author_name: String,
    pub body: String,
    pub created_at: String,
}

pub async fn create(
    pool: &DbPool,
    parent_type: &str,
    parent_id: i64,
    author_id: i64,
    body: &str,
) -> Result<i64, AppError> {
    if !PARENT_TYPES.contains(&parent_type) {
        return Err(AppError::Validation(format!(
            "Notes cannot be attached to '{parent_type}'"
        )));
    }
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::Validation("Note body is required".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO notes (parent_type, parent_id, author_id, body, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(parent_type)
    .bind(parent_id)
    .bind(author_id)
    .bind(body)
    .bind(now_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Notes for one parent entity, newest first, with the author's display name
/// resolved.
pub async fn find_for(
    pool: &DbPool,
    parent_type: &str,
    parent_id: i64,
) -> Result<Vec<Note>, AppError> {
    let notes = sqlx::query_as::<_, Note>(
        "SELECT n.id, n.parent_type, n.parent_id, n.author_id, \
                COALESCE(NULLIF(u.display_name, ''), u.username, '') AS author_name, \
                n.body, n.created_at \
         FROM notes n \
         LEFT JOIN users u ON n.author_id = u.id \
         WHERE n.parent_type = ? AND n.parent_id = ? \
         ORDER BY n.created_at DESC, n.id DESC",
    )
    .bind(parent_type)
    .bind(parent_id)
    .fetch_all(pool)
    .await?;
    Ok(notes)
}
