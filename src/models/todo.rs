use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

pub const STATUSES: &[&str] = &["open", "done"];
pub const PRIORITIES: &[&str] = &["low", "normal", "high"];

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub assignee_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub assignee_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
}

/// Absent fields stay unchanged; an empty `due_date` clears it and a zero
/// link id clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub assignee_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
}

fn check_enums(status: &str, priority: &str) -> Result<(), AppError> {
    if !STATUSES.contains(&status) {
        return Err(AppError::Validation(format!("Unknown status '{status}'")));
    }
    if !PRIORITIES.contains(&priority) {
        return Err(AppError::Validation(format!("Unknown priority '{priority}'")));
    }
    Ok(())
}

fn patch_link(patch: Option<i64>, existing: Option<i64>) -> Option<i64> {
    match patch {
        Some(0) => None,
        Some(id) => Some(id),
        None => existing,
    }
}

pub async fn create(pool: &DbPool, new: &NewTodo) -> Result<i64, AppError> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let priority = new.priority.clone().unwrap_or_else(|| "normal".to_string());
    check_enums("open", &priority)?;

    let now = now_string();
    let result = sqlx::query(
        "INSERT INTO todos (title, description, status, priority, due_date, assignee_id, \
                            order_id, case_id, repair_id, created_at, updated_at) \
         VALUES (?, ?, 'open', ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&new.description)
    .bind(&priority)
    .bind(&new.due_date)
    .bind(new.assignee_id)
    .bind(new.order_id)
    .bind(new.case_id)
    .bind(new.repair_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
    let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(todo)
}

/// Open todos first, then by due date (todos without one sort last), newest
/// created first as the tie-breaker.
pub async fn find_all(pool: &DbPool, status: Option<&str>) -> Result<Vec<Todo>, AppError> {
    let todos = match status {
        Some(s) => {
            sqlx::query_as::<_, Todo>(
                "SELECT * FROM todos WHERE status = ? \
                 ORDER BY due_date IS NULL, due_date, created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Todo>(
                "SELECT * FROM todos \
                 ORDER BY status = 'done', due_date IS NULL, due_date, created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(todos)
}

pub async fn update(pool: &DbPool, id: i64, patch: &TodoPatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let title = patch.title.clone().unwrap_or(existing.title);
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let status = patch.status.clone().unwrap_or(existing.status);
    let priority = patch.priority.clone().unwrap_or(existing.priority);
    check_enums(&status, &priority)?;

    let due_date = match patch.due_date.as_deref() {
        Some("") => None,
        Some(d) => Some(d.to_string()),
        None => existing.due_date,
    };

    sqlx::query(
        "UPDATE todos SET title = ?, description = ?, status = ?, priority = ?, due_date = ?, \
                          assignee_id = ?, order_id = ?, case_id = ?, repair_id = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(title.trim())
    .bind(patch.description.clone().unwrap_or(existing.description))
    .bind(&status)
    .bind(&priority)
    .bind(due_date)
    .bind(patch_link(patch.assignee_id, existing.assignee_id))
    .bind(patch_link(patch.order_id, existing.order_id))
    .bind(patch_link(patch.case_id, existing.case_id))
    .bind(patch_link(patch.repair_id, existing.repair_id))
    .bind(now_string())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
