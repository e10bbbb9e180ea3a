use crate::db::{DbPool, now_string};
use crate::errors::AppError;

use super::types::*;

pub async fn create(pool: &DbPool, new: &NewCase) -> Result<i64, AppError> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let priority = new.priority.clone().unwrap_or_else(|| "normal".to_string());
    if !PRIORITIES.contains(&priority.as_str()) {
        return Err(AppError::Validation(format!("Unknown priority '{priority}'")));
    }

    let now = now_string();
    let result = sqlx::query(
        "INSERT INTO cases (title, description, status, priority, sla_due, customer_id, \
                            created_at, updated_at) \
         VALUES (?, ?, 'open', ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&new.description)
    .bind(&priority)
    .bind(&new.sla_due)
    .bind(new.customer_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Case>, AppError> {
    let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(case)
}

pub async fn find_all(pool: &DbPool, status: Option<&str>) -> Result<Vec<Case>, AppError> {
    let cases = match status {
        Some(s) => {
            sqlx::query_as::<_, Case>(
                "SELECT * FROM cases WHERE status = ? ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Case>("SELECT * FROM cases ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(cases)
}

pub async fn update(pool: &DbPool, id: i64, patch: &CasePatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let title = patch.title.clone().unwrap_or(existing.title);
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let status = patch.status.clone().unwrap_or(existing.status);
    if !STATUSES.contains(&status.as_str()) {
        return Err(AppError::Validation(format!("Unknown status '{status}'")));
    }
    let priority = patch.priority.clone().unwrap_or(existing.priority);
    if !PRIORITIES.contains(&priority.as_str()) {
        return Err(AppError::Validation(format!("Unknown priority '{priority}'")));
    }

    let sla_due = match patch.sla_due.as_deref() {
        Some("") => None,
        Some(d) => Some(d.to_string()),
        None => existing.sla_due,
    };
    let customer_id = match patch.customer_id {
        Some(0) => None,
        Some(v) => Some(v),
        None => existing.customer_id,
    };

    sqlx::query(
        "UPDATE cases SET title = ?, description = ?, status = ?, priority = ?, sla_due = ?, \
                          customer_id = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(title.trim())
    .bind(patch.description.clone().unwrap_or(existing.description))
    .bind(&status)
    .bind(&priority)
    .bind(sla_due)
    .bind(customer_id)
    .bind(now_string())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Links and notes cascade with the case.
pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM cases WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-entity links
// ---------------------------------------------------------------------------

/// Link a case to another entity. Idempotent — linking twice is a no-op.
pub async fn add_link(pool: &DbPool, case_id: i64, link: &NewCaseLink) -> Result<i64, AppError> {
    if !LINK_TARGETS.contains(&link.target_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Cannot link a case to '{}'",
            link.target_type
        )));
    }
    find_by_id(pool, case_id).await?.ok_or(AppError::NotFound)?;

    let result = sqlx::query(
        "INSERT OR IGNORE INTO case_links (case_id, target_type, target_id, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(case_id)
    .bind(&link.target_type)
    .bind(link.target_id)
    .bind(now_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_links(pool: &DbPool, case_id: i64) -> Result<Vec<CaseLink>, AppError> {
    let links = sqlx::query_as::<_, CaseLink>(
        "SELECT * FROM case_links WHERE case_id = ? ORDER BY id",
    )
    .bind(case_id)
    .fetch_all(pool)
    .await?;
    Ok(links)
}

pub async fn delete_link(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM case_links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
