use crate::db::{DbPool, now_string};
use crate::errors::AppError;

use super::types::*;

pub async fn create(pool: &DbPool, new: &NewRepair) -> Result<i64, AppError> {
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
        "INSERT INTO repairs (title, description, status, priority, issue_category, sla_due, \
                              customer_id, order_id, case_id, technician_id, created_at, updated_at) \
         VALUES (?, ?, 'new', ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&new.description)
    .bind(&priority)
    .bind(&new.issue_category)
    .bind(&new.sla_due)
    .bind(new.customer_id)
    .bind(new.order_id)
    .bind(new.case_id)
    .bind(new.technician_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Repair>, AppError> {
    let repair = sqlx::query_as::<_, Repair>("SELECT * FROM repairs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(repair)
}

const LIST_SELECT: &str = "\
    SELECT r.id, r.title, r.status, r.priority, r.issue_category, r.sla_due, \
           COALESCE(c.name, '') AS customer_name, \
           COALESCE(NULLIF(t.display_name, ''), t.username, '') AS technician_name, \
           (SELECT COUNT(*) FROM files f \
             WHERE f.parent_type = 'repair' AND f.parent_id = r.id) AS file_count, \
           r.created_at \
    FROM repairs r \
    LEFT JOIN customers c ON r.customer_id = c.id \
    LEFT JOIN users t ON r.technician_id = t.id";

/// Repair list, newest first, optionally filtered by status and/or
/// technician.
pub async fn find_all(
    pool: &DbPool,
    status: Option<&str>,
    technician_id: Option<i64>,
) -> Result<Vec<RepairListItem>, AppError> {
    let mut sql = format!("{LIST_SELECT} WHERE 1=1");
    if status.is_some() {
        sql.push_str(" AND r.status = ?");
    }
    if technician_id.is_some() {
        sql.push_str(" AND r.technician_id = ?");
    }
    sql.push_str(" ORDER BY r.created_at DESC");

    let mut query = sqlx::query_as::<_, RepairListItem>(&sql);
    if let Some(s) = status {
        query = query.bind(s.to_string());
    }
    if let Some(t) = technician_id {
        query = query.bind(t);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn update(pool: &DbPool, id: i64, patch: &RepairPatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let title = patch.title.clone().unwrap_or_else(|| existing.title.clone());
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let status = patch.status.clone().unwrap_or_else(|| existing.status.clone());
    if !STATUSES.contains(&status.as_str()) {
        return Err(AppError::Validation(format!("Unknown status '{status}'")));
    }
    if !can_transition(&existing.status, &status) {
        return Err(AppError::Validation(format!(
            "Cannot move a repair from '{}' to '{}'",
            existing.status, status
        )));
    }

    let priority = patch.priority.clone().unwrap_or_else(|| existing.priority.clone());
    if !PRIORITIES.contains(&priority.as_str()) {
        return Err(AppError::Validation(format!("Unknown priority '{priority}'")));
    }

    let sla_due = match patch.sla_due.as_deref() {
        Some("") => None,
        Some(d) => Some(d.to_string()),
        None => existing.sla_due.clone(),
    };

    // Stamp the completion time the first time a repair reaches 'completed';
    // it feeds the turnaround analytics.
    let completed_at = if status == "completed" && existing.completed_at.is_none() {
        Some(now_string())
    } else {
        existing.completed_at.clone()
    };

    let patch_link = |p: Option<i64>, e: Option<i64>| match p {
        Some(0) => None,
        Some(v) => Some(v),
        None => e,
    };

    sqlx::query(
        "UPDATE repairs SET title = ?, description = ?, status = ?, priority = ?, \
                            issue_category = ?, sla_due = ?, customer_id = ?, order_id = ?, \
                            case_id = ?, technician_id = ?, completed_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(title.trim())
    .bind(patch.description.clone().unwrap_or(existing.description))
    .bind(&status)
    .bind(&priority)
    .bind(patch.issue_category.clone().unwrap_or(existing.issue_category))
    .bind(sla_due)
    .bind(patch_link(patch.customer_id, existing.customer_id))
    .bind(patch_link(patch.order_id, existing.order_id))
    .bind(patch_link(patch.case_id, existing.case_id))
    .bind(patch_link(patch.technician_id, existing.technician_id))
    .bind(completed_at)
    .bind(now_string())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Parts and files cascade with the repair.
pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM repairs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parts used
// ---------------------------------------------------------------------------

pub async fn add_part(pool: &DbPool, repair_id: i64, new: &NewRepairPart) -> Result<i64, AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::Validation("Part name is required".to_string()));
    }
    if new.quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
    }
    find_by_id(pool, repair_id).await?.ok_or(AppError::NotFound)?;

    let result = sqlx::query(
        "INSERT INTO repair_parts (repair_id, name, quantity, unit_price_cents) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(repair_id)
    .bind(new.name.trim())
    .bind(new.quantity)
    .bind(new.unit_price_cents)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_parts(pool: &DbPool, repair_id: i64) -> Result<Vec<RepairPart>, AppError> {
    let parts = sqlx::query_as::<_, RepairPart>(
        "SELECT * FROM repair_parts WHERE repair_id = ? ORDER BY id",
    )
    .bind(repair_id)
    .fetch_all(pool)
    .await?;
    Ok(parts)
}

pub async fn delete_part(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM repair_parts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
