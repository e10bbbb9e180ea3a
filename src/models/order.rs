use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

pub const STATUSES: &[&str] = &["open", "paid", "shipped", "completed", "canceled"];

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub status: String,
    pub total_cents: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub total_cents: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub status: Option<String>,
    pub customer_id: Option<i64>,
    pub total_cents: Option<i64>,
}

pub async fn create(pool: &DbPool, new: &NewOrder) -> Result<i64, AppError> {
    if new.order_number.trim().is_empty() {
        return Err(AppError::Validation("Order number is required".to_string()));
    }
    let now = now_string();
    let result = sqlx::query(
        "INSERT INTO orders (order_number, customer_id, status, total_cents, created_at, updated_at) \
         VALUES (?, ?, 'open', ?, ?, ?)",
    )
    .bind(new.order_number.trim())
    .bind(new.customer_id)
    .bind(new.total_cents)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Order>, AppError> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_all(pool: &DbPool) -> Result<Vec<Order>, AppError> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

pub async fn update(pool: &DbPool, id: i64, patch: &OrderPatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let status = patch.status.clone().unwrap_or(existing.status);
    if !STATUSES.contains(&status.as_str()) {
        return Err(AppError::Validation(format!("Unknown status '{status}'")));
    }
    // customer_id 0 clears the link.
    let customer_id = match patch.customer_id {
        Some(0) => None,
        Some(id) => Some(id),
        None => existing.customer_id,
    };

    sqlx::query(
        "UPDATE orders SET status = ?, customer_id = ?, total_cents = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&status)
    .bind(customer_id)
    .bind(patch.total_cents.unwrap_or(existing.total_cents))
    .bind(now_string())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
