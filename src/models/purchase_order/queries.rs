use crate::db::{DbPool, now_string};
use crate::errors::AppError;

use super::types::*;

pub async fn create(pool: &DbPool, new: &NewPurchaseOrder) -> Result<i64, AppError> {
    let supplier = new.supplier.trim();
    if supplier.is_empty() {
        return Err(AppError::Validation("Supplier is required".to_string()));
    }
    let now = now_string();
    let result = sqlx::query(
        "INSERT INTO purchase_orders (supplier, reference, status, expected_date, created_at, updated_at) \
         VALUES (?, ?, 'aangekocht', ?, ?, ?)",
    )
    .bind(supplier)
    .bind(&new.reference)
    .bind(&new.expected_date)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<PurchaseOrder>, AppError> {
    let po = sqlx::query_as::<_, PurchaseOrder>("SELECT * FROM purchase_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(po)
}

/// List with line-item rollups, newest first, optionally filtered by status.
pub async fn find_all(
    pool: &DbPool,
    status: Option<&str>,
) -> Result<Vec<PurchaseOrderListItem>, AppError> {
    const SELECT: &str = "\
        SELECT po.id, po.supplier, po.reference, po.status, po.expected_date, po.created_at, \
               (SELECT COUNT(*) FROM purchase_order_items i WHERE i.purchase_order_id = po.id) \
                   AS item_count, \
               (SELECT COALESCE(SUM(i.quantity * i.unit_price_cents), 0) \
                  FROM purchase_order_items i WHERE i.purchase_order_id = po.id) \
                   AS items_total_cents \
        FROM purchase_orders po";

    let items = match status {
        Some(s) => {
            let sql = format!("{SELECT} WHERE po.status = ? ORDER BY po.created_at DESC");
            sqlx::query_as::<_, PurchaseOrderListItem>(&sql)
                .bind(s)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{SELECT} ORDER BY po.created_at DESC");
            sqlx::query_as::<_, PurchaseOrderListItem>(&sql)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(items)
}

pub async fn update(pool: &DbPool, id: i64, patch: &PurchaseOrderPatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let supplier = patch.supplier.clone().unwrap_or(existing.supplier);
    if supplier.trim().is_empty() {
        return Err(AppError::Validation("Supplier is required".to_string()));
    }

    let status = patch.status.clone().unwrap_or_else(|| existing.status.clone());
    if !STATUSES.contains(&status.as_str()) {
        return Err(AppError::Validation(format!("Unknown status '{status}'")));
    }
    if !can_transition(&existing.status, &status) {
        return Err(AppError::Validation(format!(
            "Cannot move a purchase order from '{}' back to '{}'",
            existing.status, status
        )));
    }

    let expected_date = match patch.expected_date.as_deref() {
        Some("") => None,
        Some(d) => Some(d.to_string()),
        None => existing.expected_date,
    };

    sqlx::query(
        "UPDATE purchase_orders SET supplier = ?, reference = ?, status = ?, expected_date = ?, \
                                    updated_at = ? \
         WHERE id = ?",
    )
    .bind(supplier.trim())
    .bind(patch.reference.clone().unwrap_or(existing.reference))
    .bind(&status)
    .bind(expected_date)
    .bind(now_string())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Line items cascade with the order.
pub async fn delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM purchase_orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

pub async fn add_item(pool: &DbPool, new: &NewPurchaseOrderItem) -> Result<i64, AppError> {
    if new.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if new.quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
    }
    find_by_id(pool, new.purchase_order_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let result = sqlx::query(
        "INSERT INTO purchase_order_items (purchase_order_id, description, quantity, unit_price_cents) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(new.purchase_order_id)
    .bind(new.description.trim())
    .bind(new.quantity)
    .bind(new.unit_price_cents)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_items(pool: &DbPool, purchase_order_id: i64) -> Result<Vec<PurchaseOrderItem>, AppError> {
    let items = sqlx::query_as::<_, PurchaseOrderItem>(
        "SELECT * FROM purchase_order_items WHERE purchase_order_id = ? ORDER BY id",
    )
    .bind(purchase_order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_item_by_id(pool: &DbPool, id: i64) -> Result<Option<PurchaseOrderItem>, AppError> {
    let item = sqlx::query_as::<_, PurchaseOrderItem>(
        "SELECT * FROM purchase_order_items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn update_item(
    pool: &DbPool,
    id: i64,
    patch: &PurchaseOrderItemPatch,
) -> Result<(), AppError> {
    let existing = find_item_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let description = patch.description.clone().unwrap_or(existing.description);
    if description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    let quantity = patch.quantity.unwrap_or(existing.quantity);
    if quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
    }

    sqlx::query(
        "UPDATE purchase_order_items SET description = ?, quantity = ?, unit_price_cents = ? \
         WHERE id = ?",
    )
    .bind(description.trim())
    .bind(quantity)
    .bind(patch.unit_price_cents.unwrap_or(existing.unit_price_cents))
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_item(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM purchase_order_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
