use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn create(pool: &DbPool, new: &NewCustomer) -> Result<i64, AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    let result = sqlx::query(
        "INSERT INTO customers (name, email, phone, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(new.name.trim())
    .bind(&new.email)
    .bind(&new.phone)
    .bind(now_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(customer)
}

pub async fn find_all(pool: &DbPool) -> Result<Vec<Customer>, AppError> {
    let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(customers)
}

pub async fn update(pool: &DbPool, id: i64, patch: &CustomerPatch) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let name = patch.name.clone().unwrap_or(existing.name);
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    sqlx::query("UPDATE customers SET name = ?, email = ?, phone = ? WHERE id = ?")
        .bind(name.trim())
        .bind(patch.email.clone().unwrap_or(existing.email))
        .bind(patch.phone.clone().unwrap_or(existing.phone))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
