use rand::Rng;
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{DbPool, now_string};
use crate::errors::AppError;

pub const PARENT_TYPES: &[&str] = &["purchase_order", "repair"];
pub const KINDS: &[&str] = &["attachment", "photo"];

/// Hard cap per upload request, checked before anything touches disk.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredFile {
    pub id: i64,
    pub parent_type: String,
    pub parent_id: i64,
    pub kind: String,
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub parent_type: String,
    pub parent_id: i64,
    pub kind: String,
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: i64,
}

/// Random 16-byte hex name, keeping the original extension so downloads get
/// a sensible content type from the filesystem too.
pub fn random_stored_name(original_name: &str) -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 8 => {
            format!("{}.{}", hex::encode(bytes), ext.to_lowercase())
        }
        _ => hex::encode(bytes),
    }
}

pub async fn create(pool: &DbPool, new: &NewFile) -> Result<i64, AppError> {
    if !PARENT_TYPES.contains(&new.parent_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Files cannot be attached to '{}'",
            new.parent_type
        )));
    }
    if !KINDS.contains(&new.kind.as_str()) {
        return Err(AppError::Validation(format!("Unknown file kind '{}'", new.kind)));
    }

    let result = sqlx::query(
        "INSERT INTO files (parent_type, parent_id, kind, original_name, stored_name, \
                            content_type, size_bytes, uploaded_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.parent_type)
    .bind(new.parent_id)
    .bind(&new.kind)
    .bind(&new.original_name)
    .bind(&new.stored_name)
    .bind(&new.content_type)
    .bind(new.size_bytes)
    .bind(new.uploaded_by)
    .bind(now_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<StoredFile>, AppError> {
    let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(file)
}

pub async fn find_for(
    pool: &DbPool,
    parent_type: &str,
    parent_id: i64,
) -> Result<Vec<StoredFile>, AppError> {
    let files = sqlx::query_as::<_, StoredFile>(
        "SELECT * FROM files WHERE parent_type = ? AND parent_id = ? ORDER BY created_at, id",
    )
    .bind(parent_type)
    .bind(parent_id)
    .fetch_all(pool)
    .await?;
    Ok(files)
}

/// Delete the record and hand back the stored name so the caller can unlink
/// the blob.
pub async fn delete(pool: &DbPool, id: i64) -> Result<String, AppError> {
    let file = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    sqlx::query("DELETE FROM files WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(file.stored_name)
}
