//! Shared multipart plumbing for the two upload endpoints.

use std::path::PathBuf;

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::errors::AppError;
use crate::models::file::MAX_FILES_PER_UPLOAD;

/// Where uploaded blobs land on disk. Injected as app data at startup.
#[derive(Debug, Clone)]
pub struct UploadDir(pub PathBuf);

/// One file part, fully buffered. Parts are collected before anything is
/// written so the per-request cap can reject the whole batch up front.
pub struct UploadedPart {
    pub field_name: String,
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub async fn collect_parts(payload: &mut Multipart) -> Result<Vec<UploadedPart>, AppError> {
    let mut parts = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let (field_name, original_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or("file").to_string(),
                match cd.get_filename() {
                    Some(f) if !f.is_empty() => f.to_string(),
                    // Non-file form values are ignored.
                    _ => continue,
                },
            ),
            None => continue,
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read failed: {e}")))?
        {
            data.extend_from_slice(&chunk);
        }

        parts.push(UploadedPart {
            field_name,
            original_name,
            content_type,
            data,
        });
        if parts.len() > MAX_FILES_PER_UPLOAD {
            return Err(AppError::Validation(format!(
                "At most {MAX_FILES_PER_UPLOAD} files per upload"
            )));
        }
    }

    if parts.is_empty() {
        return Err(AppError::Validation("No files in upload".to_string()));
    }
    Ok(parts)
}

/// Write one buffered part under its stored name. Returns the byte count.
pub fn persist_part(dir: &UploadDir, stored_name: &str, part: &UploadedPart) -> Result<i64, AppError> {
    std::fs::create_dir_all(&dir.0)?;
    let path = dir.0.join(stored_name);
    std::fs::write(&path, &part.data)?;
    Ok(part.data.len() as i64)
}
