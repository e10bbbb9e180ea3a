use actix_files::NamedFile;
use actix_session::Session;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::{require_role, require_user};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::uploads::UploadDir;
use crate::models::file;

/// GET /api/files/{id} — stream the blob back under its original name.
pub async fn download(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    upload_dir: web::Data<UploadDir>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;

    let f = file::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    let blob_path = upload_dir.0.join(&f.stored_name);
    let named = NamedFile::open_async(&blob_path)
        .await
        .map_err(|_| AppError::NotFound)?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(f.original_name.clone())],
        });
    Ok(named.into_response(&req))
}

/// DELETE /api/files/{id} — remove row and blob. Admin only.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    upload_dir: web::Data<UploadDir>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, "admin")?;
    let user_id = require_user(&session)?;

    let id = path.into_inner();
    let stored_name = file::delete(&pool, id).await?;
    if let Err(e) = std::fs::remove_file(upload_dir.0.join(&stored_name)) {
        // The row is gone either way; an orphaned blob only wastes disk.
        log::warn!("Failed to remove blob {stored_name}: {e}");
    }

    crate::activity::log(&pool, user_id, "file.deleted", "file", id, serde_json::json!({})).await;
    Ok(HttpResponse::NoContent().finish())
}
