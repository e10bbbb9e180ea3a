use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::uploads::{UploadDir, collect_parts, persist_part};
use crate::models::{file, purchase_order};

/// POST /api/purchase-orders/{id}/files — multipart attachment upload.
pub async fn upload(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    upload_dir: web::Data<UploadDir>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let po_id = path.into_inner();
    purchase_order::find_by_id(&pool, po_id).await?.ok_or(AppError::NotFound)?;

    let parts = collect_parts(&mut payload).await?;

    let mut stored = Vec::with_capacity(parts.len());
    for part in &parts {
        let stored_name = file::random_stored_name(&part.original_name);
        let size_bytes = persist_part(&upload_dir, &stored_name, part)?;
        let id = file::create(
            &pool,
            &file::NewFile {
                parent_type: "purchase_order".to_string(),
                parent_id: po_id,
                kind: "attachment".to_string(),
                original_name: part.original_name.clone(),
                stored_name,
                content_type: part.content_type.clone(),
                size_bytes,
                uploaded_by: user_id,
            },
        )
        .await?;
        stored.push(id);
    }

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.files_uploaded",
        "purchase_order",
        po_id,
        serde_json::json!({"count": stored.len(), "file_ids": stored}),
    )
    .await;

    let files = file::find_for(&pool, "purchase_order", po_id).await?;
    Ok(HttpResponse::Created().json(files))
}
