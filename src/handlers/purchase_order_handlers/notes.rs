use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{note, purchase_order};

#[derive(Deserialize)]
pub struct NewNoteBody {
    pub body: String,
}

pub async fn list_notes(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let po_id = path.into_inner();
    purchase_order::find_by_id(&pool, po_id).await?.ok_or(AppError::NotFound)?;
    let notes = note::find_for(&pool, "purchase_order", po_id).await?;
    Ok(HttpResponse::Ok().json(notes))
}

pub async fn create_note(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<NewNoteBody>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let po_id = path.into_inner();
    purchase_order::find_by_id(&pool, po_id).await?.ok_or(AppError::NotFound)?;

    let id = note::create(&pool, "purchase_order", po_id, user_id, &body.body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.note_added",
        "purchase_order",
        po_id,
        serde_json::json!({"note_id": id}),
    )
    .await;

    let notes = note::find_for(&pool, "purchase_order", po_id).await?;
    Ok(HttpResponse::Created().json(notes))
}
