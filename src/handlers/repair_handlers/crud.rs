use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::{require_role, require_user};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{file, note, repair};

#[derive(Deserialize)]
pub struct RepairListQuery {
    pub status: Option<String>,
    pub technician_id: Option<i64>,
}

pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<RepairListQuery>,
) -> Result<HttpResponse, AppError> {
    let repairs = repair::find_all(&pool, query.status.as_deref(), query.technician_id).await?;
    Ok(HttpResponse::Ok().json(repairs))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<repair::NewRepair>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = repair::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "repair.created",
        "repair",
        id,
        serde_json::json!({"title": body.title.trim()}),
    )
    .await;

    let created = repair::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/repairs/{id} — repair plus parts, photos, attachments and notes.
pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let r = repair::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let parts = repair::find_parts(&pool, id).await?;
    let files = file::find_for(&pool, "repair", id).await?;
    let notes = note::find_for(&pool, "repair", id).await?;

    let (photos, attachments): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|f| f.kind == "photo");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "repair": r,
        "parts": parts,
        "photos": photos,
        "attachments": attachments,
        "notes": notes,
    })))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<repair::RepairPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    let before = repair::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    repair::update(&pool, id, &body).await?;

    let mut details = serde_json::json!({});
    if let Some(status) = &body.status {
        if *status != before.status {
            details = serde_json::json!({"from_status": before.status, "to_status": status});
        }
    }
    crate::activity::log(&pool, user_id, "repair.updated", "repair", id, details).await;

    let updated = repair::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, "admin")?;
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    repair::delete(&pool, id).await?;

    crate::activity::log(&pool, user_id, "repair.deleted", "repair", id, serde_json::json!({}))
        .await;
    Ok(HttpResponse::NoContent().finish())
}
