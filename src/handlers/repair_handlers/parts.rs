use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::repair;

pub async fn list_parts(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let repair_id = path.into_inner();
    repair::find_by_id(&pool, repair_id).await?.ok_or(AppError::NotFound)?;
    let parts = repair::find_parts(&pool, repair_id).await?;
    Ok(HttpResponse::Ok().json(parts))
}

pub async fn add_part(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<repair::NewRepairPart>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let repair_id = path.into_inner();
    let id = repair::add_part(&pool, repair_id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "repair.part_added",
        "repair",
        repair_id,
        serde_json::json!({"part_id": id, "name": body.name.trim()}),
    )
    .await;

    let parts = repair::find_parts(&pool, repair_id).await?;
    Ok(HttpResponse::Created().json(parts))
}

pub async fn delete_part(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    repair::delete_part(&pool, id).await?;

    crate::activity::log(
        &pool,
        user_id,
        "repair.part_removed",
        "repair_part",
        id,
        serde_json::json!({}),
    )
    .await;
    Ok(HttpResponse::NoContent().finish())
}
