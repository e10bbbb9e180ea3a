use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::order;

pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let orders = order::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<order::NewOrder>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = order::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "order.created",
        "order",
        id,
        serde_json::json!({"order_number": body.order_number.trim()}),
    )
    .await;

    let created = order::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let order = order::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<order::OrderPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    order::update(&pool, id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "order.updated",
        "order",
        id,
        serde_json::json!({"status": body.status}),
    )
    .await;

    let updated = order::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    order::delete(&pool, id).await?;

    crate::activity::log(&pool, user_id, "order.deleted", "order", id, serde_json::json!({})).await;
    Ok(HttpResponse::NoContent().finish())
}
