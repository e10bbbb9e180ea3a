use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::customer;

pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let customers = customer::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<customer::NewCustomer>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = customer::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "customer.created",
        "customer",
        id,
        serde_json::json!({"name": body.name.trim()}),
    )
    .await;

    let created = customer::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let customer = customer::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<customer::CustomerPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    customer::update(&pool, id, &body).await?;

    crate::activity::log(&pool, user_id, "customer.updated", "customer", id, serde_json::json!({}))
        .await;

    let updated = customer::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}
