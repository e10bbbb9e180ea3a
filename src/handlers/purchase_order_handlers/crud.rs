use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::{require_role, require_user};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{file, note, purchase_order};

#[derive(Deserialize)]
pub struct PoListQuery {
    pub status: Option<String>,
}

pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<PoListQuery>,
) -> Result<HttpResponse, AppError> {
    let orders = purchase_order::find_all(&pool, query.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<purchase_order::NewPurchaseOrder>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = purchase_order::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.created",
        "purchase_order",
        id,
        serde_json::json!({"supplier": body.supplier.trim()}),
    )
    .await;

    let created = purchase_order::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/purchase-orders/{id} — the order plus its sub-resources in one
/// response, the shape the detail modal renders.
pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let po = purchase_order::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let items = purchase_order::find_items(&pool, id).await?;
    let files = file::find_for(&pool, "purchase_order", id).await?;
    let notes = note::find_for(&pool, "purchase_order", id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "purchase_order": po,
        "items": items,
        "files": files,
        "notes": notes,
    })))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<purchase_order::PurchaseOrderPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    purchase_order::update(&pool, id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.updated",
        "purchase_order",
        id,
        serde_json::json!({"status": body.status}),
    )
    .await;

    let updated = purchase_order::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
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
    purchase_order::delete(&pool, id).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.deleted",
        "purchase_order",
        id,
        serde_json::json!({}),
    )
    .await;
    Ok(HttpResponse::NoContent().finish())
}
