use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::purchase_order;

/// GET /api/purchase-order-items/{po_id} — line items for one order.
pub async fn list_items(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let po_id = path.into_inner();
    purchase_order::find_by_id(&pool, po_id).await?.ok_or(AppError::NotFound)?;
    let items = purchase_order::find_items(&pool, po_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn create_item(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<purchase_order::NewPurchaseOrderItem>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = purchase_order::add_item(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.item_added",
        "purchase_order",
        body.purchase_order_id,
        serde_json::json!({"item_id": id, "description": body.description.trim()}),
    )
    .await;

    let created = purchase_order::find_item_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_item(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<purchase_order::PurchaseOrderItemPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    purchase_order::update_item(&pool, id, &body).await?;

    let updated = purchase_order::find_item_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.item_updated",
        "purchase_order",
        updated.purchase_order_id,
        serde_json::json!({"item_id": id}),
    )
    .await;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_item(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    let existing = purchase_order::find_item_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    purchase_order::delete_item(&pool, id).await?;

    crate::activity::log(
        &pool,
        user_id,
        "purchase_order.item_removed",
        "purchase_order",
        existing.purchase_order_id,
        serde_json::json!({"item_id": id}),
    )
    .await;
    Ok(HttpResponse::NoContent().finish())
}
