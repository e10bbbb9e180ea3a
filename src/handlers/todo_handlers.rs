use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::todo;

#[derive(Deserialize)]
pub struct TodoListQuery {
    pub status: Option<String>,
}

pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<TodoListQuery>,
) -> Result<HttpResponse, AppError> {
    let todos = todo::find_all(&pool, query.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<todo::NewTodo>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = todo::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "todo.created",
        "todo",
        id,
        serde_json::json!({"title": body.title.trim()}),
    )
    .await;

    let created = todo::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let todo = todo::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(todo))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<todo::TodoPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    todo::update(&pool, id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "todo.updated",
        "todo",
        id,
        serde_json::json!({"status": body.status}),
    )
    .await;

    let updated = todo::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    todo::delete(&pool, id).await?;

    crate::activity::log(&pool, user_id, "todo.deleted", "todo", id, serde_json::json!({})).await;
    Ok(HttpResponse::NoContent().finish())
}
