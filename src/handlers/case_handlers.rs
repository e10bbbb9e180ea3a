use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{case_file, note};

#[derive(Deserialize)]
pub struct CaseListQuery {
    pub status: Option<String>,
}

pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<CaseListQuery>,
) -> Result<HttpResponse, AppError> {
    let cases = case_file::find_all(&pool, query.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(cases))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<case_file::NewCase>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = case_file::create(&pool, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "case.created",
        "case",
        id,
        serde_json::json!({"title": body.title.trim()}),
    )
    .await;

    let created = case_file::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/cases/{id} — case plus links and notes for the detail modal.
pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let case = case_file::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let links = case_file::find_links(&pool, id).await?;
    let notes = note::find_for(&pool, "case", id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "case": case,
        "links": links,
        "notes": notes,
    })))
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<case_file::CasePatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    case_file::update(&pool, id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "case.updated",
        "case",
        id,
        serde_json::json!({"status": body.status}),
    )
    .await;

    let updated = case_file::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    case_file::delete(&pool, id).await?;

    crate::activity::log(&pool, user_id, "case.deleted", "case", id, serde_json::json!({})).await;
    Ok(HttpResponse::NoContent().finish())
}

// ---------------------------------------------------------------------------
// Cross-entity links
// ---------------------------------------------------------------------------

pub async fn list_links(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let case_id = path.into_inner();
    case_file::find_by_id(&pool, case_id).await?.ok_or(AppError::NotFound)?;
    let links = case_file::find_links(&pool, case_id).await?;
    Ok(HttpResponse::Ok().json(links))
}

pub async fn create_link(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<case_file::NewCaseLink>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let case_id = path.into_inner();
    case_file::add_link(&pool, case_id, &body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "case.linked",
        "case",
        case_id,
        serde_json::json!({"target_type": body.target_type, "target_id": body.target_id}),
    )
    .await;

    let links = case_file::find_links(&pool, case_id).await?;
    Ok(HttpResponse::Created().json(links))
}

pub async fn delete_link(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    case_file::delete_link(&pool, id).await?;

    crate::activity::log(&pool, user_id, "case.unlinked", "case_link", id, serde_json::json!({}))
        .await;
    Ok(HttpResponse::NoContent().finish())
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct NewNoteBody {
    pub body: String,
}

pub async fn list_notes(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let case_id = path.into_inner();
    case_file::find_by_id(&pool, case_id).await?.ok_or(AppError::NotFound)?;
    let notes = note::find_for(&pool, "case", case_id).await?;
    Ok(HttpResponse::Ok().json(notes))
}

pub async fn create_note(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<NewNoteBody>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let case_id = path.into_inner();
    case_file::find_by_id(&pool, case_id).await?.ok_or(AppError::NotFound)?;

    let id = note::create(&pool, "case", case_id, user_id, &body.body).await?;

    crate::activity::log(
        &pool,
        user_id,
        "case.note_added",
        "case",
        case_id,
        serde_json::json!({"note_id": id}),
    )
    .await;

    let notes = note::find_for(&pool, "case", case_id).await?;
    Ok(HttpResponse::Created().json(notes))
}
