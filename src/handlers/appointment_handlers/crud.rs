use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::appointment::{self, Scope};

/// `timeMin`/`timeMax` accept a date or a full timestamp; only the date part
/// matters for the fetch window. The parameter names are the console's.
#[derive(Deserialize)]
pub struct WindowQuery {
    #[serde(rename = "timeMin")]
    pub time_min: Option<String>,
    #[serde(rename = "timeMax")]
    pub time_max: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

pub(super) fn parse_window(query: &WindowQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    let date_part = |s: &str| appointment::parse_date(s.get(..10).unwrap_or(s));
    let start = match query.time_min.as_deref() {
        Some(s) => date_part(s)?,
        None => Local::now().date_naive(),
    };
    let end = match query.time_max.as_deref() {
        Some(s) => date_part(s)?,
        None => start + Duration::days(14),
    };
    if end <= start {
        return Err(AppError::Validation("timeMax must lie after timeMin".to_string()));
    }
    Ok((start, end))
}

pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = parse_window(&query)?;
    let occurrences = appointment::find_in_window(&pool, start, end, query.user_id).await?;
    Ok(HttpResponse::Ok().json(occurrences))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<appointment::NewAppointment>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let now = Local::now().naive_local();
    let id = appointment::create(&pool, &body, now).await?;

    crate::activity::log(
        &pool,
        user_id,
        "appointment.created",
        "appointment",
        id,
        serde_json::json!({"title": body.title.trim(), "starts_at": body.starts_at}),
    )
    .await;

    let created = appointment::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn read(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let appointment = appointment::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[derive(Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: Scope,
    pub original_start: Option<String>,
}

pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<ScopeQuery>,
    body: web::Json<appointment::AppointmentPatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    let now = Local::now().naive_local();
    let target_id =
        appointment::update(&pool, id, query.scope, query.original_start.as_deref(), &body, now)
            .await?;

    crate::activity::log(
        &pool,
        user_id,
        "appointment.updated",
        "appointment",
        target_id,
        serde_json::json!({"scope": query.scope}),
    )
    .await;

    let updated = appointment::find_by_id(&pool, target_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<ScopeQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    appointment::delete(&pool, id, query.scope, query.original_start.as_deref()).await?;

    crate::activity::log(
        &pool,
        user_id,
        "appointment.deleted",
        "appointment",
        id,
        serde_json::json!({"scope": query.scope}),
    )
    .await;
    Ok(HttpResponse::NoContent().finish())
}
