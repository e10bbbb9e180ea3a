use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/activities?limit= — newest entries with usernames resolved.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = crate::activity::find_recent(&pool, query.limit.unwrap_or(50)).await?;
    Ok(HttpResponse::Ok().json(entries))
}
