use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::appointment::{self, build_ics};

use super::crud::{WindowQuery, parse_window};

/// GET /api/appointments/export.ics — the expanded window as a calendar
/// download.
pub async fn export_ics(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = parse_window(&query)?;
    let occurrences = appointment::find_in_window(&pool, start, end, query.user_id).await?;
    let ics = build_ics(&occurrences, "Lenswerk agenda");

    Ok(HttpResponse::Ok()
        .content_type("text/calendar; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"agenda-{start}-{end}.ics\""),
        ))
        .body(ics))
}
