use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike};

use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::dashboard;
use crate::templates_structs::{DashboardTemplate, PageContext};

fn time_greeting(username: &str) -> String {
    let hour = Local::now().hour();
    let period = match hour {
        5..=11 => "Goedemorgen",
        12..=17 => "Goedemiddag",
        _ => "Goedenavond",
    };
    format!("{period}, {username}")
}

pub async fn index(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session)?;
    let greeting = time_greeting(&ctx.username);

    let month_prefix = Local::now().format("%Y-%m").to_string();
    let stats = dashboard::stats(&pool, &month_prefix).await?;
    let recent_activity = crate::activity::find_recent(&pool, 8).await.unwrap_or_default();

    render(DashboardTemplate {
        ctx,
        greeting,
        stats,
        recent_activity,
    })
}

/// GET /api/dashboard/stats — the same snapshot the HTML page renders.
pub async fn stats(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let month_prefix = Local::now().format("%Y-%m").to_string();
    let stats = dashboard::stats(&pool, &month_prefix).await?;
    Ok(HttpResponse::Ok().json(stats))
}
