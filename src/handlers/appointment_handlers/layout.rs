use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::agenda::{GridConfig, GridEvent, LayoutBlock, ViewMode, fetch_window, layout_day, window_days};
use crate::db::{DATE_FMT, DbPool};
use crate::errors::AppError;
use crate::models::appointment;

#[derive(Deserialize)]
pub struct LayoutQuery {
    pub view: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "showAllHours", default)]
    pub show_all_hours: bool,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

#[derive(Serialize)]
struct DayColumn {
    date: String,
    blocks: Vec<LayoutBlock>,
}

#[derive(Serialize)]
struct LayoutResponse {
    view: &'static str,
    start: String,
    end: String,
    show_all_hours: bool,
    total_height: f64,
    /// Week and day views only; month and list render from `appointments`.
    days: Option<Vec<DayColumn>>,
    appointments: Vec<appointment::Occurrence>,
}

/// GET /api/agenda/layout — fetch window plus, for week/day views, positioned
/// blocks per day column.
pub async fn layout(
    pool: web::Data<DbPool>,
    query: web::Query<LayoutQuery>,
) -> Result<HttpResponse, AppError> {
    let view = match query.view.as_deref() {
        Some(v) => ViewMode::parse(v)
            .ok_or_else(|| AppError::Validation(format!("Unknown view '{v}'")))?,
        None => ViewMode::Week,
    };
    let reference = match query.date.as_deref() {
        Some(d) => appointment::parse_date(d)?,
        None => Local::now().date_naive(),
    };

    let (start, end) = fetch_window(view, reference);
    let occurrences = appointment::find_in_window(&pool, start, end, query.user_id).await?;

    let cfg = GridConfig::default();
    let days = match view {
        ViewMode::Week | ViewMode::Day => {
            let events: Vec<GridEvent> = occurrences
                .iter()
                .map(|o| {
                    Ok(GridEvent {
                        id: o.id,
                        series_id: o.series_id,
                        title: o.title.clone(),
                        kind: o.kind.clone(),
                        start: appointment::parse_datetime(&o.starts_at)?,
                        end: appointment::parse_datetime(&o.ends_at)?,
                    })
                })
                .collect::<Result<_, AppError>>()?;

            Some(
                window_days(start, end)
                    .into_iter()
                    .map(|day| DayColumn {
                        date: day.format(DATE_FMT).to_string(),
                        blocks: layout_day(&cfg, day, query.show_all_hours, &events),
                    })
                    .collect(),
            )
        }
        ViewMode::Month | ViewMode::List => None,
    };

    Ok(HttpResponse::Ok().json(LayoutResponse {
        view: view.as_str(),
        start: start.format(DATE_FMT).to_string(),
        end: end.format(DATE_FMT).to_string(),
        show_all_hours: query.show_all_hours,
        total_height: cfg.total_height(query.show_all_hours),
        days,
        appointments: occurrences,
    }))
}
