use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::errors::AppError;

/// One aggregate snapshot for the dashboard cards and `/api/dashboard/stats`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub repairs_open: i64,
    pub repairs_in_repair: i64,
    pub repairs_completed_this_month: i64,
    pub avg_turnaround_days: Option<f64>,
    pub top_technicians: Vec<TechnicianCount>,
    pub top_issue_categories: Vec<CategoryCount>,
    pub open_cases: i64,
    pub open_todos: i64,
    pub purchase_orders_awaiting_receipt: i64,
}

/// Completed-repair tally per technician.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TechnicianCount {
    pub technician_id: i64,
    pub technician_name: String,
    pub completed_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub issue_category: String,
    pub repair_count: i64,
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
}

/// Compute the whole snapshot. `month_prefix` is `YYYY-MM` of the month the
/// "completed this month" card covers (the caller passes the current month).
pub async fn stats(pool: &DbPool, month_prefix: &str) -> Result<DashboardStats, AppError> {
    let repairs_open = count(
        pool,
        "SELECT COUNT(*) FROM repairs WHERE status IN ('new', 'diagnosing', 'in_repair')",
    )
    .await?;
    let repairs_in_repair =
        count(pool, "SELECT COUNT(*) FROM repairs WHERE status = 'in_repair'").await?;

    let repairs_completed_this_month: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM repairs WHERE completed_at IS NOT NULL AND completed_at LIKE ?",
    )
    .bind(format!("{month_prefix}%"))
    .fetch_one(pool)
    .await?;

    // Lexicographic timestamps are also valid julianday() input.
    let avg_turnaround_days: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(julianday(completed_at) - julianday(created_at)) \
         FROM repairs WHERE completed_at IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;

    let top_technicians = sqlx::query_as::<_, TechnicianCount>(
        "SELECT t.id AS technician_id, \
                COALESCE(NULLIF(t.display_name, ''), t.username) AS technician_name, \
                COUNT(*) AS completed_count \
         FROM repairs r \
         JOIN users t ON r.technician_id = t.id \
         WHERE r.completed_at IS NOT NULL \
         GROUP BY t.id \
         ORDER BY completed_count DESC, technician_name \
         LIMIT 3",
    )
    .fetch_all(pool)
    .await?;

    let top_issue_categories = sqlx::query_as::<_, CategoryCount>(
        "SELECT issue_category, COUNT(*) AS repair_count \
         FROM repairs \
         WHERE issue_category != '' \
         GROUP BY issue_category \
         ORDER BY repair_count DESC, issue_category \
         LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    let open_cases = count(pool, "SELECT COUNT(*) FROM cases WHERE status != 'closed'").await?;
    let open_todos = count(pool, "SELECT COUNT(*) FROM todos WHERE status = 'open'").await?;
    let purchase_orders_awaiting_receipt = count(
        pool,
        "SELECT COUNT(*) FROM purchase_orders WHERE status = 'aangekocht'",
    )
    .await?;

    Ok(DashboardStats {
        repairs_open,
        repairs_in_repair,
        repairs_completed_this_month,
        avg_turnaround_days,
        top_technicians,
        top_issue_categories,
        open_cases,
        open_todos,
        purchase_orders_awaiting_receipt,
    })
}
