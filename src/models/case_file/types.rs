use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUSES: &[&str] = &["open", "pending", "closed"];
pub const PRIORITIES: &[&str] = &["low", "normal", "high"];
pub const LINK_TARGETS: &[&str] = &[
    "order",
    "repair",
    "purchase_order",
    "appointment",
    "todo",
    "customer",
];

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Case {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
}

/// Absent fields stay unchanged; empty `sla_due` clears it, customer 0
/// clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseLink {
    pub id: i64,
    pub case_id: i64,
    pub target_type: String,
    pub target_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCaseLink {
    pub target_type: String,
    pub target_id: i64,
}
