use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUSES: &[&str] = &[
    "new",
    "diagnosing",
    "in_repair",
    "completed",
    "returned",
    "canceled",
];
pub const PRIORITIES: &[&str] = &["low", "normal", "high"];

/// Allowed status moves. Diagnosing and in-repair swap freely; a completed
/// repair can only go back to the customer, and terminal states stay put.
pub fn can_transition(from: &str, to: &str) -> bool {
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        ("new", "diagnosing")
            | ("new", "in_repair")
            | ("new", "canceled")
            | ("diagnosing", "in_repair")
            | ("diagnosing", "completed")
            | ("diagnosing", "canceled")
            | ("in_repair", "diagnosing")
            | ("in_repair", "completed")
            | ("in_repair", "canceled")
            | ("completed", "returned")
    )
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Repair {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub issue_category: String,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub technician_id: Option<i64>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// For the repair list: joined display names plus attachment rollup.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairListItem {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub issue_category: String,
    pub sla_due: Option<String>,
    pub customer_name: String,
    pub technician_name: String,
    pub file_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRepair {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub issue_category: String,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub technician_id: Option<i64>,
}

/// Absent fields stay unchanged; empty `sla_due` clears it, zero link ids
/// clear the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub issue_category: Option<String>,
    pub sla_due: Option<String>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub technician_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairPart {
    pub id: i64,
    pub repair_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRepairPart {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price_cents: i64,
}

fn default_quantity() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_repair_lifecycle() {
        assert!(can_transition("new", "diagnosing"));
        assert!(can_transition("new", "in_repair"));
        assert!(can_transition("diagnosing", "in_repair"));
        assert!(can_transition("in_repair", "diagnosing"));
        assert!(can_transition("in_repair", "completed"));
        assert!(can_transition("completed", "returned"));
        assert!(can_transition("diagnosing", "canceled"));
        assert!(can_transition("returned", "returned"));

        assert!(!can_transition("new", "completed"));
        assert!(!can_transition("new", "returned"));
        assert!(!can_transition("completed", "in_repair"));
        assert!(!can_transition("returned", "new"));
        assert!(!can_transition("canceled", "in_repair"));
    }
}
