use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Inkoop lifecycle: bought in, goods received, booked into stock.
pub const STATUSES: &[&str] = &["aangekocht", "ontvangen", "verwerkt"];

/// The chain only moves forward; a received order cannot become merely
/// bought again.
pub fn can_transition(from: &str, to: &str) -> bool {
    let index = |s: &str| STATUSES.iter().position(|&v| v == s);
    match (index(from), index(to)) {
        (Some(f), Some(t)) => t >= f,
        _ => false,
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub supplier: String,
    pub reference: String,
    pub status: String,
    pub expected_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// For the purchase-order list page: order plus line-item rollups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseOrderListItem {
    pub id: i64,
    pub supplier: String,
    pub reference: String,
    pub status: String,
    pub expected_date: Option<String>,
    pub item_count: i64,
    pub items_total_cents: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchaseOrder {
    pub supplier: String,
    #[serde(default)]
    pub reference: String,
    pub expected_date: Option<String>,
}

/// Absent fields stay unchanged; an empty `expected_date` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOrderPatch {
    pub supplier: Option<String>,
    pub reference: Option<String>,
    pub status: Option<String>,
    pub expected_date: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseOrderItem {
    pub id: i64,
    pub purchase_order_id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchaseOrderItem {
    pub purchase_order_id: i64,
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price_cents: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOrderItemPatch {
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chain_is_forward_only() {
        assert!(can_transition("aangekocht", "ontvangen"));
        assert!(can_transition("aangekocht", "verwerkt"));
        assert!(can_transition("ontvangen", "verwerkt"));
        assert!(can_transition("ontvangen", "ontvangen"));

        assert!(!can_transition("ontvangen", "aangekocht"));
        assert!(!can_transition("verwerkt", "ontvangen"));
        assert!(!can_transition("aangekocht", "retour"));
    }
}
