/// Integration tests for the purchase-order model: CRUD, the forward-only
/// Dutch status chain, and the line-item sub-resource.

use lenswerk::models::purchase_order::{
    self, NewPurchaseOrder, NewPurchaseOrderItem, PurchaseOrderItemPatch, PurchaseOrderPatch,
};

mod common;
use common::TestDb;

fn new_po(supplier: &str) -> NewPurchaseOrder {
    NewPurchaseOrder {
        supplier: supplier.to_string(),
        reference: String::new(),
        expected_date: None,
    }
}

#[tokio::test]
async fn create_starts_in_aangekocht() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let id = purchase_order::create(pool, &new_po("FotoParts BV")).await.expect("create");
    let po = purchase_order::find_by_id(pool, id).await.expect("query").expect("exists");

    assert_eq!(po.supplier, "FotoParts BV");
    assert_eq!(po.status, "aangekocht");
}

#[tokio::test]
async fn create_requires_supplier() {
    let db = TestDb::new().await;
    assert!(purchase_order::create(db.pool(), &new_po("  ")).await.is_err());
}

#[tokio::test]
async fn status_chain_moves_forward_only() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = purchase_order::create(pool, &new_po("FotoParts BV")).await.expect("create");

    let to = |status: &str| PurchaseOrderPatch {
        status: Some(status.to_string()),
        ..Default::default()
    };

    purchase_order::update(pool, id, &to("ontvangen")).await.expect("forward");
    purchase_order::update(pool, id, &to("verwerkt")).await.expect("forward");

    // Going back is rejected and leaves the row untouched.
    assert!(purchase_order::update(pool, id, &to("ontvangen")).await.is_err());
    let po = purchase_order::find_by_id(pool, id).await.expect("query").expect("exists");
    assert_eq!(po.status, "verwerkt");
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = purchase_order::create(pool, &new_po("FotoParts BV")).await.expect("create");

    let patch = PurchaseOrderPatch {
        status: Some("geannuleerd".to_string()),
        ..Default::default()
    };
    assert!(purchase_order::update(pool, id, &patch).await.is_err());
}

#[tokio::test]
async fn line_items_roll_up_into_the_list() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = purchase_order::create(pool, &new_po("LensSupply")).await.expect("create");

    purchase_order::add_item(
        pool,
        &NewPurchaseOrderItem {
            purchase_order_id: id,
            description: "Shutter assembly".to_string(),
            quantity: 2,
            unit_price_cents: 4500,
        },
    )
    .await
    .expect("item");
    purchase_order::add_item(
        pool,
        &NewPurchaseOrderItem {
            purchase_order_id: id,
            description: "Focus ring".to_string(),
            quantity: 1,
            unit_price_cents: 1250,
        },
    )
    .await
    .expect("item");

    let list = purchase_order::find_all(pool, None).await.expect("list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].item_count, 2);
    assert_eq!(list[0].items_total_cents, 2 * 4500 + 1250);
}

#[tokio::test]
async fn item_for_missing_order_is_not_found() {
    let db = TestDb::new().await;
    let result = purchase_order::add_item(
        db.pool(),
        &NewPurchaseOrderItem {
            purchase_order_id: 999,
            description: "Ghost part".to_string(),
            quantity: 1,
            unit_price_cents: 100,
        },
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn item_quantity_must_be_positive() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = purchase_order::create(pool, &new_po("LensSupply")).await.expect("create");

    let item_id = purchase_order::add_item(
        pool,
        &NewPurchaseOrderItem {
            purchase_order_id: id,
            description: "Aperture blades".to_string(),
            quantity: 5,
            unit_price_cents: 300,
        },
    )
    .await
    .expect("item");

    let patch = PurchaseOrderItemPatch {
        quantity: Some(0),
        ..Default::default()
    };
    assert!(purchase_order::update_item(pool, item_id, &patch).await.is_err());
}

#[tokio::test]
async fn deleting_the_order_cascades_to_items() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = purchase_order::create(pool, &new_po("LensSupply")).await.expect("create");
    purchase_order::add_item(
        pool,
        &NewPurchaseOrderItem {
            purchase_order_id: id,
            description: "Mount".to_string(),
            quantity: 1,
            unit_price_cents: 900,
        },
    )
    .await
    .expect("item");

    purchase_order::delete(pool, id).await.expect("delete");
    let items = purchase_order::find_items(pool, id).await.expect("query");
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_filters_by_status() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let a = purchase_order::create(pool, &new_po("A")).await.expect("create");
    purchase_order::create(pool, &new_po("B")).await.expect("create");
    let patch = PurchaseOrderPatch {
        status: Some("ontvangen".to_string()),
        ..Default::default()
    };
    purchase_order::update(pool, a, &patch).await.expect("update");

    let received = purchase_order::find_all(pool, Some("ontvangen")).await.expect("list");
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].id, a);
}
