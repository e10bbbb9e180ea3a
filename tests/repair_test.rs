/// Integration tests for the repair model: lifecycle transitions, the
/// completion stamp that feeds turnaround analytics, and parts.

use lenswerk::models::repair::{self, NewRepair, NewRepairPart, RepairPatch};

mod common;
use common::TestDb;

fn new_repair(title: &str) -> NewRepair {
    NewRepair {
        title: title.to_string(),
        description: String::new(),
        priority: None,
        issue_category: String::new(),
        sla_due: None,
        customer_id: None,
        order_id: None,
        case_id: None,
        technician_id: None,
    }
}

fn to_status(status: &str) -> RepairPatch {
    RepairPatch {
        status: Some(status.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_starts_as_new() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let id = repair::create(pool, &new_repair("Canon 5D shutter stuck")).await.expect("create");
    let r = repair::find_by_id(pool, id).await.expect("query").expect("exists");

    assert_eq!(r.status, "new");
    assert!(r.completed_at.is_none());
}

#[tokio::test]
async fn lifecycle_walk_stamps_completed_at_once() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = repair::create(pool, &new_repair("Nikkor 50mm fungus")).await.expect("create");

    repair::update(pool, id, &to_status("diagnosing")).await.expect("transition");
    repair::update(pool, id, &to_status("in_repair")).await.expect("transition");
    repair::update(pool, id, &to_status("completed")).await.expect("transition");

    let r = repair::find_by_id(pool, id).await.expect("query").expect("exists");
    let stamped = r.completed_at.clone().expect("completion stamp");

    // Moving on to returned keeps the original stamp.
    repair::update(pool, id, &to_status("returned")).await.expect("transition");
    let r = repair::find_by_id(pool, id).await.expect("query").expect("exists");
    assert_eq!(r.completed_at.as_deref(), Some(stamped.as_str()));
}

#[tokio::test]
async fn illegal_jumps_are_rejected() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = repair::create(pool, &new_repair("Leica M6 rangefinder")).await.expect("create");

    // new → completed skips the bench entirely.
    assert!(repair::update(pool, id, &to_status("completed")).await.is_err());
    assert!(repair::update(pool, id, &to_status("returned")).await.is_err());

    repair::update(pool, id, &to_status("canceled")).await.expect("cancel");
    // Terminal: nothing leaves canceled.
    assert!(repair::update(pool, id, &to_status("in_repair")).await.is_err());
}

#[tokio::test]
async fn diagnosing_and_in_repair_swap_freely() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = repair::create(pool, &new_repair("Hasselblad back")).await.expect("create");

    repair::update(pool, id, &to_status("in_repair")).await.expect("transition");
    repair::update(pool, id, &to_status("diagnosing")).await.expect("back to bench");
    repair::update(pool, id, &to_status("in_repair")).await.expect("transition");
}

#[tokio::test]
async fn non_status_patch_keeps_the_status() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = repair::create(pool, &new_repair("Sony A7 sensor dust")).await.expect("create");
    repair::update(pool, id, &to_status("diagnosing")).await.expect("transition");

    let patch = RepairPatch {
        priority: Some("high".to_string()),
        technician_id: Some(db.technician_id),
        ..Default::default()
    };
    repair::update(pool, id, &patch).await.expect("update");

    let r = repair::find_by_id(pool, id).await.expect("query").expect("exists");
    assert_eq!(r.status, "diagnosing");
    assert_eq!(r.priority, "high");
    assert_eq!(r.technician_id, Some(db.technician_id));
}

#[tokio::test]
async fn parts_attach_and_cascade() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = repair::create(pool, &new_repair("OM-1 prism")).await.expect("create");

    repair::add_part(
        pool,
        id,
        &NewRepairPart {
            name: "Prism foam kit".to_string(),
            quantity: 1,
            unit_price_cents: 850,
        },
    )
    .await
    .expect("part");

    let parts = repair::find_parts(pool, id).await.expect("query");
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "Prism foam kit");

    repair::delete(pool, id).await.expect("delete");
    let parts = repair::find_parts(pool, id).await.expect("query");
    assert!(parts.is_empty());
}

#[tokio::test]
async fn list_filters_by_status_and_technician() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let mine = {
        let mut r = new_repair("Mine");
        r.technician_id = Some(db.technician_id);
        repair::create(pool, &r).await.expect("create")
    };
    repair::create(pool, &new_repair("Unassigned")).await.expect("create");

    let by_tech = repair::find_all(pool, None, Some(db.technician_id)).await.expect("list");
    assert_eq!(by_tech.len(), 1);
    assert_eq!(by_tech[0].id, mine);
    assert_eq!(by_tech[0].technician_name, "Marieke");

    let new_only = repair::find_all(pool, Some("new"), None).await.expect("list");
    assert_eq!(new_only.len(), 2);
}
