/// Integration tests for the dashboard aggregates: status counts, the
/// completed-this-month card, and the top-N rollups.

use chrono::Local;

use lenswerk::models::case_file::{self, NewCase};
use lenswerk::models::purchase_order::{self, NewPurchaseOrder};
use lenswerk::models::repair::{self, NewRepair, RepairPatch};
use lenswerk::models::todo::{self, NewTodo};
use lenswerk::models::dashboard;

mod common;
use common::TestDb;

fn new_repair(title: &str, issue_category: &str, technician_id: Option<i64>) -> NewRepair {
    NewRepair {
        title: title.to_string(),
        description: String::new(),
        priority: None,
        issue_category: issue_category.to_string(),
        sla_due: None,
        customer_id: None,
        order_id: None,
        case_id: None,
        technician_id,
    }
}

fn month_prefix() -> String {
    Local::now().format("%Y-%m").to_string()
}

async fn complete(pool: &sqlx::SqlitePool, id: i64) {
    for status in ["diagnosing", "completed"] {
        let patch = RepairPatch {
            status: Some(status.to_string()),
            ..Default::default()
        };
        repair::update(pool, id, &patch).await.expect("transition");
    }
}

#[tokio::test]
async fn empty_database_yields_zeroed_stats() {
    let db = TestDb::new().await;
    let stats = dashboard::stats(db.pool(), &month_prefix()).await.expect("stats");

    assert_eq!(stats.repairs_open, 0);
    assert_eq!(stats.repairs_completed_this_month, 0);
    assert!(stats.avg_turnaround_days.is_none());
    assert!(stats.top_technicians.is_empty());
    assert!(stats.top_issue_categories.is_empty());
}

#[tokio::test]
async fn counts_split_open_and_completed_repairs() {
    let db = TestDb::new().await;
    let pool = db.pool();

    repair::create(pool, &new_repair("Open one", "", None)).await.expect("create");
    let in_repair = repair::create(pool, &new_repair("On the bench", "", None)).await.expect("create");
    repair::update(
        pool,
        in_repair,
        &RepairPatch {
            status: Some("in_repair".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("transition");

    let done = repair::create(pool, &new_repair("Done one", "", None)).await.expect("create");
    complete(pool, done).await;

    let stats = dashboard::stats(pool, &month_prefix()).await.expect("stats");
    assert_eq!(stats.repairs_open, 2);
    assert_eq!(stats.repairs_in_repair, 1);
    assert_eq!(stats.repairs_completed_this_month, 1);
    // Same-day completion: turnaround is present and tiny.
    let avg = stats.avg_turnaround_days.expect("turnaround");
    assert!((0.0..1.0).contains(&avg));
}

#[tokio::test]
async fn top_technicians_rank_by_completed_count() {
    let db = TestDb::new().await;
    let pool = db.pool();

    for title in ["First", "Second"] {
        let id = repair::create(pool, &new_repair(title, "", Some(db.technician_id)))
            .await
            .expect("create");
        complete(pool, id).await;
    }
    let id = repair::create(pool, &new_repair("Third", "", Some(db.admin_id))).await.expect("create");
    complete(pool, id).await;

    let stats = dashboard::stats(pool, &month_prefix()).await.expect("stats");
    assert_eq!(stats.top_technicians.len(), 2);
    assert_eq!(stats.top_technicians[0].technician_id, db.technician_id);
    assert_eq!(stats.top_technicians[0].technician_name, "Marieke");
    assert_eq!(stats.top_technicians[0].completed_count, 2);
    assert_eq!(stats.top_technicians[1].completed_count, 1);
}

#[tokio::test]
async fn issue_categories_rank_by_frequency() {
    let db = TestDb::new().await;
    let pool = db.pool();

    for title in ["A", "B"] {
        repair::create(pool, &new_repair(title, "shutter", None)).await.expect("create");
    }
    repair::create(pool, &new_repair("C", "fungus", None)).await.expect("create");
    // Uncategorized repairs never show up in the rollup.
    repair::create(pool, &new_repair("D", "", None)).await.expect("create");

    let stats = dashboard::stats(pool, &month_prefix()).await.expect("stats");
    assert_eq!(stats.top_issue_categories.len(), 2);
    assert_eq!(stats.top_issue_categories[0].issue_category, "shutter");
    assert_eq!(stats.top_issue_categories[0].repair_count, 2);
    assert_eq!(stats.top_issue_categories[1].issue_category, "fungus");
}

#[tokio::test]
async fn open_work_counters_cover_cases_todos_and_purchasing() {
    let db = TestDb::new().await;
    let pool = db.pool();

    case_file::create(
        pool,
        &NewCase {
            title: "Open case".to_string(),
            description: String::new(),
            priority: None,
            sla_due: None,
            customer_id: None,
        },
    )
    .await
    .expect("case");

    todo::create(
        pool,
        &NewTodo {
            title: "Open todo".to_string(),
            description: String::new(),
            priority: None,
            due_date: None,
            assignee_id: None,
            order_id: None,
            case_id: None,
            repair_id: None,
        },
    )
    .await
    .expect("todo");

    purchase_order::create(
        pool,
        &NewPurchaseOrder {
            supplier: "CameraParts BV".to_string(),
            reference: String::new(),
            expected_date: None,
        },
    )
    .await
    .expect("po");
    let received = purchase_order::create(
        pool,
        &NewPurchaseOrder {
            supplier: "Fotohandel Noord".to_string(),
            reference: String::new(),
            expected_date: None,
        },
    )
    .await
    .expect("po");
    purchase_order::update(
        pool,
        received,
        &purchase_order::PurchaseOrderPatch {
            status: Some("ontvangen".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("receive");

    let stats = dashboard::stats(pool, &month_prefix()).await.expect("stats");
    assert_eq!(stats.open_cases, 1);
    assert_eq!(stats.open_todos, 1);
    // Only the order still awaiting goods counts.
    assert_eq!(stats.purchase_orders_awaiting_receipt, 1);
}
