/// Integration tests for support cases: CRUD, cross-entity links, and the
/// notes sub-resource.

use lenswerk::models::case_file::{self, CasePatch, NewCase, NewCaseLink};
use lenswerk::models::{note, repair};

mod common;
use common::{TestDb, seed_customer};

fn new_case(title: &str) -> NewCase {
    NewCase {
        title: title.to_string(),
        description: String::new(),
        priority: None,
        sla_due: None,
        customer_id: None,
    }
}

fn link_to(target_type: &str, target_id: i64) -> NewCaseLink {
    NewCaseLink {
        target_type: target_type.to_string(),
        target_id,
    }
}

#[tokio::test]
async fn create_and_read_back() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let customer_id = seed_customer(pool, "Jansen Fotografie").await;
    let mut case_in = new_case("  Lens came back hazy  ");
    case_in.customer_id = Some(customer_id);
    case_in.sla_due = Some("2026-08-20".to_string());

    let id = case_file::create(pool, &case_in).await.expect("create");
    let found = case_file::find_by_id(pool, id).await.expect("query").expect("exists");

    assert_eq!(found.title, "Lens came back hazy");
    assert_eq!(found.status, "open");
    assert_eq!(found.priority, "normal");
    assert_eq!(found.customer_id, Some(customer_id));
    assert_eq!(found.sla_due.as_deref(), Some("2026-08-20"));
}

#[tokio::test]
async fn create_rejects_blank_title_and_unknown_priority() {
    let db = TestDb::new().await;
    let pool = db.pool();

    assert!(case_file::create(pool, &new_case("   ")).await.is_err());

    let mut case_in = new_case("Slow shutter");
    case_in.priority = Some("critical".to_string());
    assert!(case_file::create(pool, &case_in).await.is_err());
}

#[tokio::test]
async fn patch_changes_status_and_clears_optionals() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let customer_id = seed_customer(pool, "De Vries").await;
    let mut case_in = new_case("Refund request");
    case_in.customer_id = Some(customer_id);
    case_in.sla_due = Some("2026-08-15".to_string());
    let id = case_file::create(pool, &case_in).await.expect("create");

    let patch = CasePatch {
        status: Some("closed".to_string()),
        sla_due: Some(String::new()),
        customer_id: Some(0),
        ..Default::default()
    };
    case_file::update(pool, id, &patch).await.expect("update");

    let found = case_file::find_by_id(pool, id).await.expect("query").expect("exists");
    assert_eq!(found.status, "closed");
    assert!(found.sla_due.is_none());
    assert!(found.customer_id.is_none());
    // Untouched fields stay put.
    assert_eq!(found.title, "Refund request");
}

#[tokio::test]
async fn update_rejects_unknown_status() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let id = case_file::create(pool, &new_case("Escalation")).await.expect("create");

    let patch = CasePatch {
        status: Some("escalated".to_string()),
        ..Default::default()
    };
    assert!(case_file::update(pool, id, &patch).await.is_err());
}

#[tokio::test]
async fn linking_is_idempotent_per_target() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let case_id = case_file::create(pool, &new_case("Shutter complaint")).await.expect("create");
    let repair_id = repair::create(
        pool,
        &repair::NewRepair {
            title: "Shutter replacement".to_string(),
            description: String::new(),
            priority: None,
            issue_category: String::new(),
            sla_due: None,
            customer_id: None,
            order_id: None,
            case_id: Some(case_id),
            technician_id: None,
        },
    )
    .await
    .expect("repair");

    case_file::add_link(pool, case_id, &link_to("repair", repair_id)).await.expect("link");
    case_file::add_link(pool, case_id, &link_to("repair", repair_id)).await.expect("relink");

    let links = case_file::find_links(pool, case_id).await.expect("query");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target_type, "repair");
    assert_eq!(links[0].target_id, repair_id);
}

#[tokio::test]
async fn linking_rejects_unknown_targets_and_missing_cases() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let case_id = case_file::create(pool, &new_case("Misc")).await.expect("create");

    assert!(case_file::add_link(pool, case_id, &link_to("invoice", 1)).await.is_err());
    assert!(case_file::add_link(pool, 9999, &link_to("order", 1)).await.is_err());
}

#[tokio::test]
async fn deleting_a_case_cascades_links_and_notes() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let case_id = case_file::create(pool, &new_case("To be removed")).await.expect("create");
    case_file::add_link(pool, case_id, &link_to("order", 12)).await.expect("link");
    note::create(pool, "case", case_id, db.admin_id, "First note").await.expect("note");

    case_file::delete(pool, case_id).await.expect("delete");

    assert!(case_file::find_by_id(pool, case_id).await.expect("query").is_none());
    let links = case_file::find_links(pool, case_id).await.expect("query");
    assert!(links.is_empty());
}

#[tokio::test]
async fn delete_missing_case_is_not_found() {
    let db = TestDb::new().await;
    assert!(case_file::delete(db.pool(), 4242).await.is_err());
}

#[tokio::test]
async fn notes_resolve_authors_newest_first() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let case_id = case_file::create(pool, &new_case("Long running")).await.expect("create");

    note::create(pool, "case", case_id, db.admin_id, "  Called the customer  ")
        .await
        .expect("note");
    note::create(pool, "case", case_id, db.technician_id, "Parts ordered")
        .await
        .expect("note");

    let notes = note::find_for(pool, "case", case_id).await.expect("query");
    assert_eq!(notes.len(), 2);
    // Same-second inserts fall back to id order, newest first.
    assert_eq!(notes[0].body, "Parts ordered");
    assert_eq!(notes[0].author_name, "Marieke");
    assert_eq!(notes[1].body, "Called the customer");
    assert_eq!(notes[1].author_name, "Beheerder");
}

#[tokio::test]
async fn blank_note_bodies_are_rejected() {
    let db = TestDb::new().await;
    let pool = db.pool();
    let case_id = case_file::create(pool, &new_case("Quiet one")).await.expect("create");

    assert!(note::create(pool, "case", case_id, db.admin_id, "   ").await.is_err());
    assert!(note::create(pool, "invoice", case_id, db.admin_id, "body").await.is_err());
}
