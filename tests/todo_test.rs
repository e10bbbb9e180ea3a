/// Integration tests for the todo model, driving the same functions the
/// `/api/todos` handlers call.

use lenswerk::models::todo::{self, NewTodo, TodoPatch};

mod common;
use common::TestDb;

fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        description: String::new(),
        priority: None,
        due_date: None,
        assignee_id: None,
        order_id: None,
        case_id: None,
        repair_id: None,
    }
}

#[tokio::test]
async fn create_and_read_back() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let id = todo::create(pool, &new_todo("  Order sensor swabs  ")).await.expect("create");
    let found = todo::find_by_id(pool, id).await.expect("query").expect("exists");

    assert_eq!(found.title, "Order sensor swabs");
    assert_eq!(found.status, "open");
    assert_eq!(found.priority, "normal");
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let db = TestDb::new().await;
    let result = todo::create(db.pool(), &new_todo("   ")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn create_rejects_unknown_priority() {
    let db = TestDb::new().await;
    let mut todo_in = new_todo("Check tripod stock");
    todo_in.priority = Some("urgent".to_string());
    assert!(todo::create(db.pool(), &todo_in).await.is_err());
}

#[tokio::test]
async fn patch_changes_only_provided_fields() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let mut todo_in = new_todo("Call supplier");
    todo_in.description = "About the back-ordered shutter".to_string();
    let id = todo::create(pool, &todo_in).await.expect("create");

    let patch = TodoPatch {
        status: Some("done".to_string()),
        ..Default::default()
    };
    todo::update(pool, id, &patch).await.expect("update");

    let found = todo::find_by_id(pool, id).await.expect("query").expect("exists");
    assert_eq!(found.status, "done");
    assert_eq!(found.title, "Call supplier");
    assert_eq!(found.description, "About the back-ordered shutter");
}

#[tokio::test]
async fn empty_due_date_clears_it_and_zero_clears_links() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let mut todo_in = new_todo("Prepare loaner body");
    todo_in.due_date = Some("2026-09-01".to_string());
    todo_in.assignee_id = Some(db.technician_id);
    let id = todo::create(pool, &todo_in).await.expect("create");

    let patch = TodoPatch {
        due_date: Some(String::new()),
        assignee_id: Some(0),
        ..Default::default()
    };
    todo::update(pool, id, &patch).await.expect("update");

    let found = todo::find_by_id(pool, id).await.expect("query").expect("exists");
    assert!(found.due_date.is_none());
    assert!(found.assignee_id.is_none());
}

#[tokio::test]
async fn list_puts_open_todos_before_done_and_sorts_by_due_date() {
    let db = TestDb::new().await;
    let pool = db.pool();

    let mut later = new_todo("Later");
    later.due_date = Some("2026-09-20".to_string());
    let later_id = todo::create(pool, &later).await.expect("create");

    let mut soon = new_todo("Soon");
    soon.due_date = Some("2026-09-02".to_string());
    let soon_id = todo::create(pool, &soon).await.expect("create");

    let done_id = todo::create(pool, &new_todo("Finished")).await.expect("create");
    let patch = TodoPatch {
        status: Some("done".to_string()),
        ..Default::default()
    };
    todo::update(pool, done_id, &patch).await.expect("update");

    let all = todo::find_all(pool, None).await.expect("list");
    let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![soon_id, later_id, done_id]);

    let open_only = todo::find_all(pool, Some("open")).await.expect("list");
    assert_eq!(open_only.len(), 2);
}

#[tokio::test]
async fn delete_missing_todo_is_not_found() {
    let db = TestDb::new().await;
    assert!(todo::delete(db.pool(), 12345).await.is_err());
}
