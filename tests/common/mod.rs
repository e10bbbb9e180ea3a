//! Shared test infrastructure for model layer tests.
//!
//! `TestDb::new()` creates a temporary SQLite database, runs the schema and
//! seeds two users (an admin and a technician) so link fields and activity
//! joins have real rows to point at. The TempDir lives inside the struct so
//! the database file survives as long as the pool does.

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tempfile::TempDir;

use lenswerk::auth::password;
use lenswerk::db::{MIGRATIONS, now_string};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";
pub const TECH_USER: &str = "marieke";

pub struct TestDb {
    _dir: TempDir,
    pool: SqlitePool,
    pub admin_id: i64,
    pub technician_id: i64,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("test.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("Failed to open test DB");

        sqlx::raw_sql(MIGRATIONS)
            .execute(&pool)
            .await
            .expect("Failed to run migrations");

        let admin_id = seed_user(&pool, ADMIN_USER, ADMIN_PASS, "Beheerder", "admin").await;
        let technician_id =
            seed_user(&pool, TECH_USER, "Password1!", "Marieke", "technician").await;

        Self {
            _dir: dir,
            pool,
            admin_id,
            technician_id,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn seed_user(
    pool: &SqlitePool,
    username: &str,
    pass: &str,
    display_name: &str,
    role: &str,
) -> i64 {
    let hash = password::hash_password(pass).expect("hash");
    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, display_name, role, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(hash)
    .bind(display_name)
    .bind(role)
    .bind(now_string())
    .execute(pool)
    .await
    .expect("Failed to seed user");
    result.last_insert_rowid()
}

/// A customer row for tests that link entities to one.
#[allow(dead_code)]
pub async fn seed_customer(pool: &SqlitePool, name: &str) -> i64 {
    let result = sqlx::query("INSERT INTO customers (name, email, phone, created_at) VALUES (?, '', '', ?)")
        .bind(name)
        .bind(now_string())
        .execute(pool)
        .await
        .expect("Failed to seed customer");
    result.last_insert_rowid()
}
