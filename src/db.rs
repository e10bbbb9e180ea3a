use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub type DbPool = SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

/// Storage format for timestamps: local-naive, lexicographically sortable.
pub const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Current local time in storage format.
pub fn now_string() -> String {
    chrono::Local::now().format(DATETIME_FMT).to_string()
}

pub async fn init_pool(database_path: &str) -> DbPool {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .expect("Failed to create DB pool")
}

pub async fn run_migrations(pool: &DbPool) {
    sqlx::raw_sql(MIGRATIONS)
        .execute(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the default admin user if the users table is empty. Idempotent.
pub async fn seed_admin(pool: &DbPool, admin_password_hash: &str) {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    if count > 0 {
        log::info!("Database already seeded ({} users), skipping admin seed", count);
        return;
    }

    sqlx::query(
        "INSERT INTO users (username, password_hash, display_name, role, created_at) \
         VALUES (?, ?, 'Beheerder', 'admin', ?)",
    )
    .bind("admin")
    .bind(admin_password_hash)
    .bind(now_string())
    .execute(pool)
    .await
    .expect("Failed to seed admin user");

    log::info!("Seeded default admin user");
}
