//! Durable key/value storage backed by SQLite.
//!
//! Every partition (session, credential store, inventory, the CRUD views'
//! collections) is one UTF-8 JSON document under a fixed key.

mod store;

pub use store::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Fixed storage keys.
pub mod keys {
    pub const CURRENT_USER: &str = "currentUser";
    pub const DOCTORS: &str = "doctors";
    pub const PATIENTS: &str = "patients";
    pub const APPOINTMENTS: &str = "appointments";
    pub const BILLS: &str = "bills";
    pub const PRESCRIPTIONS: &str = "prescriptions";
    pub const CONSULTATIONS: &str = "consultations";
    pub const FOLLOW_UPS: &str = "followUps";
    pub const INVENTORY: &str = "inventory";

    /// Partitions owned by the external CRUD views; readable, never written here.
    pub const EXTERNAL_PARTITIONS: &[&str] = &[
        PATIENTS,
        APPOINTMENTS,
        BILLS,
        PRESCRIPTIONS,
        CONSULTATIONS,
        FOLLOW_UPS,
    ];
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
