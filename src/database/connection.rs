use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

use crate::database::migrations::Migrator;

pub const MEMORY_DATABASE: &str = ":memory:";

// sqlx adds these to `Instant::now()`, so `Duration::MAX` would overflow
const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(u32::MAX as u64);

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(connect_options(database_url)).await
}

/// Pool settings for `database_url`.
pub fn connect_options(database_url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(database_url.to_string());

    if database_url.starts_with("sqlite::memory:") {
        // Every pooled connection would otherwise open its own empty database
        opt.max_connections(1).min_connections(1);
        // Recycling the only connection drops the database with it
        opt.idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    } else {
        opt.max_connections(20)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(3600));
    }

    opt.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(true);

    opt
}

pub fn get_database_url(database_path: Option<&str>) -> String {
    match database_path {
        Some(path) if path == MEMORY_DATABASE => "sqlite::memory:".to_string(),
        Some(path) => format!("sqlite://{}?mode=rwc", path),
        None => "sqlite://chatroom.db?mode=rwc".to_string(),
    }
}

/// Bring the schema up to date on an open connection.
pub async fn setup_database(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    info!("Database migrations completed");
    Ok(())
}

/// Connect to the database at `database_path` and apply pending migrations.
pub async fn connect_and_migrate(database_path: &str) -> Result<DatabaseConnection, DbErr> {
    let db = establish_connection(&get_database_url(Some(database_path))).await?;
    setup_database(&db).await?;
    Ok(db)
}
