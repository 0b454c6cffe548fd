pub mod app;
pub mod handlers;

use anyhow::Result;
use clap::ValueEnum;
use sea_orm_migration::prelude::*;
use tracing::info;

use crate::config::ServerConfig;
use crate::database::{connection::*, migrations::Migrator};
use crate::services::ChatService;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

pub async fn start_server(config: &ServerConfig) -> Result<()> {
    config.validate()?;

    let db = connect_and_migrate(&config.database).await?;
    let chat_service = ChatService::new(db).with_password_hash_cost(config.password_hash_cost);

    let app = app::create_app_with_service(chat_service, config.cors_origin.as_deref()).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /graphql                    - GraphQL API (POST) & Playground (GET)");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
