use sea_orm::DatabaseConnection;

use crate::database::connection::{connect_and_migrate, MEMORY_DATABASE};

pub async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate(MEMORY_DATABASE)
        .await
        .expect("Failed to set up test database")
}
