use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::server::app::AppState;

/// Reports `degraded` with a 503 when the database does not answer a ping.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status_code, status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "chatroom-server",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database
        })),
    )
}
