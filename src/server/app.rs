use anyhow::{anyhow, Result};
use async_graphql::{Request, Response as GraphQLResponse};
use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::health;
use crate::graphql::{build_schema, GraphQLContext, GraphQLSchema};
use crate::services::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub graphql_schema: GraphQLSchema,
}

pub async fn create_app_with_service(
    chat_service: ChatService,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let db = chat_service.db().clone();
    let graphql_schema = build_schema(GraphQLContext::with_chat_service(chat_service));

    let state = AppState { db, graphql_schema };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers(Any)
    .allow_credentials(false);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/graphql",
            get(graphql_playground)
                .post(graphql_handler)
                .options(|| async { axum::http::StatusCode::OK }),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

async fn graphql_handler(
    State(state): State<AppState>,
    Json(req): Json<Request>,
) -> Json<GraphQLResponse> {
    tracing::debug!("GraphQL request received");
    let response = state.graphql_schema.execute(req).await;
    tracing::debug!("GraphQL request completed");
    Json(response)
}

async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
