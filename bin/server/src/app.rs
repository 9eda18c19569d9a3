//! HTTP routing.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use juniper::http::GraphQLRequest;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{AppState, BearerCaller};
use crate::graphql::GraphQLContext;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GraphQL POST endpoint.
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    BearerCaller(caller): BearerCaller,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    let context = GraphQLContext::new(caller, state.auth.clone(), state.gates.clone());
    let response = request.execute(&state.schema, &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// Liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
