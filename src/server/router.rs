use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers;
use crate::state::AppState;

/// Creates the application router.
///
/// Routes mirror the two logical operations exposed to callers, plus a
/// health probe:
/// - `POST /index-url`: fetch and index a page
/// - `POST /ask`: answer a question about an indexed page
/// - `GET /health`: service and provider status
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/index-url", post(handlers::index_url))
        .route("/ask", post(handlers::ask))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
