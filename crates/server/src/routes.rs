use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Create the API router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/scan", post(handlers::scan))
        .route("/scans", get(handlers::list_scans))
        .route("/scans/:id", get(handlers::get_scan))
        .route("/scans/:id/findings", get(handlers::get_scan_findings));

    Router::new()
        .nest("/api/v1", api_v1)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
