use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(crate::routes::health::health))
        // Pages
        .route("/", get(crate::routes::pages::index))
        .route("/report", get(crate::routes::pages::report_page))
        .route("/test", get(crate::routes::pages::test_page))
        .route("/aggregated", get(crate::routes::pages::aggregated_page))
        // Page model as JSON
        .route("/api/page/{kind}", get(crate::routes::pages::page_json))
        .route("/api/index", get(crate::routes::pages::index_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
