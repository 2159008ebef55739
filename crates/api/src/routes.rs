//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Methods allowed by the CORS layer.
const CORS_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];
/// Headers allowed by the CORS layer.
const CORS_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::AUTHORIZATION];

/// Creates the application router.
///
/// Every `OPTIONS` request, with or without preflight headers, is answered by
/// the CORS layer with `200` and an empty body.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(CORS_METHODS)
        .allow_headers(CORS_HEADERS);

    let api = Router::new()
        .route("/get-positions", post(handlers::get_positions))
        .route("/get-token-prices", get(handlers::get_token_prices));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
