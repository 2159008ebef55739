//! Request handlers.

use crate::error::ApiError;
use crate::models::{GetPositionsRequest, HealthResponse};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use lpfolio_domain::Position;
use serde_json::Value;

/// `POST /api/get-positions`
///
/// The body is parsed leniently: an empty or malformed body, or a falsy
/// `userAddress`, is treated as a request without an address.
pub async fn get_positions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Position>>, ApiError> {
    let request = GetPositionsRequest::from_body(&body);
    let positions = state
        .positions
        .get_positions(request.user_address().as_deref())
        .await?;
    Ok(Json(positions))
}

/// `GET /api/get-token-prices`
pub async fn get_token_prices(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.prices.latest_quotes().await.map(Json)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.chains(),
    })
}
