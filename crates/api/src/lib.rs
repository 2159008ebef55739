//! HTTP API for the LP position aggregator.
//!
//! This crate exposes the aggregation core over HTTP:
//! - `POST /api/get-positions` for a wallet's positions and uncollected fees
//! - `GET /api/get-token-prices` market quote passthrough
//! - `GET /health` liveness probe
//! - CORS and request tracing layers
//! - Environment-based configuration and server startup

/// Prelude module for convenient imports.
pub mod prelude;

/// Environment configuration.
pub mod config;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Service layer for API operations.
pub mod services;
/// Application state.
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use services::{PositionService, PriceService};
pub use state::AppState;
