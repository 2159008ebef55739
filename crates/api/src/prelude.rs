//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use lpfolio_api::prelude::*;
//! ```

// Configuration
pub use crate::config::{ApiConfig, ConfigError};

// Errors
pub use crate::error::ApiError;

// Models
pub use crate::models::{ErrorResponse, GetPositionsRequest, HealthResponse};

// Routing and server
pub use crate::routes::create_router;
pub use crate::server::{ApiServer, ServerConfig};

// Services and state
pub use crate::services::{PositionService, PriceService};
pub use crate::state::AppState;
