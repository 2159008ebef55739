use crate::models::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lpfolio_data::MarketDataError;
use lpfolio_execution::AggregationError;

/// Errors returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request was rejected before any upstream call.
    #[error("{0}")]
    BadRequest(String),
    /// An upstream call failed; carries the upstream message.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Upstream(err.upstream_message())
        }
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpfolio_domain::Chain;
    use lpfolio_execution::Stage;
    use lpfolio_protocols::ProtocolError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(AggregationError::MissingUserAddress);
        assert_eq!(err, ApiError::BadRequest("userAddress is required".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_stage_failure_keeps_upstream_text() {
        let err = ApiError::from(AggregationError::Stage {
            stage: Stage::Fee,
            chain: Chain::Arbitrum,
            source: ProtocolError::Transport("execution reverted".to_string()),
        });
        assert_eq!(err, ApiError::Upstream("execution reverted".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_address_is_upstream_failure() {
        let err = ApiError::from(AggregationError::InvalidAddress("0x12".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
