/// Errors from market data providers.
#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    /// The request could not be sent or its body not read.
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    /// Upstream answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },
    /// Response body is not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// No API key configured for the provider.
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
}

impl MarketDataError {
    /// HTTP status returned by upstream, if it answered.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
