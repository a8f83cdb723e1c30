use thiserror::Error;

/// Failures raised while talking to the upstream market-data provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The symbol cannot be a ticker, so it is never sent upstream.
    #[error("invalid ticker symbol {0:?}")]
    InvalidSymbol(String),

    /// The provider does not know the symbol.
    #[error("no data found for symbol {0}")]
    NotFound(String),

    /// The per-call time limit expired before the provider answered.
    #[error("upstream request timed out for symbol {0}")]
    Timeout(String),

    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream responded with {status} for symbol {symbol}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider answered, but with an error payload or an unusable shape.
    #[error("upstream provider error: {0}")]
    Provider(String),
}

impl UpstreamError {
    /// Classify a transport error, keeping timeouts distinct.
    pub(crate) fn from_request(symbol: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(symbol.to_string())
        } else {
            UpstreamError::Request(e)
        }
    }
}
