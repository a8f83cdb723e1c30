use crate::model::ErrorBody;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tickerboard_yahoo::UpstreamError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid ticker symbol {0:?}")]
    InvalidTicker(String),

    /// The one-day series had no close to report as the last price.
    #[error("no recent close available for {0}")]
    EmptyHistory(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidTicker(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(UpstreamError::InvalidSymbol(_)) => StatusCode::BAD_REQUEST,
            ApiError::EmptyHistory(_) => StatusCode::BAD_GATEWAY,
            ApiError::Upstream(UpstreamError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
