use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the prediction engine and its model client.
///
/// `Clone` so a single response can be fanned out to the state slot and any
/// observer; the non-cloneable sources are wrapped in `Arc`.
#[derive(Clone, Debug, Error)]
pub enum PredictionError {
    #[error("http error: {0}")]
    Http(Arc<reqwest::Error>),
    #[error("json error: {0}")]
    Json(Arc<serde_json::Error>),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("request timed out")]
    Timeout,
    #[error("request cancelled")]
    Cancelled,
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(Arc::new(err))
        }
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}
