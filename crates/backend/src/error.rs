use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failures surfaced by the weather proxy.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("weather provider unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("weather provider returned {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error("weather provider returned an unreadable body: {0}")]
    UpstreamBody(#[from] serde_json::Error),
    #[error("invalid provider url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCoordinates { .. } => StatusCode::BAD_REQUEST,
            ApiError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) | ApiError::UpstreamStatus(_) | ApiError::UpstreamBody(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "weather request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
