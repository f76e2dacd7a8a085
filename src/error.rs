use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A single page fetch that could not produce HTML.
///
/// Always recovered by the scheduler: the page contributes zero links and
/// the crawl continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or timeout from the HTTP client.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Response was not an HTML document.
    #[error("unsupported content type {0:?}")]
    ContentType(Option<String>),
}

/// Errors surfaced to API callers as `{ success: false, error }` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field; the crawl never starts.
    #[error("{0}")]
    Validation(String),

    /// Missing or failed reCAPTCHA verification; the crawl never starts.
    #[error("captcha verification failed")]
    Captcha,

    /// The client exhausted its request quota for the current window.
    #[error("too many requests, try again later")]
    QuotaExceeded,

    /// Anything escaping the scheduler; raw detail stays server-side.
    #[error("unexpected error during crawl")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Captcha => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Display output never carries the Internal detail string; it is
        // recorded server-side here instead.
        if let Self::Internal(detail) = &self {
            ::log::error!("internal error: {}", detail);
        }
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
