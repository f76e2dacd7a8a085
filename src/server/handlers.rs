//! Request handlers for the crawl API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Deserializer};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::config::CrawlConfig;
use crate::crawler::Crawler;
use crate::error::ApiError;
use crate::filter::ExclusionFilter;
use crate::security;
use crate::utils::sanitize_url_input;

use super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Request body for `POST /api/crawl`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub url: String,

    #[serde(default, deserialize_with = "lenient_budget")]
    pub max_pages: Option<usize>,

    #[serde(default, deserialize_with = "lenient_budget")]
    pub max_depth: Option<usize>,

    #[serde(default)]
    pub recaptcha_token: String,
}

/// Decode a budget value leniently: anything that is not a non-negative
/// integer (wrong type, negative, fractional) counts as absent, so the
/// defaults apply instead of a deserialization rejection.
fn lenient_budget<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()).map(|n| n as usize))
}

/// Crawl a website breadth-first and return the sorted set of found URLs.
pub async fn crawl_site(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let client_ip = addr.ip().to_string();

    // Body-level rejections keep the `{ success: false, error }` shape.
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let raw = sanitize_url_input(&request.url);
    if raw.is_empty() {
        return Err(ApiError::Validation("url is required".to_string()));
    }

    let start_url = Url::parse(&raw)
        .map_err(|_| ApiError::Validation(format!("invalid url: {}", raw)))?;
    if !matches!(start_url.scheme(), "http" | "https") || start_url.host_str().is_none() {
        return Err(ApiError::Validation(format!(
            "url must be absolute http(s): {}",
            raw
        )));
    }

    let used = state.quota.increment(&client_ip).await;
    if used > state.settings.quota_max_requests {
        security::log_event(
            security::EVENT_QUOTA_EXCEEDED,
            &serde_json::json!({ "requests_in_window": used }),
            &client_ip,
        );
        return Err(ApiError::QuotaExceeded);
    }

    if request.recaptcha_token.is_empty()
        || !state
            .captcha
            .verify(&request.recaptcha_token, Some(&client_ip))
            .await
    {
        security::log_event(
            security::EVENT_CAPTCHA_FAILED,
            &serde_json::json!({ "url": start_url.as_str() }),
            &client_ip,
        );
        return Err(ApiError::Captcha);
    }

    let config = CrawlConfig::clamped(start_url, request.max_pages, request.max_depth);
    let crawler = Crawler::new(
        state.fetcher.clone(),
        ExclusionFilter::new(state.settings.exclude_patterns.clone()),
    )
    .with_politeness_delay(Duration::from_millis(state.settings.politeness_ms));

    // Run the crawl on its own task so anything escaping the scheduler
    // surfaces as a 500 instead of tearing down the connection.
    let crawl_config = config.clone();
    let outcome = match tokio::spawn(async move { crawler.run(&crawl_config).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            security::log_event(
                security::EVENT_CRAWL_ERROR,
                &serde_json::json!({ "url": config.start_url.as_str(), "detail": e.to_string() }),
                &client_ip,
            );
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "urls": outcome.urls,
        "totalFound": outcome.total_found,
        "maxPages": config.max_pages,
        "maxDepth": config.max_depth,
    })))
}
