//! HTTP layer exposing the crawler as a JSON API.
//!
//! One POST endpoint drives the whole pipeline: sanitize and validate the
//! requested URL, enforce the per-client quota, verify the captcha token,
//! run the crawl, and return the sorted found set.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::captcha::{CaptchaVerifier, RecaptchaVerifier};
use crate::config::ServerSettings;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::limits::{CounterStore, MemoryCounterStore};

/// Shared state for the crawl service.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub captcha: Arc<dyn CaptchaVerifier>,
    pub quota: Arc<dyn CounterStore>,
    pub settings: Arc<ServerSettings>,
}

impl AppState {
    /// Wire up the production collaborators from settings.
    pub fn new(settings: &ServerSettings) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(settings.fetch_timeout_secs);

        Ok(Self {
            fetcher: Arc::new(HttpFetcher::new(&settings.user_agent, timeout)?),
            captcha: Arc::new(RecaptchaVerifier::new(
                settings.recaptcha_secret.clone(),
                timeout,
            )?),
            quota: Arc::new(MemoryCounterStore::new(Duration::from_secs(
                settings.quota_window_secs,
            ))),
            settings: Arc::new(settings.clone()),
        })
    }
}

/// Start the web server and serve until shutdown.
pub async fn serve(settings: &ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    ::log::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Fetcher serving one tiny site rooted at https://example.com/.
    struct StaticSiteFetcher;

    #[async_trait]
    impl PageFetcher for StaticSiteFetcher {
        async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
            match url {
                "https://example.com/" => Ok(r#"<a href="/about">about</a>
                    <a href="/files/report.pdf">report</a>"#
                    .to_string()),
                "https://example.com/about/" => Ok("<html></html>".to_string()),
                _ => Err(FetchError::Status(404)),
            }
        }
    }

    /// Captcha verifier with a fixed verdict.
    struct FixedVerdict(bool);

    #[async_trait]
    impl CaptchaVerifier for FixedVerdict {
        async fn verify(&self, _token: &str, _client_ip: Option<&str>) -> bool {
            self.0
        }
    }

    fn test_app(captcha_passes: bool, quota_max_requests: u64) -> axum::Router {
        let settings = ServerSettings {
            politeness_ms: 0,
            quota_max_requests,
            ..ServerSettings::default()
        };

        let state = AppState {
            fetcher: Arc::new(StaticSiteFetcher),
            captcha: Arc::new(FixedVerdict(captcha_passes)),
            quota: Arc::new(MemoryCounterStore::new(Duration::from_secs(3600))),
            settings: Arc::new(settings),
        };

        create_router(state)
    }

    fn crawl_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/crawl")
            .header("content-type", "application/json")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_url_rejected() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({ "recaptchaToken": "tok" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_malformed_url_rejected() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "not a url",
                "recaptchaToken": "tok"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_non_http_scheme_rejected() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "ftp://example.com/",
                "recaptchaToken": "tok"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_captcha_short_circuits() {
        let app = test_app(false, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "https://example.com/",
                "recaptchaToken": "bad"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("captcha verification failed"));
    }

    #[tokio::test]
    async fn test_missing_captcha_token_rejected() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({ "url": "https://example.com/" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_successful_crawl_response_shape() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "https://example.com/",
                "maxPages": 10,
                "maxDepth": 2,
                "recaptchaToken": "tok"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["maxPages"], json!(10));
        assert_eq!(body["maxDepth"], json!(2));
        // The PDF link is excluded; root and /about/ remain, sorted.
        assert_eq!(
            body["urls"],
            json!(["https://example.com/", "https://example.com/about/"])
        );
        assert_eq!(body["totalFound"], json!(2));
    }

    #[tokio::test]
    async fn test_wrong_typed_budgets_fall_back_to_defaults() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "https://example.com/",
                "maxPages": "ten",
                "maxDepth": -2,
                "recaptchaToken": "tok"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["maxPages"], json!(100));
        assert_eq!(body["maxDepth"], json!(3));
    }

    #[tokio::test]
    async fn test_unparseable_body_rejected_with_json_error() {
        let app = test_app(true, 10);
        let request = Request::builder()
            .method("POST")
            .uri("/api/crawl")
            .header("content-type", "application/json")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
            .body(Body::from("{ not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_budgets_clamped_to_ceilings() {
        let app = test_app(true, 10);
        let response = app
            .oneshot(crawl_request(json!({
                "url": "https://example.com/",
                "maxPages": 999999,
                "maxDepth": 99,
                "recaptchaToken": "tok"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["maxPages"], json!(2000));
        assert_eq!(body["maxDepth"], json!(5));
    }

    #[tokio::test]
    async fn test_quota_exhaustion_returns_429() {
        let app = test_app(true, 1);
        let request_body = json!({
            "url": "https://example.com/",
            "recaptchaToken": "tok"
        });

        let first = app
            .clone()
            .oneshot(crawl_request(request_body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(crawl_request(request_body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(second).await;
        assert_eq!(body["success"], json!(false));
    }
}
