use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::error::FetchError;

/// Collaborator that retrieves one page of HTML for the scheduler.
///
/// Implementations own their timeout policy; the scheduler treats every
/// error as "this page contributed zero links".
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its HTML body.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher with a shared client, per-request timeout and an
/// identifying User-Agent header.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Identifying User-Agent sent with every request
    /// * `timeout` - Budget for each individual fetch
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        match content_type.as_deref() {
            Some(ct) if is_html(ct) => {}
            _ => return Err(FetchError::ContentType(content_type)),
        }

        Ok(response.text().await?)
    }
}

/// True for HTML and XHTML content types, with or without parameters.
fn is_html(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.starts_with("text/html") || ct.starts_with("application/xhtml+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_content_types_accepted() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(is_html("  TEXT/HTML "));
    }

    #[test]
    fn test_non_html_content_types_rejected() {
        assert!(!is_html("application/json"));
        assert!(!is_html("application/pdf"));
        assert!(!is_html("text/plain"));
        assert!(!is_html("image/png"));
    }
}
