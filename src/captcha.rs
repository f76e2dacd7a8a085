use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Google siteverify endpoint for reCAPTCHA token checks.
const VERIFY_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Collaborator that decides whether a captcha token is acceptable.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// True when the token passes verification.
    async fn verify(&self, token: &str, client_ip: Option<&str>) -> bool;
}

/// reCAPTCHA verifier backed by the Google siteverify endpoint.
pub enum RecaptchaVerifier {
    /// No secret configured; every non-empty token is accepted.
    Disabled,

    /// Tokens are checked against the remote endpoint.
    Enabled { client: Client, secret: String },
}

impl RecaptchaVerifier {
    /// Build a verifier; verification is disabled when no secret is set.
    pub fn new(secret: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => {
                let client = Client::builder().timeout(timeout).build()?;
                Ok(Self::Enabled { client, secret })
            }
            None => {
                ::log::warn!("no recaptcha secret configured, captcha verification is disabled");
                Ok(Self::Disabled)
            }
        }
    }
}

/// Response body of the siteverify endpoint.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,

    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, client_ip: Option<&str>) -> bool {
        let Self::Enabled { client, secret } = self else {
            return true;
        };

        if token.is_empty() {
            return false;
        }

        let mut params = vec![("secret", secret.as_str()), ("response", token)];
        if let Some(ip) = client_ip {
            params.push(("remoteip", ip));
        }

        let response = match client.post(VERIFY_ENDPOINT).form(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::error!("captcha verification request failed: {}", e);
                return false;
            }
        };

        match response.json::<VerifyResponse>().await {
            Ok(body) => {
                if !body.success {
                    ::log::info!("captcha token rejected: {:?}", body.error_codes);
                }
                body.success
            }
            Err(e) => {
                ::log::error!("captcha verification response unreadable: {}", e);
                false
            }
        }
    }
}
