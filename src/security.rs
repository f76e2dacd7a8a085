use serde_json::Value;

/// A captcha token was missing or failed remote verification.
pub const EVENT_CAPTCHA_FAILED: &str = "captcha_failed";

/// A client exhausted its crawl-request quota.
pub const EVENT_QUOTA_EXCEEDED: &str = "quota_exceeded";

/// A crawl aborted with an error that escaped the scheduler.
pub const EVENT_CRAWL_ERROR: &str = "crawl_error";

/// Record a security-relevant event as one structured log line.
///
/// The context value may carry detail that is never sent to clients.
pub fn log_event(event: &str, context: &Value, client: &str) {
    ::log::warn!(
        "security event {} client={} context={}",
        event,
        client,
        context
    );
}
