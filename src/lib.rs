// Re-export modules
pub mod captcha;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod limits;
pub mod security;
pub mod server;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, ServerSettings};
pub use crawler::{CrawlOutcome, Crawler};
pub use filter::ExclusionFilter;
