//! Configuration for the Scholar API server and its upstream client.

use std::time::Duration;

/// Upstream configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for Google Scholar.
    pub const BASE_URL: &str = "https://scholar.google.com";

    /// Interface language requested from Google Scholar.
    pub const LANGUAGE: &str = "en";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay before each results-page request.
    pub const PAGE_DELAY: Duration = Duration::from_millis(500);

    /// Retries for transient upstream failures (connection errors, 5xx, 429).
    pub const MAX_RETRIES: u32 = 2;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Browser-like user agent. Scholar serves a stripped page to unknown agents.
    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
}

/// HTTP surface constants.
pub mod server {
    /// Default bind host.
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// Default bind port.
    pub const DEFAULT_PORT: u16 = 5001;

    /// Maximum number of papers returned per request.
    pub const MAX_PAPERS: usize = 5;
}

/// Upstream client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for Google Scholar (for testing with mock servers).
    pub scholar_url: String,

    /// Interface language (`hl` parameter).
    pub language: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each results-page request.
    pub page_delay: Duration,

    /// Retries for transient failures.
    pub max_retries: u32,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Config {
    /// Create a configuration pointing at the given Scholar base URL.
    #[must_use]
    pub fn new(scholar_url: Option<String>) -> Self {
        Self {
            scholar_url: scholar_url.map_or_else(
                || api::BASE_URL.to_string(),
                |url| url.trim_end_matches('/').to_string(),
            ),
            language: api::LANGUAGE.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            page_delay: api::PAGE_DELAY,
            max_retries: api::MAX_RETRIES,
            user_agent: api::USER_AGENT.to_string(),
        }
    }

    /// Create a test configuration with a custom URL for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            scholar_url: base_url.trim_end_matches('/').to_string(),
            language: api::LANGUAGE.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            page_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
            user_agent: api::USER_AGENT.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `SCHOLAR_BASE_URL` and `SCHOLAR_LANGUAGE`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var("SCHOLAR_BASE_URL").ok());
        if let Ok(language) = std::env::var("SCHOLAR_LANGUAGE") {
            anyhow::ensure!(!language.trim().is_empty(), "SCHOLAR_LANGUAGE must not be empty");
            config.language = language;
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}
