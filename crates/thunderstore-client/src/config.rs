//! Client configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `THUNDERSTORE_URL` | API root (default: `https://thunderstore.io`) |
//! | `THUNDERSTORE_API_TOKEN` | Bearer token sent with every request |
//! | `THUNDERSTORE_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `THUNDERSTORE_COMMUNITY` | Community applied when a call omits one |

use std::fmt;
use std::time::Duration;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://thunderstore.io";

/// Deadline applied to every request unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options recognized when constructing a client
#[derive(Clone)]
pub struct ClientConfig {
    /// API root every request path is appended to
    pub base_url: String,
    /// Bearer token for the `Authorization` header
    pub api_token: Option<String>,
    /// Per-request deadline
    pub timeout: Duration,
    /// Community filter used when a listing or search omits one
    pub default_community: Option<String>,
    /// Retry policy; `None` disables retries
    pub retry: Option<RetryConfig>,
}

/// Opt-in exponential backoff for transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            default_community: None,
            retry: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `THUNDERSTORE_*` environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("THUNDERSTORE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_token: std::env::var("THUNDERSTORE_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            timeout: std::env::var("THUNDERSTORE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            default_community: std::env::var("THUNDERSTORE_COMMUNITY")
                .ok()
                .filter(|community| !community.is_empty()),
            retry: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_community(mut self, community: impl Into<String>) -> Self {
        self.default_community = Some(community.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("default_community", &self.default_community)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (zero-based), capped at `max_delay`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(32) as i32);
        let millis = (self.initial_delay.as_millis() as f64 * factor) as u64;
        Duration::from_millis(millis).min(self.max_delay)
    }

    /// Delay honoring a server hint, still capped at `max_delay`
    pub fn delay_with_hint(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        match hint {
            Some(hint) => hint.min(self.max_delay),
            None => self.delay_for(attempt),
        }
    }
}
