//! Pooled HTTP transport.
//!
//! Holds the only shared mutable resource of a client: the `reqwest`
//! connection pool. The pool is released exactly once, either through
//! [`Transport::close`] or when the transport is dropped; any request issued
//! afterwards fails fast with a connection error.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use thunderstore_core::{Constraint, ThunderstoreError, ThunderstoreResult, ValidationError};

use crate::api::ApiRequest;
use crate::config::ClientConfig;

const USER_AGENT_VALUE: &str = concat!("thunderstore-client/", env!("CARGO_PKG_VERSION"));

/// Status, body and rate-limit hint of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Parsed `Retry-After` header (seconds form only)
    pub retry_after: Option<Duration>,
}

/// Connection pool plus the settings every request shares
#[derive(Debug)]
pub struct Transport {
    /// `None` once released
    client: RwLock<Option<Client>>,
    base_url: Url,
    timeout: Duration,
    releases: Arc<AtomicUsize>,
}

impl Transport {
    /// Build the pool, default headers and base URL from configuration
    pub fn new(config: &ClientConfig) -> ThunderstoreResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ValidationError::new(
                    "api_token",
                    Constraint::Invalid {
                        detail: format!("not a valid header value: {}", e),
                    },
                )
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .gzip(true)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ThunderstoreError::connection(format!("failed to create HTTP client: {}", e), e)
            })?;

        Ok(Self {
            client: RwLock::new(Some(client)),
            base_url,
            timeout: config.timeout,
            releases: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a request: base URL, encoded segments, trailing slash, query
    pub fn url_for(&self, request: &ApiRequest) -> ThunderstoreResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ValidationError::new(
                    "base_url",
                    Constraint::MalformedUrl {
                        detail: "cannot be used as a base".to_string(),
                    },
                )
            })?;
            segments.pop_if_empty();
            segments.extend(&request.segments);
            segments.push("");
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Send one request and collect its status and body
    pub async fn execute(&self, request: &ApiRequest) -> ThunderstoreResult<RawResponse> {
        let client = self
            .client
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(closed_error)?;
        let url = self.url_for(request)?;
        debug!(method = %request.method, url = %url, "sending request");

        let response = client
            .request(request.method.clone(), url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify("request failed", e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify("failed to read response body", e))?
            .to_vec();

        debug!(status, bytes = body.len(), "received response");
        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }

    /// Release the connection pool; returns `false` if it was already released
    pub fn close(&self) -> bool {
        let released = self.client.write().take().is_some();
        if released {
            self.releases.fetch_add(1, Ordering::SeqCst);
            debug!(base_url = %self.base_url, "transport released");
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    #[cfg(test)]
    pub(crate) fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Release counter that outlives the transport
    #[cfg(test)]
    pub(crate) fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ValidationError> {
    let malformed = |detail: String| {
        ValidationError::new("base_url", Constraint::MalformedUrl { detail })
    };

    let url = Url::parse(raw.trim()).map_err(|e| malformed(format!("'{}': {}", raw, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(malformed(format!("'{}' is not an http(s) URL", raw)));
    }
    Ok(site_root(url))
}

/// API prefixes a base URL may already end with
const API_PREFIXES: [&str; 3] = ["/api/v1", "/api/experimental", "/api/cyberstorm"];

/// Drop a trailing API prefix so request segments are not doubled
fn site_root(mut url: Url) -> Url {
    let path = url.path().trim_end_matches('/');
    if let Some(prefix) = API_PREFIXES.iter().find(|prefix| path.ends_with(*prefix)) {
        let root = format!("{}/", &path[..path.len() - prefix.len()]);
        debug!(base_url = %url, root = %root, "base URL names an API version, using site root");
        url.set_path(&root);
    }
    url
}

fn closed_error() -> ThunderstoreError {
    ThunderstoreError::Connection {
        message: "transport is closed".to_string(),
        source: None,
    }
}

/// Split reqwest failures into deadline and connection errors
fn classify(context: &str, err: reqwest::Error) -> ThunderstoreError {
    if err.is_timeout() {
        ThunderstoreError::timeout(format!("{}: {}", context, err), err)
    } else {
        ThunderstoreError::connection(format!("{}: {}", context, err), err)
    }
}
