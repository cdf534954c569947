//! Async client facade.
//!
//! Composes request building, the pooled transport and response
//! interpretation into one method per registry operation.

use tracing::{debug, warn};
use url::Url;

use thunderstore_core::{
    Community, CyberstormCommunity, Package, PackageCategory, PackageExperimental,
    PackageMetrics, PackageVersionExperimental, PackageVersionMetrics, Page, ThunderstoreResult,
};

use crate::api::{self, ApiRequest};
use crate::config::{ClientConfig, RetryConfig};
use crate::interpret;
use crate::transport::{RawResponse, Transport};

/// Client for the Thunderstore API
///
/// Owns exactly one [`Transport`]. The client is intentionally not `Clone`;
/// wrap it in an `Arc` to share it between tasks.
#[derive(Debug)]
pub struct ThunderstoreClient {
    transport: Transport,
    default_community: Option<String>,
    retry: Option<RetryConfig>,
}

impl ThunderstoreClient {
    /// Create a client against the production registry
    pub fn new() -> ThunderstoreResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client configured from `THUNDERSTORE_*` environment variables
    pub fn from_env() -> ThunderstoreResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> ThunderstoreResult<Self> {
        let transport = Transport::new(&config)?;
        debug!(base_url = %transport.base_url(), "created registry client");

        Ok(Self {
            transport,
            default_community: config.default_community.filter(|c| !c.is_empty()),
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn default_community(&self) -> Option<&str> {
        self.default_community.as_deref()
    }

    /// Release the connection pool; later calls fail with a connection error
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    #[cfg(test)]
    pub(crate) fn release_counter(&self) -> std::sync::Arc<std::sync::atomic::AtomicUsize> {
        self.transport.release_counter()
    }

    /// List packages, optionally filtered by community and ordered by a field
    pub async fn list_packages(
        &self,
        community: Option<&str>,
        ordering: Option<&str>,
    ) -> ThunderstoreResult<Vec<Package>> {
        let request = api::list_packages(self.community_or_default(community), ordering);
        interpret::listing(&self.send(&request).await?)
    }

    /// Fetch one package; `None` if the registry does not know it
    pub async fn get_package(&self, owner: &str, name: &str) -> ThunderstoreResult<Option<Package>> {
        let request = api::get_package(owner, name)?;
        interpret::lookup(&self.send(&request).await?)
    }

    /// Search packages by free text; an empty query is rejected before any request
    pub async fn search_packages(
        &self,
        query: &str,
        community: Option<&str>,
    ) -> ThunderstoreResult<Vec<Package>> {
        let request = api::search_packages(query, self.community_or_default(community))?;
        interpret::listing(&self.send(&request).await?)
    }

    pub async fn list_communities(&self) -> ThunderstoreResult<Vec<Community>> {
        interpret::listing(&self.send(&api::list_communities()).await?)
    }

    pub async fn get_community(&self, identifier: &str) -> ThunderstoreResult<Option<Community>> {
        let request = api::get_community(identifier)?;
        interpret::lookup(&self.send(&request).await?)
    }

    /// One page of a community's categories; pass `next` back as `cursor`
    pub async fn list_community_categories(
        &self,
        community: &str,
        cursor: Option<&str>,
    ) -> ThunderstoreResult<Page<PackageCategory>> {
        let request = api::list_community_categories(community, cursor)?;
        interpret::page(&self.send(&request).await?)
    }

    pub async fn get_package_metrics(
        &self,
        owner: &str,
        name: &str,
    ) -> ThunderstoreResult<Option<PackageMetrics>> {
        let request = api::get_package_metrics(owner, name)?;
        interpret::lookup(&self.send(&request).await?)
    }

    pub async fn get_package_version_metrics(
        &self,
        owner: &str,
        name: &str,
        version: &str,
    ) -> ThunderstoreResult<Option<PackageVersionMetrics>> {
        let request = api::get_package_version_metrics(owner, name, version)?;
        interpret::lookup(&self.send(&request).await?)
    }

    /// One page of the experimental package listing; pass `next` back as `cursor`
    pub async fn list_packages_experimental(
        &self,
        cursor: Option<&str>,
    ) -> ThunderstoreResult<Page<PackageExperimental>> {
        let request = api::list_packages_experimental(cursor);
        interpret::page(&self.send(&request).await?)
    }

    pub async fn get_package_experimental(
        &self,
        namespace: &str,
        name: &str,
    ) -> ThunderstoreResult<Option<PackageExperimental>> {
        let request = api::get_package_experimental(namespace, name)?;
        interpret::lookup(&self.send(&request).await?)
    }

    pub async fn get_package_version_experimental(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> ThunderstoreResult<Option<PackageVersionExperimental>> {
        let request = api::get_package_version_experimental(namespace, name, version)?;
        interpret::lookup(&self.send(&request).await?)
    }

    pub async fn get_cyberstorm_community(
        &self,
        identifier: &str,
    ) -> ThunderstoreResult<Option<CyberstormCommunity>> {
        let request = api::get_cyberstorm_community(identifier)?;
        interpret::lookup(&self.send(&request).await?)
    }

    fn community_or_default<'a>(&'a self, community: Option<&'a str>) -> Option<&'a str> {
        community
            .filter(|c| !c.is_empty())
            .or(self.default_community.as_deref())
    }

    /// Execute a request, applying the retry policy if one is configured
    async fn send(&self, request: &ApiRequest) -> ThunderstoreResult<RawResponse> {
        let Some(retry) = &self.retry else {
            return self.transport.execute(request).await;
        };

        let mut attempt = 0;
        loop {
            let error = match self.transport.execute(request).await {
                Ok(response) if !interpret::is_transient(&response) => return Ok(response),
                Ok(response) => interpret::status_error(&response),
                Err(error) => error,
            };

            // Don't retry on final attempt or non-transient failures
            if attempt >= retry.max_retries || !error.is_retryable() || self.transport.is_closed() {
                return Err(error);
            }

            let delay = retry.delay_with_hint(attempt, error.retry_after());
            attempt += 1;
            warn!(
                error = %error,
                retry = attempt,
                max_retries = retry.max_retries,
                backoff_ms = delay.as_millis() as u64,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
