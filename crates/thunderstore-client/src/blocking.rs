//! Synchronous client facade.
//!
//! Wraps the async [`crate::ThunderstoreClient`] with a private Tokio runtime
//! so callers without an executor can use the registry. Do not call these
//! methods from inside an async context; use the async client there.

use std::panic::{self, AssertUnwindSafe};

use tokio::runtime::{Builder, Runtime};
use url::Url;

use thunderstore_core::{
    Community, CyberstormCommunity, Package, PackageCategory, PackageExperimental,
    PackageMetrics, PackageVersionExperimental, PackageVersionMetrics, Page, ThunderstoreError,
    ThunderstoreResult,
};

use crate::config::ClientConfig;

/// Blocking client for the Thunderstore API
#[derive(Debug)]
pub struct ThunderstoreClient {
    inner: crate::ThunderstoreClient,
    runtime: Runtime,
}

impl ThunderstoreClient {
    pub fn new() -> ThunderstoreResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client configured from `THUNDERSTORE_*` environment variables
    pub fn from_env() -> ThunderstoreResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> ThunderstoreResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ThunderstoreError::connection(format!("failed to start runtime: {}", e), e)
            })?;
        // reqwest needs a reactor when the pool is built
        let inner = {
            let _guard = runtime.enter();
            crate::ThunderstoreClient::with_config(config)?
        };

        Ok(Self { inner, runtime })
    }

    /// Run `f` with this client and release it afterwards, even if `f` panics
    ///
    /// The panic is resumed once the transport has been closed. This needs
    /// `panic = "unwind"`; under `panic = "abort"` the process ends inside `f`
    /// and the pool is reclaimed by the OS instead.
    pub fn scope<R>(self, f: impl FnOnce(&Self) -> R) -> R {
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&self)));
        self.close();
        match result {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    pub fn default_community(&self) -> Option<&str> {
        self.inner.default_community()
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn list_packages(
        &self,
        community: Option<&str>,
        ordering: Option<&str>,
    ) -> ThunderstoreResult<Vec<Package>> {
        self.runtime
            .block_on(self.inner.list_packages(community, ordering))
    }

    pub fn get_package(&self, owner: &str, name: &str) -> ThunderstoreResult<Option<Package>> {
        self.runtime.block_on(self.inner.get_package(owner, name))
    }

    pub fn search_packages(
        &self,
        query: &str,
        community: Option<&str>,
    ) -> ThunderstoreResult<Vec<Package>> {
        self.runtime
            .block_on(self.inner.search_packages(query, community))
    }

    pub fn list_communities(&self) -> ThunderstoreResult<Vec<Community>> {
        self.runtime.block_on(self.inner.list_communities())
    }

    pub fn get_community(&self, identifier: &str) -> ThunderstoreResult<Option<Community>> {
        self.runtime.block_on(self.inner.get_community(identifier))
    }

    pub fn list_community_categories(
        &self,
        community: &str,
        cursor: Option<&str>,
    ) -> ThunderstoreResult<Page<PackageCategory>> {
        self.runtime
            .block_on(self.inner.list_community_categories(community, cursor))
    }

    pub fn get_package_metrics(
        &self,
        owner: &str,
        name: &str,
    ) -> ThunderstoreResult<Option<PackageMetrics>> {
        self.runtime
            .block_on(self.inner.get_package_metrics(owner, name))
    }

    pub fn get_package_version_metrics(
        &self,
        owner: &str,
        name: &str,
        version: &str,
    ) -> ThunderstoreResult<Option<PackageVersionMetrics>> {
        self.runtime
            .block_on(self.inner.get_package_version_metrics(owner, name, version))
    }

    pub fn list_packages_experimental(
        &self,
        cursor: Option<&str>,
    ) -> ThunderstoreResult<Page<PackageExperimental>> {
        self.runtime
            .block_on(self.inner.list_packages_experimental(cursor))
    }

    pub fn get_package_experimental(
        &self,
        namespace: &str,
        name: &str,
    ) -> ThunderstoreResult<Option<PackageExperimental>> {
        self.runtime
            .block_on(self.inner.get_package_experimental(namespace, name))
    }

    pub fn get_package_version_experimental(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> ThunderstoreResult<Option<PackageVersionExperimental>> {
        self.runtime.block_on(
            self.inner
                .get_package_version_experimental(namespace, name, version),
        )
    }

    pub fn get_cyberstorm_community(
        &self,
        identifier: &str,
    ) -> ThunderstoreResult<Option<CyberstormCommunity>> {
        self.runtime
            .block_on(self.inner.get_cyberstorm_community(identifier))
    }

    #[cfg(test)]
    fn release_counter(&self) -> std::sync::Arc<std::sync::atomic::AtomicUsize> {
        self.inner.release_counter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use thunderstore_core::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// The mock server lives on its own runtime so the blocking client can own another
    fn start_server() -> (tokio::runtime::Runtime, MockServer) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/experimental/community/valheim/"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "identifier": "valheim", "name": "Valheim" })),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/experimental/community/"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;
            server
        });
        (runtime, server)
    }

    fn client_for(server: &MockServer) -> ThunderstoreClient {
        ThunderstoreClient::with_config(ClientConfig::default().with_url(server.uri())).unwrap()
    }

    #[test]
    fn test_blocking_lookup() {
        let (_runtime, server) = start_server();
        let client = client_for(&server);

        let community = client.get_community("valheim").unwrap().unwrap();
        assert_eq!(community.name(), "Valheim");

        let err = client.list_communities().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_blocking_cyberstorm_lookup_missing() {
        let (_runtime, server) = start_server();
        let client = client_for(&server);

        assert!(client.get_cyberstorm_community("valheim").unwrap().is_none());
        assert_eq!(
            client.get_package_experimental("", "r2modman").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_empty_search_fails_locally() {
        let client = ThunderstoreClient::new().unwrap();
        let err = client.search_packages("   ", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_scope_releases_on_success_and_error() {
        let (_runtime, server) = start_server();

        let client = client_for(&server);
        let releases = client.release_counter();
        let name = client.scope(|c| c.get_community("valheim").unwrap().unwrap().name().to_string());
        assert_eq!(name, "Valheim");
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        let client = client_for(&server);
        let releases = client.release_counter();
        let result = client.scope(|c| c.list_communities());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Server);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scope_releases_once_on_panic() {
        let client = ThunderstoreClient::new().unwrap();
        let releases = client.release_counter();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            client.scope(|c| {
                c.close();
                panic!("caller failed");
            })
        }));

        assert!(result.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scope_releases_when_panicking_before_close() {
        let client = ThunderstoreClient::new().unwrap();
        let releases = client.release_counter();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            client.scope::<()>(|_| panic!("caller failed"))
        }));

        assert!(result.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_workspace_profiles_unwind() {
        let manifest = include_str!("../../../Cargo.toml");
        let aborts = manifest
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .any(|line| line.starts_with("panic") && line.contains("abort"));
        assert!(!aborts, "scope needs unwinding to release on panic");
    }

    #[test]
    fn test_close_then_call_fails() {
        let (_runtime, server) = start_server();
        let client = client_for(&server);

        client.close();
        client.close();
        assert_eq!(client.release_counter().load(Ordering::SeqCst), 1);

        let err = client.get_community("valheim").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }
}
