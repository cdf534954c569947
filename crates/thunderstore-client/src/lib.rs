//! HTTP client for the Thunderstore mod registry
//!
//! This crate turns registry operations into HTTP requests, sends them over a
//! pooled transport, and decodes the responses into the validated types of
//! `thunderstore-core`.
//!
//! ```no_run
//! # async fn demo() -> thunderstore_client::ThunderstoreResult<()> {
//! use thunderstore_client::ThunderstoreClient;
//!
//! let client = ThunderstoreClient::new()?;
//! if let Some(package) = client.get_package("ebkr", "r2modman").await? {
//!     println!("{} {}", package.full_name(), package.latest().version_number());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod interpret;
pub mod transport;

mod client;

#[cfg(feature = "blocking")]
pub mod blocking;

// Re-export main types
pub use api::ApiRequest;
pub use client::ThunderstoreClient;
pub use config::{ClientConfig, RetryConfig};
pub use transport::{RawResponse, Transport};

pub use thunderstore_core::{
    Community, CyberstormCommunity, ErrorKind, Package, PackageCategory, PackageExperimental,
    PackageListingExperimental, PackageMetrics, PackageVersion, PackageVersionExperimental,
    PackageVersionMetrics, Page, ThunderstoreError, ThunderstoreResult, ValidationError,
};
