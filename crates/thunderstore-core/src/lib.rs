//! # thunderstore-core
//!
//! Domain model and error taxonomy shared by the Thunderstore client crates.
//!
//! This crate provides:
//! - Validated, immutable records for packages, versions, communities and metrics,
//!   in both the v1 and the experimental payload shapes
//! - `ValidationError` describing which payload field broke which constraint
//! - `ThunderstoreError`, the closed set of failures a registry call can produce
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Domain records built from raw JSON payloads
//! - `error`: Error taxonomy and result alias

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, ThunderstoreError, ThunderstoreResult};
pub use types::{
    Community, Constraint, CyberstormCommunity, Package, PackageCategory, PackageExperimental,
    PackageListingExperimental, PackageMetrics, PackageVersion, PackageVersionExperimental,
    PackageVersionMetrics, Page, ValidationError,
};
