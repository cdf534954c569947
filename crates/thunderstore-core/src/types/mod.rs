//! Domain records returned by the Thunderstore API.
//!
//! Every record is built from a raw `serde_json::Value` through `TryFrom`,
//! which checks required fields and constraints explicitly:
//! - unknown fields are ignored so new server-side fields never break decoding
//! - a missing or malformed required field fails with a [`ValidationError`]
//!   naming the field path and the violated [`Constraint`]

pub mod community;
pub mod experimental;
pub mod fields;
pub mod metrics;
pub mod package;
pub mod page;

// Re-export all public types
pub use community::{Community, CyberstormCommunity, PackageCategory};
pub use experimental::{
    PackageExperimental, PackageListingExperimental, PackageVersionExperimental,
};
pub use fields::{Constraint, ValidationError};
pub use metrics::{PackageMetrics, PackageVersionMetrics};
pub use package::{Package, PackageVersion};
pub use page::Page;
