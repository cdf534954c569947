//! Download and rating metrics.

use semver::Version;
use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, ValidationError};

/// Aggregated metrics for a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetrics {
    pub downloads: u64,
    pub rating_score: u64,
    pub latest_version: Version,
}

/// Download count for a single package version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackageVersionMetrics {
    pub downloads: u64,
}

impl TryFrom<&Value> for PackageMetrics {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            downloads: fields.required_u64("downloads")?,
            rating_score: fields.required_u64("rating_score")?,
            latest_version: fields.required_version("latest_version")?,
        })
    }
}

impl TryFrom<&Value> for PackageVersionMetrics {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            downloads: fields.required_u64("downloads")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Constraint;
    use serde_json::json;

    #[test]
    fn test_package_metrics() {
        let payload = json!({ "downloads": 5300000, "rating_score": 812, "latest_version": "3.1.47" });
        let metrics = PackageMetrics::try_from(&payload).unwrap();

        assert_eq!(metrics.downloads, 5_300_000);
        assert_eq!(metrics.latest_version, Version::new(3, 1, 47));
    }

    #[test]
    fn test_version_metrics_rejects_strings() {
        let err = PackageVersionMetrics::try_from(&json!({ "downloads": "12" })).unwrap_err();
        assert_eq!(err.field, "downloads");
        assert!(matches!(err.constraint, Constraint::WrongType { .. }));
    }
}
