//! Package records served by the experimental package endpoints.
//!
//! These carry only the newest version plus per-community listings, and are
//! looser than the v1 shape: most fields may be absent and counts can arrive
//! as numeric strings.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::fields::{Fields, ValidationError};

/// Review state given to a listing that has not been looked at yet
pub const UNREVIEWED: &str = "unreviewed";

/// A package as described by `/api/experimental/package/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageExperimental {
    namespace: Option<String>,
    name: String,
    full_name: Option<String>,
    owner: Option<String>,
    package_url: Option<Url>,
    date_created: Option<DateTime<Utc>>,
    date_updated: Option<DateTime<Utc>>,
    rating_score: Option<u64>,
    is_pinned: bool,
    is_deprecated: bool,
    total_downloads: Option<u64>,
    latest: PackageVersionExperimental,
    community_listings: Vec<PackageListingExperimental>,
}

/// One version of a package in the experimental shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersionExperimental {
    namespace: Option<String>,
    name: String,
    version_number: Version,
    full_name: Option<String>,
    description: String,
    icon: Option<Url>,
    dependencies: Vec<String>,
    download_url: Option<Url>,
    downloads: u64,
    date_created: Option<DateTime<Utc>>,
    website_url: Option<Url>,
    is_active: bool,
}

/// Where and how a package is listed inside one community
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageListingExperimental {
    pub has_nsfw_content: bool,
    pub categories: Vec<String>,
    pub community: Option<String>,
    pub review_status: String,
}

impl PackageExperimental {
    /// Team the package is published under
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn package_url(&self) -> Option<&Url> {
        self.package_url.as_ref()
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        self.date_created
    }

    pub fn date_updated(&self) -> Option<DateTime<Utc>> {
        self.date_updated
    }

    pub fn rating_score(&self) -> Option<u64> {
        self.rating_score
    }

    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated
    }

    pub fn total_downloads(&self) -> Option<u64> {
        self.total_downloads
    }

    pub fn latest(&self) -> &PackageVersionExperimental {
        &self.latest
    }

    pub fn community_listings(&self) -> &[PackageListingExperimental] {
        &self.community_listings
    }

    /// Check if the package is listed in a community
    pub fn is_listed_in(&self, community: &str) -> bool {
        self.community_listings
            .iter()
            .any(|listing| listing.community.as_deref() == Some(community))
    }
}

impl TryFrom<&Value> for PackageExperimental {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        let latest = PackageVersionExperimental::try_from(fields.required_object("latest")?)
            .map_err(|e| e.nested("latest"))?;
        let community_listings = fields
            .optional_array("community_listings")?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                PackageListingExperimental::try_from(item)
                    .map_err(|e| e.nested(&format!("community_listings[{}]", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            namespace: fields.optional_str("namespace")?.map(String::from),
            name: fields.non_empty_str("name")?.to_string(),
            full_name: fields.optional_str("full_name")?.map(String::from),
            owner: fields.optional_str("owner")?.map(String::from),
            package_url: fields.optional_url("package_url")?,
            date_created: fields.optional_timestamp("date_created")?,
            date_updated: fields.optional_timestamp("date_updated")?,
            rating_score: fields.optional_count("rating_score")?,
            is_pinned: fields.optional_bool("is_pinned")?.unwrap_or(false),
            is_deprecated: fields.optional_bool("is_deprecated")?.unwrap_or(false),
            total_downloads: fields.optional_count("total_downloads")?,
            latest,
            community_listings,
        })
    }
}

impl PackageVersionExperimental {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version_number(&self) -> &Version {
        &self.version_number
    }

    /// Versioned identity, e.g. `ebkr-r2modman-3.1.47`
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> Option<&Url> {
        self.icon.as_ref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn download_url(&self) -> Option<&Url> {
        self.download_url.as_ref()
    }

    pub fn downloads(&self) -> u64 {
        self.downloads
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        self.date_created
    }

    pub fn website_url(&self) -> Option<&Url> {
        self.website_url.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TryFrom<&Value> for PackageVersionExperimental {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            namespace: fields.optional_str("namespace")?.map(String::from),
            name: fields.non_empty_str("name")?.to_string(),
            version_number: fields.required_version("version_number")?,
            full_name: fields.optional_str("full_name")?.map(String::from),
            description: fields.optional_str("description")?.unwrap_or_default().to_string(),
            icon: fields.optional_url("icon")?,
            dependencies: fields.loose_list("dependencies")?,
            download_url: fields.optional_url("download_url")?,
            downloads: fields.optional_count("downloads")?.unwrap_or(0),
            date_created: fields.optional_timestamp("date_created")?,
            website_url: fields.optional_url("website_url")?,
            is_active: fields.optional_bool("is_active")?.unwrap_or(true),
        })
    }
}

impl TryFrom<&Value> for PackageListingExperimental {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            has_nsfw_content: fields.optional_bool("has_nsfw_content")?.unwrap_or(false),
            categories: fields.loose_list("categories")?,
            community: fields.optional_str("community")?.map(String::from),
            review_status: fields
                .optional_str("review_status")?
                .filter(|status| !status.is_empty())
                .unwrap_or(UNREVIEWED)
                .to_string(),
        })
    }
}
