//! Package and package version records.
//!
//! Mirrors the package shape served by the v1 package endpoints.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::fields::{Constraint, Fields, ValidationError};

/// A published package with one or more versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    owner: String,
    name: String,
    full_name: String,
    rating_score: u64,
    is_pinned: bool,
    is_deprecated: bool,
    has_nsfw_content: bool,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    package_url: Option<Url>,
    donation_link: Option<Url>,
    uuid4: Option<String>,
    categories: Vec<String>,
    versions: Vec<PackageVersion>,
    /// Index into `versions` of the highest version number
    #[serde(skip)]
    latest: usize,
}

/// A single uploaded version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersion {
    name: Option<String>,
    full_name: Option<String>,
    description: String,
    version_number: Version,
    download_url: Url,
    file_size: u64,
    downloads: u64,
    dependencies: BTreeSet<String>,
    #[serde(rename = "date_created")]
    uploaded_at: DateTime<Utc>,
    icon: Option<Url>,
    website_url: Option<Url>,
    is_active: bool,
    uuid4: Option<String>,
}

impl Package {
    /// Composite identity used by the registry, e.g. `ebkr-r2modman`
    pub fn derive_full_name(owner: &str, name: &str) -> String {
        format!("{}-{}", owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn rating_score(&self) -> u64 {
        self.rating_score
    }

    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated
    }

    pub fn has_nsfw_content(&self) -> bool {
        self.has_nsfw_content
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_updated(&self) -> DateTime<Utc> {
        self.date_updated
    }

    pub fn package_url(&self) -> Option<&Url> {
        self.package_url.as_ref()
    }

    pub fn donation_link(&self) -> Option<&Url> {
        self.donation_link.as_ref()
    }

    pub fn uuid4(&self) -> Option<&str> {
        self.uuid4.as_deref()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Versions in the order the registry returned them (never empty)
    pub fn versions(&self) -> &[PackageVersion] {
        &self.versions
    }

    /// Highest version by semantic version precedence, whatever the listed order
    pub fn latest(&self) -> &PackageVersion {
        &self.versions[self.latest]
    }

    /// Find a version by its exact version number
    pub fn version(&self, version_number: &str) -> Option<&PackageVersion> {
        let wanted = Version::parse(version_number.trim()).ok()?;
        self.versions.iter().find(|v| v.version_number == wanted)
    }

    /// Check if the package is tagged with a category
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
    }
}

impl TryFrom<&Value> for Package {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        let owner = fields.non_empty_str("owner")?.to_string();
        let name = fields.non_empty_str("name")?.to_string();
        let derived = Self::derive_full_name(&owner, &name);
        if let Some(given) = fields.optional_str("full_name")? {
            if given != derived {
                return Err(ValidationError::new(
                    "full_name",
                    Constraint::Inconsistent {
                        detail: format!(
                            "'{}' does not match owner and name ('{}')",
                            given, derived
                        ),
                    },
                ));
            }
        }

        let versions = fields
            .required_array("versions")?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                PackageVersion::try_from(item).map_err(|e| e.nested(&format!("versions[{}]", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let Some(latest) = highest_version(&versions) else {
            return Err(ValidationError::new("versions", Constraint::Empty));
        };

        Ok(Self {
            full_name: derived,
            rating_score: fields.required_u64("rating_score")?,
            is_pinned: fields.required_bool("is_pinned")?,
            is_deprecated: fields.required_bool("is_deprecated")?,
            has_nsfw_content: fields.optional_bool("has_nsfw_content")?.unwrap_or(false),
            date_created: fields.required_timestamp("date_created")?,
            date_updated: fields.required_timestamp("date_updated")?,
            package_url: fields.optional_url("package_url")?,
            donation_link: fields.optional_url("donation_link")?,
            uuid4: fields.optional_str("uuid4")?.map(String::from),
            categories: fields.string_list("categories", false)?,
            owner,
            name,
            versions,
            latest,
        })
    }
}

/// Position of the highest version; `None` only for an empty list
fn highest_version(versions: &[PackageVersion]) -> Option<usize> {
    versions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.version_number.cmp(&b.version_number))
        .map(|(index, _)| index)
}

impl PackageVersion {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Versioned identity, e.g. `ebkr-r2modman-3.1.47`
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version_number(&self) -> &Version {
        &self.version_number
    }

    pub fn download_url(&self) -> &Url {
        &self.download_url
    }

    /// Archive size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn downloads(&self) -> u64 {
        self.downloads
    }

    /// Dependency identities in `Owner-Name-Version` form
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn icon(&self) -> Option<&Url> {
        self.icon.as_ref()
    }

    pub fn website_url(&self) -> Option<&Url> {
        self.website_url.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn uuid4(&self) -> Option<&str> {
        self.uuid4.as_deref()
    }
}

impl TryFrom<&Value> for PackageVersion {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            name: fields.optional_str("name")?.map(String::from),
            full_name: fields.optional_str("full_name")?.map(String::from),
            description: fields.optional_str("description")?.unwrap_or_default().to_string(),
            version_number: fields.required_version("version_number")?,
            download_url: fields.required_url("download_url")?,
            file_size: fields.required_u64("file_size")?,
            downloads: fields.optional_u64("downloads")?.unwrap_or(0),
            dependencies: fields.string_list("dependencies", true)?.into_iter().collect(),
            uploaded_at: fields.required_timestamp("date_created")?,
            icon: fields.optional_url("icon")?,
            website_url: fields.optional_url("website_url")?,
            is_active: fields.optional_bool("is_active")?.unwrap_or(true),
            uuid4: fields.optional_str("uuid4")?.map(String::from),
        })
    }
}
