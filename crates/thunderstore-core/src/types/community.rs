//! Community and category records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::fields::{Constraint, Fields, ValidationError};

/// A game community packages are listed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Community {
    identifier: String,
    name: String,
    discord_url: Option<Url>,
    wiki_url: Option<Url>,
    require_package_listing_approval: bool,
}

/// A category packages can be tagged with inside a community
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageCategory {
    pub name: String,
    pub slug: String,
}

/// Community details as served to the Cyberstorm web frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyberstormCommunity {
    pub identifier: String,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub discord_url: Option<Url>,
    pub wiki_url: Option<Url>,
    pub datetime_created: DateTime<Utc>,
    pub background_image_url: Option<Url>,
    pub hero_image_url: Option<Url>,
    pub cover_image_url: Option<Url>,
    pub icon_url: Option<Url>,
    pub community_icon_url: Option<Url>,
    pub total_download_count: Option<u64>,
    pub total_package_count: Option<u64>,
    pub has_mod_manager_support: bool,
    pub is_listed: bool,
}

impl Community {
    /// Check that an identifier can be used verbatim as a path segment
    pub fn is_valid_identifier(identifier: &str) -> bool {
        !identifier.is_empty()
            && identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    }

    /// Unique key, e.g. `riskofrain2`
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discord_url(&self) -> Option<&Url> {
        self.discord_url.as_ref()
    }

    pub fn wiki_url(&self) -> Option<&Url> {
        self.wiki_url.as_ref()
    }

    pub fn require_package_listing_approval(&self) -> bool {
        self.require_package_listing_approval
    }
}

impl TryFrom<&Value> for Community {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        let identifier = fields.non_empty_str("identifier")?;
        if !Self::is_valid_identifier(identifier) {
            return Err(ValidationError::new(
                "identifier",
                Constraint::NotUrlSafe {
                    detail: format!("'{}'", identifier),
                },
            ));
        }

        Ok(Self {
            identifier: identifier.to_string(),
            name: fields.required_str("name")?.to_string(),
            discord_url: fields.optional_url("discord_url")?,
            wiki_url: fields.optional_url("wiki_url")?,
            require_package_listing_approval: fields
                .optional_bool("require_package_listing_approval")?
                .unwrap_or(false),
        })
    }
}

impl TryFrom<&Value> for CyberstormCommunity {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        let identifier = fields.non_empty_str("identifier")?;
        if !Community::is_valid_identifier(identifier) {
            return Err(ValidationError::new(
                "identifier",
                Constraint::NotUrlSafe {
                    detail: format!("'{}'", identifier),
                },
            ));
        }

        Ok(Self {
            identifier: identifier.to_string(),
            name: fields.required_str("name")?.to_string(),
            short_description: fields.optional_str("short_description")?.map(String::from),
            description: fields.optional_str("description")?.map(String::from),
            discord_url: fields.optional_url("discord_url")?,
            wiki_url: fields.optional_url("wiki_url")?,
            datetime_created: fields.required_timestamp("datetime_created")?,
            background_image_url: fields.optional_url("background_image_url")?,
            hero_image_url: fields.optional_url("hero_image_url")?,
            cover_image_url: fields.optional_url("cover_image_url")?,
            icon_url: fields.optional_url("icon_url")?,
            community_icon_url: fields.optional_url("community_icon_url")?,
            total_download_count: fields.optional_count("total_download_count")?,
            total_package_count: fields.optional_count("total_package_count")?,
            has_mod_manager_support: fields.required_bool("has_mod_manager_support")?,
            is_listed: fields.required_bool("is_listed")?,
        })
    }
}

impl TryFrom<&Value> for PackageCategory {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = Fields::of(value)?;

        Ok(Self {
            name: fields.required_str("name")?.to_string(),
            slug: fields.non_empty_str("slug")?.to_string(),
        })
    }
}
