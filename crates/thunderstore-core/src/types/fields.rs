//! Strict field access over raw JSON payloads.
//!
//! [`Fields`] wraps a JSON object and exposes one reader per field shape.
//! `null` is treated the same as an absent field.

use chrono::{DateTime, Utc};
use semver::Version;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// A payload field that could not be turned into a domain value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field '{field}': {constraint}")]
pub struct ValidationError {
    /// Path of the offending field, e.g. `versions[0].download_url`
    pub field: String,
    /// The constraint that was violated
    pub constraint: Constraint,
}

/// Constraint violated by a payload field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    #[error("missing required field")]
    Missing,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("value out of range: {detail}")]
    OutOfRange { detail: String },

    #[error("must not be empty")]
    Empty,

    #[error("malformed URL: {detail}")]
    MalformedUrl { detail: String },

    #[error("malformed timestamp: {detail}")]
    MalformedTimestamp { detail: String },

    #[error("malformed version: {detail}")]
    MalformedVersion { detail: String },

    #[error("not URL-safe: {detail}")]
    NotUrlSafe { detail: String },

    #[error("invalid value: {detail}")]
    Invalid { detail: String },

    #[error("inconsistent value: {detail}")]
    Inconsistent { detail: String },

    #[error("malformed JSON: {detail}")]
    MalformedJson { detail: String },
}

impl ValidationError {
    /// Create a validation error for a field
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }

    /// Shorthand for a missing required field
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, Constraint::Missing)
    }

    /// Prefix the field path with the enclosing field, e.g. `versions[2]`
    pub fn nested(mut self, parent: &str) -> Self {
        self.field = if self.field.is_empty() {
            parent.to_string()
        } else if self.field.starts_with('[') {
            format!("{}{}", parent, self.field)
        } else {
            format!("{}.{}", parent, self.field)
        };
        self
    }

    /// Prefix the field path with a sequence index
    pub fn at_index(self, index: usize) -> Self {
        self.nested(&format!("[{}]", index))
    }
}

/// Read-only view over the fields of a JSON object
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wrap a payload, which must be a JSON object
    pub fn of(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(ValidationError::new(
                "",
                Constraint::WrongType { expected: "object" },
            )),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    fn require(&self, field: &str) -> Result<&'a Value, ValidationError> {
        self.get(field).ok_or_else(|| ValidationError::missing(field))
    }

    pub fn optional_str(&self, field: &str) -> Result<Option<&'a str>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(wrong_type(field, "string")),
        }
    }

    pub fn required_str(&self, field: &str) -> Result<&'a str, ValidationError> {
        self.optional_str(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    /// A required string that must contain something other than whitespace
    pub fn non_empty_str(&self, field: &str) -> Result<&'a str, ValidationError> {
        let value = self.required_str(field)?;
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, Constraint::Empty));
        }
        Ok(value)
    }

    pub fn optional_u64(&self, field: &str) -> Result<Option<u64>, ValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let Value::Number(number) = value else {
            return Err(wrong_type(field, "non-negative integer"));
        };
        if let Some(n) = number.as_u64() {
            return Ok(Some(n));
        }
        match number.as_i64() {
            Some(n) => Err(ValidationError::new(
                field,
                Constraint::OutOfRange {
                    detail: format!("{} is negative", n),
                },
            )),
            None => Err(wrong_type(field, "non-negative integer")),
        }
    }

    pub fn required_u64(&self, field: &str) -> Result<u64, ValidationError> {
        self.optional_u64(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(wrong_type(field, "boolean")),
        }
    }

    pub fn required_bool(&self, field: &str) -> Result<bool, ValidationError> {
        self.optional_bool(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    /// Optional URL; an empty string counts as absent
    pub fn optional_url(&self, field: &str) -> Result<Option<Url>, ValidationError> {
        match self.optional_str(field)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => Url::parse(raw).map(Some).map_err(|e| {
                ValidationError::new(
                    field,
                    Constraint::MalformedUrl {
                        detail: format!("'{}': {}", raw, e),
                    },
                )
            }),
        }
    }

    pub fn required_url(&self, field: &str) -> Result<Url, ValidationError> {
        self.optional_url(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    pub fn optional_timestamp(
        &self,
        field: &str,
    ) -> Result<Option<DateTime<Utc>>, ValidationError> {
        match self.optional_str(field)? {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|ts| Some(ts.with_timezone(&Utc)))
                .map_err(|e| {
                    ValidationError::new(
                        field,
                        Constraint::MalformedTimestamp {
                            detail: format!("'{}': {}", raw, e),
                        },
                    )
                }),
        }
    }

    pub fn required_timestamp(&self, field: &str) -> Result<DateTime<Utc>, ValidationError> {
        self.optional_timestamp(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    pub fn required_version(&self, field: &str) -> Result<Version, ValidationError> {
        let raw = self.required_str(field)?;
        Version::parse(raw.trim()).map_err(|e| {
            ValidationError::new(
                field,
                Constraint::MalformedVersion {
                    detail: format!("'{}': {}", raw, e),
                },
            )
        })
    }

    pub fn required_array(&self, field: &str) -> Result<&'a [Value], ValidationError> {
        match self.require(field)? {
            Value::Array(items) => Ok(items.as_slice()),
            _ => Err(wrong_type(field, "array")),
        }
    }

    /// Array of strings; absent means empty when `required` is false
    pub fn string_list(&self, field: &str, required: bool) -> Result<Vec<String>, ValidationError> {
        let items = match self.get(field) {
            None if required => return Err(ValidationError::missing(field)),
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(wrong_type(field, "array of strings")),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ValidationError::new(
                    format!("{}[{}]", field, i),
                    Constraint::WrongType { expected: "string" },
                )),
            })
            .collect()
    }

    /// Count sent either as a JSON number or as a numeric string
    pub fn optional_count(&self, field: &str) -> Result<Option<u64>, ValidationError> {
        match self.get(field) {
            Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
            Some(Value::String(raw)) => raw.trim().parse().map(Some).map_err(|_| {
                ValidationError::new(
                    field,
                    Constraint::OutOfRange {
                        detail: format!("'{}' is not a non-negative integer", raw),
                    },
                )
            }),
            _ => self.optional_u64(field),
        }
    }

    pub fn required_object(&self, field: &str) -> Result<&'a Value, ValidationError> {
        match self.require(field)? {
            value @ Value::Object(_) => Ok(value),
            _ => Err(wrong_type(field, "object")),
        }
    }

    /// Optional array; absent means empty
    pub fn optional_array(&self, field: &str) -> Result<&'a [Value], ValidationError> {
        match self.get(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(wrong_type(field, "array")),
        }
    }

    /// Array of strings, or one comma-separated string; absent means empty
    pub fn loose_list(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        match self.get(field) {
            Some(Value::String(joined)) => Ok(joined
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()),
            _ => self.string_list(field, false),
        }
    }
}

fn wrong_type(field: &str, expected: &'static str) -> ValidationError {
    ValidationError::new(field, Constraint::WrongType { expected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object_payload() {
        let payload = json!([1, 2, 3]);
        let err = Fields::of(&payload).unwrap_err();
        assert_eq!(err.constraint, Constraint::WrongType { expected: "object" });
    }

    #[test]
    fn test_null_counts_as_missing() {
        let payload = json!({ "name": null });
        let fields = Fields::of(&payload).unwrap();

        assert_eq!(fields.optional_str("name").unwrap(), None);
        assert_eq!(
            fields.required_str("name").unwrap_err(),
            ValidationError::missing("name")
        );
    }

    #[test]
    fn test_negative_integer_is_out_of_range() {
        let payload = json!({ "file_size": -4, "downloads": 1.5 });
        let fields = Fields::of(&payload).unwrap();

        let err = fields.required_u64("file_size").unwrap_err();
        assert!(matches!(err.constraint, Constraint::OutOfRange { .. }));

        let err = fields.required_u64("downloads").unwrap_err();
        assert!(matches!(err.constraint, Constraint::WrongType { .. }));
    }

    #[test]
    fn test_empty_url_is_absent() {
        let payload = json!({ "website_url": "", "icon": "not a url" });
        let fields = Fields::of(&payload).unwrap();

        assert_eq!(fields.optional_url("website_url").unwrap(), None);
        let err = fields.optional_url("icon").unwrap_err();
        assert!(matches!(err.constraint, Constraint::MalformedUrl { .. }));
    }

    #[test]
    fn test_timestamp_and_version_parsing() {
        let payload = json!({
            "date_created": "2024-01-01T12:00:00Z",
            "date_updated": "yesterday",
            "version_number": "1.2.3",
            "bad_version": "1.2",
        });
        let fields = Fields::of(&payload).unwrap();

        let ts = fields.required_timestamp("date_created").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T12:00:00+00:00");
        assert!(matches!(
            fields.required_timestamp("date_updated").unwrap_err().constraint,
            Constraint::MalformedTimestamp { .. }
        ));

        assert_eq!(
            fields.required_version("version_number").unwrap(),
            Version::new(1, 2, 3)
        );
        assert!(matches!(
            fields.required_version("bad_version").unwrap_err().constraint,
            Constraint::MalformedVersion { .. }
        ));
    }

    #[test]
    fn test_string_list_reports_element_index() {
        let payload = json!({ "categories": ["mods", 7] });
        let fields = Fields::of(&payload).unwrap();

        let err = fields.string_list("categories", false).unwrap_err();
        assert_eq!(err.field, "categories[1]");
        assert!(fields.string_list("absent", false).unwrap().is_empty());
        assert_eq!(
            fields.string_list("absent", true).unwrap_err(),
            ValidationError::missing("absent")
        );
    }

    #[test]
    fn test_nested_field_paths() {
        let err = ValidationError::missing("download_url")
            .nested("versions[0]")
            .at_index(3);
        assert_eq!(err.field, "[3].versions[0].download_url");

        let err = ValidationError::new("", Constraint::WrongType { expected: "object" })
            .nested("versions[1]");
        assert_eq!(err.field, "versions[1]");
    }
}
