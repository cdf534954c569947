//! Response interpretation: status mapping and payload decoding.
//!
//! This is the only place that knows about status codes. A 404 on a lookup
//! is recovered into `Ok(None)`; everywhere else it is an error.

use serde_json::Value;
use tracing::debug;
use url::Url;

use thunderstore_core::error::body_excerpt;
use thunderstore_core::types::fields::Fields;
use thunderstore_core::{
    Constraint, Page, ThunderstoreError, ThunderstoreResult, ValidationError,
};

use crate::transport::RawResponse;

/// Field name used for errors about the body as a whole
const BODY_FIELD: &str = "<body>";

/// Decode a single-entity lookup; 404 means the entity does not exist
pub fn lookup<T>(response: &RawResponse) -> ThunderstoreResult<Option<T>>
where
    T: for<'a> TryFrom<&'a Value, Error = ValidationError>,
{
    if response.status == 404 {
        debug!("lookup returned 404, treating as absent");
        return Ok(None);
    }
    let value = success_body(response)?;
    Ok(Some(T::try_from(&value)?))
}

/// Decode a listing or search result
pub fn listing<T>(response: &RawResponse) -> ThunderstoreResult<Vec<T>>
where
    T: for<'a> TryFrom<&'a Value, Error = ValidationError>,
{
    Ok(page(response)?.results)
}

/// Decode a listing together with its pagination cursors
pub fn page<T>(response: &RawResponse) -> ThunderstoreResult<Page<T>>
where
    T: for<'a> TryFrom<&'a Value, Error = ValidationError>,
{
    let value = success_body(response)?;
    Ok(decode_page(&value)?)
}

/// Whether a retry policy may repeat the request that produced this response
pub fn is_transient(response: &RawResponse) -> bool {
    response.status == 429 || (500..600).contains(&response.status)
}

/// Map a non-2xx response to its error kind
pub fn status_error(response: &RawResponse) -> ThunderstoreError {
    let status = response.status;
    let body = body_excerpt(&response.body);

    match status {
        401 | 403 => ThunderstoreError::Authentication {
            status,
            message: "invalid, expired or insufficient API token".to_string(),
            body,
        },
        404 => ThunderstoreError::NotFound {
            message: "resource not found".to_string(),
            body,
        },
        429 => ThunderstoreError::RateLimit {
            message: match response.retry_after {
                Some(after) => format!("retry after {}s", after.as_secs()),
                None => "no retry hint given".to_string(),
            },
            retry_after: response.retry_after,
            body,
        },
        500..=599 => ThunderstoreError::Server {
            status,
            message: "registry failed to handle the request".to_string(),
            body,
        },
        _ => ThunderstoreError::Api {
            status,
            message: "unexpected response status".to_string(),
            body,
        },
    }
}

fn success_body(response: &RawResponse) -> ThunderstoreResult<Value> {
    if !(200..300).contains(&response.status) {
        return Err(status_error(response));
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        ValidationError::new(
            BODY_FIELD,
            Constraint::MalformedJson {
                detail: e.to_string(),
            },
        )
        .into()
    })
}

/// Accept either a bare array or a `{"results": [...], "next": ..., "previous": ...}` envelope
fn decode_page<T>(value: &Value) -> Result<Page<T>, ValidationError>
where
    T: for<'a> TryFrom<&'a Value, Error = ValidationError>,
{
    let (items, next, previous) = match value {
        Value::Array(items) => (items.as_slice(), None, None),
        Value::Object(_) => {
            let fields = Fields::of(value)?;
            (
                fields.required_array("results")?,
                fields.optional_str("next")?.map(cursor_of),
                fields.optional_str("previous")?.map(cursor_of),
            )
        }
        _ => {
            return Err(ValidationError::new(
                BODY_FIELD,
                Constraint::WrongType {
                    expected: "array or paginated object",
                },
            ))
        }
    };

    let results = items
        .iter()
        .enumerate()
        .map(|(i, item)| T::try_from(item).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        results,
        next,
        previous,
    })
}

/// Pagination links are full URLs; keep only their `cursor` parameter
fn cursor_of(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "cursor")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use thunderstore_core::{Community, ErrorKind, PackageCategory};

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.as_bytes().to_vec(),
            retry_after: None,
        }
    }

    const COMMUNITY: &str = r#"{"identifier": "valheim", "name": "Valheim"}"#;

    #[test]
    fn test_lookup_success() {
        let community: Option<Community> = lookup(&raw(200, COMMUNITY)).unwrap();
        assert_eq!(community.unwrap().identifier(), "valheim");
    }

    #[test]
    fn test_lookup_404_is_absent() {
        let community: Option<Community> = lookup(&raw(404, r#"{"detail": "Not found."}"#)).unwrap();
        assert!(community.is_none());
    }

    #[test]
    fn test_listing_404_is_error() {
        let err = listing::<Community>(&raw(404, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Authentication),
            (429, ErrorKind::RateLimit),
            (500, ErrorKind::Server),
            (503, ErrorKind::Server),
            (400, ErrorKind::Api),
            (410, ErrorKind::Api),
            (302, ErrorKind::Api),
        ];

        for (status, kind) in cases {
            let err = lookup::<Community>(&raw(status, "oops")).unwrap_err();
            assert_eq!(err.kind(), kind, "status {}", status);
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.body_excerpt(), Some("oops"));
        }
    }

    #[test]
    fn test_rate_limit_ignores_body_and_keeps_hint() {
        let mut response = raw(429, COMMUNITY);
        response.retry_after = Some(Duration::from_secs(30));

        let err = listing::<Community>(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimit);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_body_excerpt_is_bounded() {
        let body = "x".repeat(2000);
        let err = listing::<Community>(&raw(502, &body)).unwrap_err();
        assert_eq!(err.body_excerpt().unwrap().len(), 500);
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let err = lookup::<Community>(&raw(200, "<html>")).unwrap_err();
        let validation = err.as_validation().unwrap();
        assert_eq!(validation.field, "<body>");
        assert!(matches!(validation.constraint, Constraint::MalformedJson { .. }));
    }

    #[test]
    fn test_listing_accepts_array_and_envelope() {
        let body = format!("[{}]", COMMUNITY);
        let communities: Vec<Community> = listing(&raw(200, &body)).unwrap();
        assert_eq!(communities.len(), 1);

        let body = format!(r#"{{"next": null, "previous": null, "results": [{}]}}"#, COMMUNITY);
        let communities: Vec<Community> = listing(&raw(200, &body)).unwrap();
        assert_eq!(communities.len(), 1);

        let err = listing::<Community>(&raw(200, r#"{"count": 0}"#)).unwrap_err();
        assert_eq!(err.as_validation().unwrap(), &ValidationError::missing("results"));

        let err = listing::<Community>(&raw(200, "42")).unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "<body>");
    }

    #[test]
    fn test_listing_element_errors_carry_index() {
        let body = format!(r#"[{}, {{"identifier": "x"}}]"#, COMMUNITY);
        let err = listing::<Community>(&raw(200, &body)).unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "[1].name");
    }

    #[test]
    fn test_page_extracts_cursors() {
        let body = r#"{
            "next": "https://thunderstore.io/api/experimental/community/valheim/category/?cursor=cD0yMg%3D%3D",
            "previous": null,
            "results": [{"name": "Tools", "slug": "tools"}]
        }"#;

        let page: Page<PackageCategory> = page(&raw(200, body)).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.next.as_deref(), Some("cD0yMg=="));
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(&raw(429, "")));
        assert!(is_transient(&raw(503, "")));
        assert!(!is_transient(&raw(404, "")));
        assert!(!is_transient(&raw(200, "")));
    }
}
