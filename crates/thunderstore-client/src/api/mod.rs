//! Thunderstore API endpoints.
//!
//! Each function maps one logical operation onto an [`ApiRequest`]. Nothing
//! past this module knows operation names: the transport only sees the
//! method, the (unencoded) path segments and the query pairs.

use std::fmt;

use reqwest::Method;
use thunderstore_core::{Constraint, ThunderstoreResult, ValidationError};

const V1: [&str; 2] = ["api", "v1"];
const EXPERIMENTAL: [&str; 2] = ["api", "experimental"];
const CYBERSTORM: [&str; 2] = ["api", "cyberstorm"];

/// Transport-level description of a registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments below the API root; percent-encoded by the transport
    pub segments: Vec<String>,
    /// Query pairs, absent parameters already omitted
    pub query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    fn get<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            method: Method::GET,
            segments: segments.into_iter().map(String::from).collect(),
            query: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.query.push((key, value.to_string()));
        }
        self
    }

    /// Value of a query parameter, if present
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}/", self.method, self.segments.join("/"))
    }
}

/// `GET /api/v1/package/`
pub fn list_packages(community: Option<&str>, ordering: Option<&str>) -> ApiRequest {
    ApiRequest::get(V1.into_iter().chain(["package"]))
        .param("community", community)
        .param("ordering", ordering)
}

/// `GET /api/v1/package/{owner}/{name}/`
pub fn get_package(owner: &str, name: &str) -> ThunderstoreResult<ApiRequest> {
    let owner = segment("owner", owner)?;
    let name = segment("name", name)?;
    Ok(ApiRequest::get(V1.into_iter().chain(["package", owner, name])))
}

/// `GET /api/v1/package/search/?q=...`
pub fn search_packages(query: &str, community: Option<&str>) -> ThunderstoreResult<ApiRequest> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::new("q", Constraint::Empty).into());
    }
    Ok(ApiRequest::get(V1.into_iter().chain(["package", "search"]))
        .param("q", Some(query))
        .param("community", community))
}

/// `GET /api/experimental/community/`
pub fn list_communities() -> ApiRequest {
    ApiRequest::get(EXPERIMENTAL.into_iter().chain(["community"]))
}

/// `GET /api/experimental/community/{identifier}/`
pub fn get_community(identifier: &str) -> ThunderstoreResult<ApiRequest> {
    let identifier = segment("identifier", identifier)?;
    Ok(ApiRequest::get(
        EXPERIMENTAL.into_iter().chain(["community", identifier]),
    ))
}

/// `GET /api/experimental/community/{community}/category/`
pub fn list_community_categories(
    community: &str,
    cursor: Option<&str>,
) -> ThunderstoreResult<ApiRequest> {
    let community = segment("community", community)?;
    Ok(ApiRequest::get(
        EXPERIMENTAL
            .into_iter()
            .chain(["community", community, "category"]),
    )
    .param("cursor", cursor))
}

/// `GET /api/v1/package-metrics/{owner}/{name}/`
pub fn get_package_metrics(owner: &str, name: &str) -> ThunderstoreResult<ApiRequest> {
    let owner = segment("owner", owner)?;
    let name = segment("name", name)?;
    Ok(ApiRequest::get(
        V1.into_iter().chain(["package-metrics", owner, name]),
    ))
}

/// `GET /api/v1/package-metrics/{owner}/{name}/{version}/`
pub fn get_package_version_metrics(
    owner: &str,
    name: &str,
    version: &str,
) -> ThunderstoreResult<ApiRequest> {
    let owner = segment("owner", owner)?;
    let name = segment("name", name)?;
    let version = segment("version", version)?;
    Ok(ApiRequest::get(
        V1.into_iter()
            .chain(["package-metrics", owner, name, version]),
    ))
}

/// `GET /api/experimental/package/`, one cursor page at a time
pub fn list_packages_experimental(cursor: Option<&str>) -> ApiRequest {
    ApiRequest::get(EXPERIMENTAL.into_iter().chain(["package"])).param("cursor", cursor)
}

/// `GET /api/experimental/package/{namespace}/{name}/`
pub fn get_package_experimental(namespace: &str, name: &str) -> ThunderstoreResult<ApiRequest> {
    let namespace = segment("namespace", namespace)?;
    let name = segment("name", name)?;
    Ok(ApiRequest::get(
        EXPERIMENTAL.into_iter().chain(["package", namespace, name]),
    ))
}

/// `GET /api/experimental/package/{namespace}/{name}/{version}/`
pub fn get_package_version_experimental(
    namespace: &str,
    name: &str,
    version: &str,
) -> ThunderstoreResult<ApiRequest> {
    let namespace = segment("namespace", namespace)?;
    let name = segment("name", name)?;
    let version = segment("version", version)?;
    Ok(ApiRequest::get(
        EXPERIMENTAL
            .into_iter()
            .chain(["package", namespace, name, version]),
    ))
}

/// `GET /api/cyberstorm/community/{identifier}/`
pub fn get_cyberstorm_community(identifier: &str) -> ThunderstoreResult<ApiRequest> {
    let identifier = segment("identifier", identifier)?;
    Ok(ApiRequest::get(
        CYBERSTORM.into_iter().chain(["community", identifier]),
    ))
}

/// Validate a caller-supplied path segment
fn segment<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, Constraint::Empty));
    }
    // The URL parser drops dot segments instead of encoding them
    if value == "." || value == ".." {
        return Err(ValidationError::new(
            field,
            Constraint::Invalid {
                detail: format!("'{}' is not a usable path segment", value),
            },
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thunderstore_core::ErrorKind;

    #[test]
    fn test_list_packages_omits_absent_params() {
        let request = list_packages(None, None);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.segments, ["api", "v1", "package"]);
        assert!(request.query.is_empty());

        let request = list_packages(Some("riskofrain2"), Some("-rating_score"));
        assert_eq!(request.query_value("community"), Some("riskofrain2"));
        assert_eq!(request.query_value("ordering"), Some("-rating_score"));

        let request = list_packages(Some(""), None);
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_get_package_path() {
        let request = get_package("ebkr", "r2modman").unwrap();
        assert_eq!(request.segments, ["api", "v1", "package", "ebkr", "r2modman"]);
        assert_eq!(request.to_string(), "GET /api/v1/package/ebkr/r2modman/");
    }

    #[test]
    fn test_get_package_rejects_empty_segments() {
        let err = get_package("", "r2modman").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.as_validation().unwrap().field, "owner");

        let err = get_package("ebkr", "   ").unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "name");

        let err = get_package("ebkr", "..").unwrap_err();
        assert!(matches!(
            err.as_validation().unwrap().constraint,
            Constraint::Invalid { .. }
        ));
    }

    #[test]
    fn test_search_packages() {
        let request = search_packages(" bepinex ", None).unwrap();
        assert_eq!(request.segments, ["api", "v1", "package", "search"]);
        assert_eq!(request.query_value("q"), Some("bepinex"));
        assert_eq!(request.query_value("community"), None);

        let request = search_packages("bepinex", Some("valheim")).unwrap();
        assert_eq!(request.query_value("community"), Some("valheim"));
    }

    #[test]
    fn test_search_packages_rejects_empty_query() {
        for query in ["", "   "] {
            let err = search_packages(query, None).unwrap_err();
            let validation = err.as_validation().unwrap();
            assert_eq!(validation.field, "q");
            assert_eq!(validation.constraint, Constraint::Empty);
        }
    }

    #[test]
    fn test_community_endpoints() {
        assert_eq!(
            list_communities().segments,
            ["api", "experimental", "community"]
        );
        assert_eq!(
            get_community("lethal-company").unwrap().segments,
            ["api", "experimental", "community", "lethal-company"]
        );
        assert!(get_community("").is_err());

        let request = list_community_categories("valheim", Some("abc")).unwrap();
        assert_eq!(
            request.segments,
            ["api", "experimental", "community", "valheim", "category"]
        );
        assert_eq!(request.query_value("cursor"), Some("abc"));
    }

    #[test]
    fn test_metrics_endpoints() {
        assert_eq!(
            get_package_metrics("ebkr", "r2modman").unwrap().segments,
            ["api", "v1", "package-metrics", "ebkr", "r2modman"]
        );
        assert_eq!(
            get_package_version_metrics("ebkr", "r2modman", "3.1.47")
                .unwrap()
                .segments,
            ["api", "v1", "package-metrics", "ebkr", "r2modman", "3.1.47"]
        );
        assert!(get_package_version_metrics("ebkr", "r2modman", "").is_err());
    }

    #[test]
    fn test_experimental_package_endpoints() {
        let request = list_packages_experimental(None);
        assert_eq!(request.segments, ["api", "experimental", "package"]);
        assert!(request.query.is_empty());

        let request = list_packages_experimental(Some("cD0y"));
        assert_eq!(request.query_value("cursor"), Some("cD0y"));

        assert_eq!(
            get_package_experimental("ebkr", "r2modman").unwrap().to_string(),
            "GET /api/experimental/package/ebkr/r2modman/"
        );
        assert_eq!(
            get_package_version_experimental("ebkr", "r2modman", "3.1.47")
                .unwrap()
                .segments,
            ["api", "experimental", "package", "ebkr", "r2modman", "3.1.47"]
        );

        let err = get_package_experimental(" ", "r2modman").unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "namespace");
        assert!(get_package_version_experimental("ebkr", "r2modman", "..").is_err());
    }

    #[test]
    fn test_cyberstorm_community_endpoint() {
        assert_eq!(
            get_cyberstorm_community("riskofrain2").unwrap().segments,
            ["api", "cyberstorm", "community", "riskofrain2"]
        );
        assert!(get_cyberstorm_community("").is_err());
    }
}
