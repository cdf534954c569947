//! Human-readable rendering of registry records.

use std::fmt::Write;

use thunderstore_core::{
    Community, CyberstormCommunity, Package, PackageCategory, PackageExperimental,
    PackageMetrics, PackageVersionExperimental, PackageVersionMetrics, Page,
};

use super::colors::ColorSupport;

/// Versions listed under a package before the rest are summarized
const MAX_LISTED_VERSIONS: usize = 10;

/// One line per package: name, latest version, rating and flags
pub fn package_list(packages: &[Package], colors: &ColorSupport) -> String {
    let mut out = String::new();
    for package in packages {
        let _ = writeln!(
            out,
            "{} {} {}{}",
            colors.green(package.full_name()),
            package.latest().version_number(),
            colors.dim(&format!("rating {}", package.rating_score())),
            flags(package, colors)
        );
    }
    out
}

pub fn package_details(package: &Package, colors: &ColorSupport) -> String {
    let latest = package.latest();
    let mut out = String::new();

    let _ = writeln!(out, "{}{}", colors.bold(package.full_name()), flags(package, colors));
    if !latest.description().is_empty() {
        let _ = writeln!(out, "{}", latest.description());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<12}{}", "owner", package.owner());
    let _ = writeln!(out, "{:<12}{}", "latest", latest.version_number());
    let _ = writeln!(out, "{:<12}{}", "rating", package.rating_score());
    let _ = writeln!(out, "{:<12}{}", "updated", package.date_updated().format("%Y-%m-%d"));
    if !package.categories().is_empty() {
        let _ = writeln!(out, "{:<12}{}", "categories", package.categories().join(", "));
    }
    if let Some(url) = package.package_url() {
        let _ = writeln!(out, "{:<12}{}", "url", url);
    }
    if let Some(url) = latest.website_url() {
        let _ = writeln!(out, "{:<12}{}", "website", url);
    }
    if !latest.dependencies().is_empty() {
        let _ = writeln!(out, "{:<12}", "depends on");
        for dependency in latest.dependencies() {
            let _ = writeln!(out, "  {}", dependency);
        }
    }

    let _ = writeln!(out, "versions");
    for version in package.versions().iter().take(MAX_LISTED_VERSIONS) {
        let _ = writeln!(
            out,
            "  {:<12}{}",
            version.version_number().to_string(),
            colors.dim(&format!(
                "{} downloads, {}",
                version.downloads(),
                version.uploaded_at().format("%Y-%m-%d")
            ))
        );
    }
    let hidden = package.versions().len().saturating_sub(MAX_LISTED_VERSIONS);
    if hidden > 0 {
        let _ = writeln!(out, "  {}", colors.dim(&format!("... and {} more", hidden)));
    }
    out
}

pub fn community_list(communities: &[Community], colors: &ColorSupport) -> String {
    let mut out = String::new();
    for community in communities {
        let _ = writeln!(
            out,
            "{:<32}{}",
            community.identifier(),
            colors.dim(community.name())
        );
    }
    out
}

pub fn community_details(community: &Community, colors: &ColorSupport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", colors.bold(community.name()));
    let _ = writeln!(out, "{:<12}{}", "identifier", community.identifier());
    if let Some(url) = community.discord_url() {
        let _ = writeln!(out, "{:<12}{}", "discord", url);
    }
    if let Some(url) = community.wiki_url() {
        let _ = writeln!(out, "{:<12}{}", "wiki", url);
    }
    if community.require_package_listing_approval() {
        let _ = writeln!(out, "{}", colors.yellow("new listings require approval"));
    }
    out
}

/// Categories followed by the cursor for the next page, if any
pub fn category_page(page: &Page<PackageCategory>, colors: &ColorSupport) -> String {
    let mut out = String::new();
    for category in &page.results {
        let _ = writeln!(out, "{:<24}{}", category.slug, colors.dim(&category.name));
    }
    if let Some(next) = &page.next {
        let _ = writeln!(out, "{}", colors.dim(&format!("next page: --cursor {}", next)));
    }
    out
}

pub fn package_metrics(metrics: &PackageMetrics, colors: &ColorSupport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12}{}", "downloads", metrics.downloads);
    let _ = writeln!(out, "{:<12}{}", "rating", metrics.rating_score);
    let _ = writeln!(out, "{:<12}{}", "latest", colors.bold(&metrics.latest_version.to_string()));
    out
}

pub fn version_metrics(metrics: &PackageVersionMetrics, version: &str, colors: &ColorSupport) -> String {
    format!("{} {} downloads\n", colors.bold(version), metrics.downloads)
}

/// One line per package and its newest version, then the next-page cursor
pub fn experimental_package_page(page: &Page<PackageExperimental>, colors: &ColorSupport) -> String {
    let mut out = String::new();
    for package in &page.results {
        let identity = package.full_name().unwrap_or(package.name());
        let _ = write!(out, "{} {}", colors.green(identity), package.latest().version_number());
        if let Some(downloads) = package.total_downloads() {
            let _ = write!(out, " {}", colors.dim(&format!("{} downloads", downloads)));
        }
        if package.is_deprecated() {
            out.push_str(&colors.red(" [deprecated]"));
        }
        let _ = writeln!(out);
    }
    if let Some(next) = &page.next {
        let _ = writeln!(out, "{}", colors.dim(&format!("next page: --cursor {}", next)));
    }
    out
}

pub fn experimental_package(package: &PackageExperimental, colors: &ColorSupport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", colors.bold(package.full_name().unwrap_or(package.name())));
    out.push_str(&experimental_version(package.latest(), colors));
    if let Some(score) = package.rating_score() {
        let _ = writeln!(out, "{:<12}{}", "rating", score);
    }
    if let Some(downloads) = package.total_downloads() {
        let _ = writeln!(out, "{:<12}{}", "downloads", downloads);
    }
    for listing in package.community_listings() {
        let community = listing.community.as_deref().unwrap_or("?");
        let _ = writeln!(
            out,
            "{:<12}{} {}",
            "listed in",
            community,
            colors.dim(&format!("({})", listing.review_status))
        );
    }
    out
}

pub fn experimental_version(version: &PackageVersionExperimental, colors: &ColorSupport) -> String {
    let mut out = String::new();
    if !version.description().is_empty() {
        let _ = writeln!(out, "{}", version.description());
    }
    let _ = writeln!(out, "{:<12}{}", "version", colors.bold(&version.version_number().to_string()));
    if let Some(url) = version.download_url() {
        let _ = writeln!(out, "{:<12}{}", "download", url);
    }
    for dependency in version.dependencies() {
        let _ = writeln!(out, "{:<12}{}", "depends on", dependency);
    }
    out
}

pub fn cyberstorm_community(community: &CyberstormCommunity, colors: &ColorSupport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", colors.bold(&community.name));
    if let Some(summary) = &community.short_description {
        let _ = writeln!(out, "{}", summary);
    }
    let _ = writeln!(out, "{:<12}{}", "identifier", community.identifier);
    if let Some(count) = community.total_package_count {
        let _ = writeln!(out, "{:<12}{}", "packages", count);
    }
    if let Some(count) = community.total_download_count {
        let _ = writeln!(out, "{:<12}{}", "downloads", count);
    }
    if let Some(url) = &community.discord_url {
        let _ = writeln!(out, "{:<12}{}", "discord", url);
    }
    if !community.has_mod_manager_support {
        let _ = writeln!(out, "{}", colors.yellow("no mod manager support"));
    }
    out
}

fn flags(package: &Package, colors: &ColorSupport) -> String {
    let mut flags = String::new();
    if package.is_pinned() {
        flags.push_str(&colors.green(" [pinned]"));
    }
    if package.is_deprecated() {
        flags.push_str(&colors.red(" [deprecated]"));
    }
    if package.has_nsfw_content() {
        flags.push_str(&colors.yellow(" [nsfw]"));
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn package(deprecated: bool, versions: usize) -> Package {
        let versions: Vec<_> = (0..versions)
            .map(|i| {
                json!({
                    "version_number": format!("1.0.{}", i),
                    "dependencies": [],
                    "download_url": format!("https://thunderstore.io/package/download/Team/Mod/1.0.{}/", i),
                    "date_created": "2024-01-01T00:00:00Z",
                    "file_size": 10,
                    "downloads": i
                })
            })
            .collect();
        Package::try_from(&json!({
            "owner": "Team",
            "name": "Mod",
            "rating_score": 7,
            "is_pinned": false,
            "is_deprecated": deprecated,
            "date_created": "2024-01-01T00:00:00Z",
            "date_updated": "2024-02-01T00:00:00Z",
            "categories": ["Tools"],
            "versions": versions
        }))
        .unwrap()
    }

    #[test]
    fn test_package_list_line() {
        let text = package_list(&[package(true, 3)], &ColorSupport::disabled());
        assert_eq!(text, "Team-Mod 1.0.2 rating 7 [deprecated]\n");
    }

    #[test]
    fn test_package_details_truncates_versions() {
        let text = package_details(&package(false, 12), &ColorSupport::disabled());
        assert!(text.starts_with("Team-Mod\n"));
        assert!(text.contains("categories  Tools"));
        assert!(text.contains("... and 2 more"));
    }

    #[test]
    fn test_experimental_page_lines() {
        let package = PackageExperimental::try_from(&json!({
            "namespace": "Team",
            "name": "Mod",
            "full_name": "Team-Mod",
            "total_downloads": "42",
            "is_deprecated": true,
            "latest": { "name": "Mod", "version_number": "2.0.0" }
        }))
        .unwrap();
        let page = Page {
            results: vec![package],
            next: Some("cD0z".to_string()),
            previous: None,
        };

        let text = experimental_package_page(&page, &ColorSupport::disabled());
        assert_eq!(
            text,
            "Team-Mod 2.0.0 42 downloads [deprecated]\nnext page: --cursor cD0z\n"
        );
    }

    #[test]
    fn test_category_page_shows_cursor() {
        let page = Page {
            results: vec![PackageCategory {
                name: "Tools".to_string(),
                slug: "tools".to_string(),
            }],
            next: Some("cD0y".to_string()),
            previous: None,
        };
        let text = category_page(&page, &ColorSupport::disabled());
        assert!(text.contains("next page: --cursor cD0y"));
    }
}
