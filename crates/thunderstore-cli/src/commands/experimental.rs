//! Commands backed by the experimental package API.

use super::{CommandContext, Outcome};
use crate::output::render;

pub fn list(cursor: Option<&str>, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    let page = ctx.client.list_packages_experimental(cursor)?;
    ctx.emit(&page, |page| render::experimental_package_page(page, ctx.output.colors()))?;
    Ok(Outcome::Done)
}

/// The package with its newest version, or a single version when `version` is given
pub fn show(
    namespace: &str,
    name: &str,
    version: Option<&str>,
    ctx: &CommandContext<'_>,
) -> anyhow::Result<Outcome> {
    let found = match version {
        Some(version) => ctx
            .client
            .get_package_version_experimental(namespace, name, version)?
            .map(|found| {
                ctx.emit(&found, |found| {
                    render::experimental_version(found, ctx.output.colors())
                })
            }),
        None => ctx
            .client
            .get_package_experimental(namespace, name)?
            .map(|package| {
                ctx.emit(&package, |package| {
                    render::experimental_package(package, ctx.output.colors())
                })
            }),
    };

    match found {
        Some(emitted) => {
            emitted?;
            Ok(Outcome::Done)
        }
        None => {
            let target = match version {
                Some(version) => format!("{}-{}-{}", namespace, name, version),
                None => format!("{}-{}", namespace, name),
            };
            Ok(Outcome::Missing(format!("package {} not found", target)))
        }
    }
}
