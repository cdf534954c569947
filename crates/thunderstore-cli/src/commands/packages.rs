//! Package listing, lookup and search commands.

use super::{CommandContext, Outcome};
use crate::output::render;

pub fn list(ordering: Option<&str>, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    let packages = ctx.client.list_packages(None, ordering)?;
    ctx.emit(&packages, |packages| render::package_list(packages, ctx.output.colors()))?;
    Ok(Outcome::Done)
}

pub fn show(owner: &str, name: &str, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    match ctx.client.get_package(owner, name)? {
        Some(package) => {
            ctx.emit(&package, |package| render::package_details(package, ctx.output.colors()))?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::Missing(format!("package {}-{} not found", owner, name))),
    }
}

pub fn search(query: &str, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    let packages = ctx.client.search_packages(query, None)?;
    if packages.is_empty() && !ctx.json {
        ctx.output.info(&format!("No packages match '{}'", query));
        return Ok(Outcome::Done);
    }
    ctx.emit(&packages, |packages| render::package_list(packages, ctx.output.colors()))?;
    Ok(Outcome::Done)
}
