//! Community commands.

use super::{CommandContext, Outcome};
use crate::output::render;

pub fn list(ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    let communities = ctx.client.list_communities()?;
    ctx.emit(&communities, |communities| {
        render::community_list(communities, ctx.output.colors())
    })?;
    Ok(Outcome::Done)
}

pub fn show(identifier: &str, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    match ctx.client.get_community(identifier)? {
        Some(community) => {
            ctx.emit(&community, |community| {
                render::community_details(community, ctx.output.colors())
            })?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::Missing(format!("community {} not found", identifier))),
    }
}

pub fn categories(
    community: &str,
    cursor: Option<&str>,
    ctx: &CommandContext<'_>,
) -> anyhow::Result<Outcome> {
    let page = ctx.client.list_community_categories(community, cursor)?;
    ctx.emit(&page, |page| render::category_page(page, ctx.output.colors()))?;
    Ok(Outcome::Done)
}

/// Community details from the Cyberstorm API, including download totals
pub fn cyberstorm(identifier: &str, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    match ctx.client.get_cyberstorm_community(identifier)? {
        Some(community) => {
            ctx.emit(&community, |community| {
                render::cyberstorm_community(community, ctx.output.colors())
            })?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::Missing(format!("community {} not found", identifier))),
    }
}
