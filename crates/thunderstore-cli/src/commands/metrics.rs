use super::{CommandContext, Outcome};
use crate::output::render;

/// Package-wide metrics, or one version's download count when `version` is given
pub fn show(
    owner: &str,
    name: &str,
    version: Option<&str>,
    ctx: &CommandContext<'_>,
) -> anyhow::Result<Outcome> {
    let found = match version {
        Some(version) => ctx
            .client
            .get_package_version_metrics(owner, name, version)?
            .map(|metrics| {
                ctx.emit(&metrics, |metrics| {
                    render::version_metrics(metrics, version, ctx.output.colors())
                })
            }),
        None => ctx
            .client
            .get_package_metrics(owner, name)?
            .map(|metrics| {
                ctx.emit(&metrics, |metrics| {
                    render::package_metrics(metrics, ctx.output.colors())
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
                Some(version) => format!("{}-{}-{}", owner, name, version),
                None => format!("{}-{}", owner, name),
            };
            Ok(Outcome::Missing(format!("no metrics for {}", target)))
        }
    }
}
