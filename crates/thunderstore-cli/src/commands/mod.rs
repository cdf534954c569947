//! Command implementations and dispatch logic.
//!
//! Every handler takes a [`CommandContext`] holding the blocking client and
//! the output handler, and reports whether the thing asked for was found.

use serde::Serialize;
use tracing::info;

use thunderstore_client::blocking::ThunderstoreClient;

use crate::output::OutputHandler;
use crate::Commands;

pub mod communities;
pub mod experimental;
pub mod metrics;
pub mod packages;


/// Shared context for all commands
pub struct CommandContext<'a> {
    pub client: &'a ThunderstoreClient,
    pub output: &'a OutputHandler,
    pub json: bool,
}

impl CommandContext<'_> {
    /// Print `value` as JSON or through the human renderer
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            self.output.json(value)
        } else {
            self.output.print(&human(value));
            Ok(())
        }
    }
}

/// Result of a command that completed without an error
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A lookup returned nothing; carries the message shown to the user
    Missing(String),
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext<'_>) -> anyhow::Result<Outcome> {
    match command {
        Commands::Packages { ordering } => {
            info!("Listing packages (ordering: {:?})", ordering);
            packages::list(ordering.as_deref(), ctx)
        }
        Commands::Package { owner, name } => {
            info!("Fetching package {}/{}", owner, name);
            packages::show(&owner, &name, ctx)
        }
        Commands::Search { query } => {
            info!("Searching packages for '{}'", query);
            packages::search(&query, ctx)
        }
        Commands::Communities => {
            info!("Listing communities");
            communities::list(ctx)
        }
        Commands::Community { identifier } => {
            info!("Fetching community {}", identifier);
            communities::show(&identifier, ctx)
        }
        Commands::Categories { community, cursor } => {
            info!("Listing categories of {} (cursor: {:?})", community, cursor);
            communities::categories(&community, cursor.as_deref(), ctx)
        }
        Commands::Metrics {
            owner,
            name,
            version,
        } => {
            info!("Fetching metrics for {}/{}", owner, name);
            metrics::show(&owner, &name, version.as_deref(), ctx)
        }
        Commands::ExperimentalPackages { cursor } => {
            info!("Listing experimental packages (cursor: {:?})", cursor);
            experimental::list(cursor.as_deref(), ctx)
        }
        Commands::ExperimentalPackage {
            namespace,
            name,
            version,
        } => {
            info!("Fetching experimental package {}/{}", namespace, name);
            experimental::show(&namespace, &name, version.as_deref(), ctx)
        }
        Commands::CyberstormCommunity { identifier } => {
            info!("Fetching cyberstorm community {}", identifier);
            communities::cyberstorm(&identifier, ctx)
        }
    }
}
