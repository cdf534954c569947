//! # tstore
//!
//! Command-line browser for the Thunderstore mod registry.
//!
//! This is the entry point of the `tstore` tool. It parses arguments, sets up
//! logging, builds a blocking registry client and dispatches to the command
//! handlers. The process exit code follows the error kind of the failed call.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use thunderstore_client::blocking::ThunderstoreClient;
use thunderstore_client::ClientConfig;

mod commands;
mod output;

use commands::{CommandContext, Outcome};
use output::errors::{exit_code, ErrorFormatter};
use output::OutputHandler;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("TSTORE_BUILD_DATE"),
    ", ",
    env!("TSTORE_RUSTC_VERSION"),
    ")"
);

/// Browse packages and communities on a Thunderstore registry
#[derive(Parser, Debug)]
#[command(name = "tstore", version, long_version = LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Registry root URL
    #[arg(long, global = true, env = "THUNDERSTORE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// API token sent as a bearer credential
    #[arg(long, global = true, env = "THUNDERSTORE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "THUNDERSTORE_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Community used when a command does not name one
    #[arg(long, global = true, env = "THUNDERSTORE_COMMUNITY", value_name = "ID")]
    pub community: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List packages
    Packages {
        /// Sort field, prefix with '-' for descending
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<String>,
    },
    /// Show one package
    Package { owner: String, name: String },
    /// Search packages by text
    Search { query: String },
    /// List communities
    Communities,
    /// Show one community
    Community { identifier: String },
    /// List a community's package categories
    Categories {
        community: String,
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Show download and rating metrics for a package or one of its versions
    Metrics {
        owner: String,
        name: String,
        version: Option<String>,
    },
    /// List packages through the experimental API, one page at a time
    ExperimentalPackages {
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Show a package, or one of its versions, through the experimental API
    ExperimentalPackage {
        namespace: String,
        name: String,
        version: Option<String>,
    },
    /// Show a community's details and totals
    CyberstormCommunity { identifier: String },
}

impl Cli {
    /// Client configuration from global flags; unset flags keep the defaults
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.base_url {
            config = config.with_url(url.as_str());
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(community) = self.community.as_deref().filter(|c| !c.is_empty()) {
            config = config.with_default_community(community);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("starting tstore v{}", env!("CARGO_PKG_VERSION"));

    let output = OutputHandler::new();
    match run_cli(cli, &output) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Missing(message)) => {
            output.warn(&message);
            ExitCode::from(1)
        }
        Err(err) => {
            eprint!("{}", ErrorFormatter::new().format_error(&err));
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run_cli(cli: Cli, output: &OutputHandler) -> anyhow::Result<Outcome> {
    let client = ThunderstoreClient::with_config(cli.client_config())?;

    client.scope(|client| {
        let ctx = CommandContext {
            client,
            output,
            json: cli.json,
        };
        commands::dispatch_command(cli.command, &ctx)
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tstore={level},thunderstore_client={level},thunderstore_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("tstore encountered an unexpected error: {}", panic_info);
        eprintln!("tstore crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_command() {
        let cli = Cli::try_parse_from(["tstore", "package", "ebkr", "r2modman"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Package {
                owner: "ebkr".to_string(),
                name: "r2modman".to_string()
            }
        );
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tstore",
            "packages",
            "--ordering=-rating_score",
            "--community",
            "valheim",
            "--json",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Commands::Packages {
                ordering: Some("-rating_score".to_string())
            }
        );
        let config = cli.client_config();
        assert_eq!(config.default_community.as_deref(), Some("valheim"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(cli.json);
    }

    #[test]
    fn test_metrics_version_is_optional() {
        let cli = Cli::try_parse_from(["tstore", "metrics", "ebkr", "r2modman"]).unwrap();
        assert!(matches!(cli.command, Commands::Metrics { version: None, .. }));

        let cli = Cli::try_parse_from(["tstore", "metrics", "ebkr", "r2modman", "3.1.47"]).unwrap();
        assert!(matches!(cli.command, Commands::Metrics { version: Some(_), .. }));
    }

    #[test]
    fn test_parse_experimental_commands() {
        let cli = Cli::try_parse_from(["tstore", "experimental-packages", "--cursor", "cD0y"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::ExperimentalPackages {
                cursor: Some("cD0y".to_string())
            }
        );

        let cli = Cli::try_parse_from(["tstore", "experimental-package", "ebkr", "r2modman", "3.1.47"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::ExperimentalPackage { version: Some(ref v), .. } if v == "3.1.47"
        ));

        let cli = Cli::try_parse_from(["tstore", "cyberstorm-community", "riskofrain2"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::CyberstormCommunity {
                identifier: "riskofrain2".to_string()
            }
        );
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["tstore", "package", "ebkr"]).is_err());
        assert!(Cli::try_parse_from(["tstore", "search"]).is_err());
        assert!(Cli::try_parse_from(["tstore", "--timeout", "soon", "communities"]).is_err());
    }

    #[test]
    fn test_empty_flags_keep_defaults() {
        let cli = Cli {
            command: Commands::Communities,
            base_url: None,
            token: Some(String::new()),
            timeout: None,
            community: Some(String::new()),
            json: false,
            verbose: false,
        };

        let config = cli.client_config();
        assert_eq!(config.base_url, thunderstore_client::config::DEFAULT_BASE_URL);
        assert!(config.api_token.is_none());
        assert!(config.default_community.is_none());
    }
}
