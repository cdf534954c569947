//! Terminal output formatting and utilities.
//!
//! Keeps formatting consistent across commands: results go to stdout, either
//! rendered for humans or as pretty JSON, and notices go to stderr.

pub mod colors;
pub mod errors;
pub mod render;

use anyhow::Context;
use serde::Serialize;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self::with_colors(colors::ColorSupport::detect())
    }

    pub fn with_colors(colors: colors::ColorSupport) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &colors::ColorSupport {
        &self.colors
    }

    /// Print a rendered result
    pub fn print(&self, text: &str) {
        if !text.is_empty() {
            println!("{}", text.trim_end());
        }
    }

    /// Print a result as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
        println!("{}", text);
        Ok(())
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("warning:"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
