//! Error message formatting with actionable suggestions.
//!
//! Registry errors carry a suggestion and an exit code; anything else that
//! reaches the CLI boundary is reported with its cause chain and exit code 1.

use thunderstore_client::ThunderstoreError;

use super::colors::ColorSupport;

/// Exit code for errors that did not come from a registry call
const GENERIC_FAILURE: u8 = 1;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect())
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with its kind, suggestion and cause chain
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut output = String::new();

        output.push_str(&self.colors.red("error"));
        if let Some(registry_error) = error.downcast_ref::<ThunderstoreError>() {
            output.push_str(&self.colors.dim(&format!("[{}]", registry_error.kind())));
        }
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let Some(body) = error
            .downcast_ref::<ThunderstoreError>()
            .and_then(ThunderstoreError::body_excerpt)
            .filter(|body| !body.is_empty())
        {
            output.push_str(&self.colors.dim("response"));
            output.push_str(": ");
            output.push_str(body);
            output.push('\n');
        }

        for cause in error.chain().skip(1) {
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&cause.to_string());
            output.push('\n');
        }

        if let Some(suggestion) = error
            .downcast_ref::<ThunderstoreError>()
            .and_then(ThunderstoreError::suggestion)
        {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Process exit code for an error that ended a command
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<ThunderstoreError>()
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(GENERIC_FAILURE)
}
