//! # Output Configuration
//!
//! Colour and marker policy for the `deploy-origin` command-line front-end.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```
//! use deploy_origin::output::{marker, Marker, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("never");
//! assert_eq!(marker(&config, Marker::Changed), "[CHANGED]");
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and markers.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emoji markers should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never", or "auto".
    /// In auto mode, colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Status markers printed in front of command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Changed,
    Unchanged,
    Info,
    DryRun,
}

/// The emoji for `m` when colors are enabled, otherwise a plain tag.
pub fn marker(config: &OutputConfig, m: Marker) -> &'static str {
    let (emoji, plain) = match m {
        Marker::Changed => ("✅", "[CHANGED]"),
        Marker::Unchanged => ("➖", "[UNCHANGED]"),
        Marker::Info => ("📦", "[INFO]"),
        Marker::DryRun => ("📝", "[DRY-RUN]"),
    };
    if config.use_color {
        emoji
    } else {
        plain
    }
}

/// Bold `text` when colors are enabled.
pub fn heading(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).bold().to_string()
    } else {
        text.to_string()
    }
}
