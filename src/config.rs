use crate::error::{Error, Result};
use crate::progress::ProgressOptions;
use std::env;

pub const QUIET_ENV: &str = "PROGLINE_QUIET";
pub const NO_DELAY_ENV: &str = "PROGLINE_NO_DELAY";
pub const ELAPSED_ENV: &str = "PROGLINE_ELAPSED";
pub const ELIDE_ENV: &str = "PROGLINE_ELIDE";
pub const TRACE_ENV: &str = "PROGLINE_TRACE";

/// How progress lines should be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    pub quiet: bool,
    pub no_delay: bool,
    pub show_elapsed: bool,
    pub elide: bool,
    /// Diagnostic logs are written to stderr, so progress lines must stay out of the way.
    pub trace: bool,
}

impl DisplayConfig {
    /// Build reporter options for a run of `total` units.
    pub fn progress_options(&self, total: i64, units: &str) -> ProgressOptions {
        ProgressOptions::default()
            .total(total)
            .units(units)
            .delay(!self.no_delay)
            .quiet(self.quiet)
            .show_elapsed(self.show_elapsed)
            .elide(self.elide)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidEnvVar {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// Helper function to read an optional boolean flag from the environment.
fn get_env_bool(key: &str) -> Result<bool> {
    match env::var(key) {
        Ok(value) => parse_bool(key, &value),
        Err(_) => Ok(false),
    }
}

/// Load display configuration from environment variables
pub fn load_display_config() -> Result<DisplayConfig> {
    let trace = get_env_bool(TRACE_ENV)? || env::var_os("RUST_LOG").is_some();
    Ok(DisplayConfig {
        quiet: get_env_bool(QUIET_ENV)?,
        no_delay: get_env_bool(NO_DELAY_ENV)?,
        show_elapsed: get_env_bool(ELAPSED_ENV)?,
        elide: get_env_bool(ELIDE_ENV)?,
        trace,
    })
}
