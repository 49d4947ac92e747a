use std::path::PathBuf;

use timetable_core::grid::RowOrder;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Console configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// API base URL (default: `http://localhost:5000`).
    pub api_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grid row ordering (default: start time).
    pub row_order: RowOrder,
    /// Directory export PDFs are written to (default: `.`).
    pub export_dir: PathBuf,
    /// Skip confirmation prompts (default: `false`).
    pub assume_yes: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".into(),
            request_timeout_secs: 30,
            row_order: RowOrder::StartTime,
            export_dir: PathBuf::from("."),
            assume_yes: false,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `TIMETABLE_API_URL`    | `http://localhost:5000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `TIMETABLE_ROW_ORDER`  | `start_time`            |
    /// | `EXPORT_DIR`           | `.`                     |
    /// | `ASSUME_YES`           | `false`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("TIMETABLE_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            None => defaults.request_timeout_secs,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "REQUEST_TIMEOUT_SECS",
                        reason: format!("expected a positive number of seconds, got '{raw}'"),
                    })
                }
            },
        };

        let row_order = match lookup("TIMETABLE_ROW_ORDER") {
            None => defaults.row_order,
            Some(raw) => raw.parse::<RowOrder>().map_err(|e| ConfigError::Invalid {
                var: "TIMETABLE_ROW_ORDER",
                reason: e.to_string(),
            })?,
        };

        let export_dir = lookup("EXPORT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let assume_yes = match lookup("ASSUME_YES") {
            None => defaults.assume_yes,
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "ASSUME_YES",
                reason: format!("expected true or false, got '{raw}'"),
            })?,
        };

        Ok(Self {
            api_url,
            request_timeout_secs,
            row_order,
            export_dir,
            assume_yes,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
