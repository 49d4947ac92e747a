use timetable_client::ApiError;
use timetable_core::error::CoreError;

use crate::config::ConfigError;

/// Console-level error type.
///
/// Wraps [`ApiError`] for transport and server failures and [`CoreError`]
/// for domain validation, and adds console-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed shell input, with a hint for the user.
    #[error("{0}")]
    Usage(String),
}

/// Convenience alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
