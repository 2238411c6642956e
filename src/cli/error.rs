//! CLI error types and conversions

use crate::client::ClientError;
use crate::date::DateError;
use crate::session::SessionError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Date input error
    #[error("date error: {0}")]
    DateError(#[from] DateError),

    /// Session error
    #[error("{0}")]
    SessionError(#[from] SessionError),

    /// Service error
    #[error("service error: {0}")]
    ClientError(#[from] ClientError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}
