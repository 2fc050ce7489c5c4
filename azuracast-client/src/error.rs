//! Error types for the now-playing poller

use thiserror::Error;

/// Errors that can occur while polling the now-playing endpoint
#[derive(Debug, Error)]
pub enum NowPlayingError {
    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a status other than 200
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The body was not the expected JSON document
    #[error("JSON parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, NowPlayingError>;
