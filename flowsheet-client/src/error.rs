//! Error types for the flowsheet client

use thiserror::Error;

/// Errors that can occur while talking to the flowsheet service
#[derive(Debug, Error)]
pub enum FlowsheetError {
    /// Connection, TLS or timeout failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The service answered with something other than its 302 redirect
    #[error("Unexpected HTTP status {0} (expected 302)")]
    UnexpectedStatus(u16),

    /// The start-show redirect carried no Location header
    #[error("Missing Location header in start-show response")]
    MissingLocation,

    /// The Location header did not contain a usable show id
    #[error("No radioShowID in Location: {0}")]
    MissingShowId(String),
}

impl From<ureq::Error> for FlowsheetError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, _) => FlowsheetError::UnexpectedStatus(code),
            ureq::Error::Transport(transport) => FlowsheetError::Network(transport.to_string()),
        }
    }
}

/// Convenience type alias for flowsheet operations
pub type Result<T> = std::result::Result<T, FlowsheetError>;
