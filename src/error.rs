//! Error types for the bot runtime.
//!
//! Handler errors are contained at the dispatcher and never reach the
//! session loop. Session errors drive the connection into `Reconnecting`.

use std::time::Duration;

use slircbot_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors a command handler can surface.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("handler timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_error",
            Self::Timeout(_) => "timeout",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type returned by command handlers.
pub type HandlerResult = Result<Option<String>, HandlerError>;

// ============================================================================
// Session Errors (transport)
// ============================================================================

/// Reasons a connection ends.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("connection closed by peer")]
    Closed,
}
