//! Error types for the remote data gateway

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// The two failure kinds callers distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayErrorKind {
    /// Network unreachable, timeout or non-2xx status
    Transport,
    /// Payload does not match the expected shape
    Decode,
}

/// Gateway errors
///
/// Payloads are kept as strings so the error can be cloned into observable
/// coordinator state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// HTTP client could not be built
    #[error("Initialization error: {0}")]
    Init(String),

    /// Connection, timeout or body read failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("HTTP error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Session token missing or rejected (HTTP 401)
    #[error("Unauthorized: session is missing or expired")]
    Unauthorized,

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classify into transport or decode failure
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            Self::Decode(_) => GatewayErrorKind::Decode,
            Self::Init(_) | Self::Transport(_) | Self::Status { .. } | Self::Unauthorized => {
                GatewayErrorKind::Transport
            }
        }
    }

    /// Whether repeating the same idempotent request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Init(_) | Self::Unauthorized | Self::Decode(_) => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Init(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
