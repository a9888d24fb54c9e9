//! Crate-wide error type
//!
//! Each module owns its error enum. [`Error`] wraps them for callers that
//! mix modules, and [`AdminErrorTrait`] gives every one of them the same
//! questions to answer when deciding what to show the operator.

use thiserror::Error;

use crate::i18n::t;

pub use crate::gateway::error::{GatewayError, GatewayErrorKind};
pub use crate::queue::error::QueueError;
pub use crate::structure::error::StructuralIntegrityError;

/// Shared view over the crate's error enums
pub trait AdminErrorTrait: std::error::Error {
    /// Whether pressing retry has a chance of working
    fn is_recoverable(&self) -> bool;

    /// Message for the operator in the current locale
    fn localized_desc(&self) -> String;

    fn category(&self) -> ErrorCategory;
}

/// Coarse grouping used for banners and log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unreachable backend, timeout, non-2xx status
    Network,
    /// Response did not have the expected shape
    Decoding,
    /// Parent links do not form a single tree
    Structure,
    /// Session missing or expired
    Auth,
    /// Local setup problem
    Config,
}

impl ErrorCategory {
    pub fn localized_desc(&self) -> String {
        match self {
            Self::Network => t!("errors.category.network"),
            Self::Decoding => t!("errors.category.decoding"),
            Self::Structure => t!("errors.category.structure"),
            Self::Auth => t!("errors.category.auth"),
            Self::Config => t!("errors.category.config"),
        }
        .to_string()
    }
}

impl AdminErrorTrait for GatewayError {
    fn is_recoverable(&self) -> bool {
        self.is_transient()
    }

    fn localized_desc(&self) -> String {
        match self {
            Self::Unauthorized => t!("errors.gateway.unauthorized").to_string(),
            Self::Decode(msg) => format!("{}: {msg}", t!("errors.gateway.decode")),
            other => format!("{}: {other}", t!("errors.gateway.transport")),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Init(_) => ErrorCategory::Config,
            Self::Unauthorized => ErrorCategory::Auth,
            Self::Decode(_) => ErrorCategory::Decoding,
            Self::Transport(_) | Self::Status { .. } => ErrorCategory::Network,
        }
    }
}

impl AdminErrorTrait for QueueError {
    fn is_recoverable(&self) -> bool {
        self.gateway_error().is_recoverable()
    }

    fn localized_desc(&self) -> String {
        format!("{}: {}", self.banner(), self.gateway_error().localized_desc())
    }

    fn category(&self) -> ErrorCategory {
        self.gateway_error().category()
    }
}

impl AdminErrorTrait for StructuralIntegrityError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn localized_desc(&self) -> String {
        match self {
            Self::NoRoot => t!("structure.no_root").to_string(),
            Self::MultipleRoots { count } => t!("structure.multiple_roots", count = count).to_string(),
            other => format!("{}: {other}", t!("errors.category.structure")),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Structure
    }
}

/// Any failure a command can end with
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdminErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_recoverable(),
            Self::Queue(e) => e.is_recoverable(),
            Self::Json(_) => false,
        }
    }

    fn localized_desc(&self) -> String {
        match self {
            Self::Gateway(e) => e.localized_desc(),
            Self::Queue(e) => e.localized_desc(),
            Self::Json(e) => format!("{}: {e}", t!("errors.json.error")),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Gateway(e) => e.category(),
            Self::Queue(e) => e.category(),
            Self::Json(_) => ErrorCategory::Decoding,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
