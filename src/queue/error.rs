//! Error types for the registration queue

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::i18n::t;

/// Failures recorded by the queue coordinator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Queue snapshot could not be fetched; the previous snapshot is kept
    #[error("Queue fetch failed: {0}")]
    FetchFailed(#[source] GatewayError),

    /// The backend refused or never acknowledged a completion
    #[error("Completing registration of user {user_id} failed: {source}")]
    CompletionFailed {
        user_id: u64,
        #[source]
        source: GatewayError,
    },
}

impl QueueError {
    /// Underlying gateway error
    pub fn gateway_error(&self) -> &GatewayError {
        match self {
            Self::FetchFailed(source) | Self::CompletionFailed { source, .. } => source,
        }
    }

    /// Text for the non-blocking error banner
    pub fn banner(&self) -> String {
        match self {
            Self::FetchFailed(_) => t!("queue.fetch_failed").to_string(),
            Self::CompletionFailed { .. } => t!("queue.completion_failed").to_string(),
        }
    }
}
