//! Remote data gateway
//!
//! Transport to the backend, with no business logic. The materializer and
//! the queue coordinator only see the [`RemoteGateway`] trait, which keeps
//! them testable against in-memory fakes.

pub mod client;
pub mod error;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{CompletionReceipt, Node, QueueEntry};

pub use client::{ClientConfig, HttpGateway};
pub use error::{GatewayError, GatewayErrorKind, GatewayResult};

/// Contract the backend must satisfy
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch the flat list of structure nodes
    async fn fetch_structure(&self) -> GatewayResult<Vec<Node>>;

    /// Fetch the current registration queue
    async fn fetch_queue(&self) -> GatewayResult<Vec<QueueEntry>>;

    /// Ask the backend to complete the registration of `user_id`.
    ///
    /// Not guaranteed to be idempotent; callers must not retry blindly.
    async fn submit_completion(&self, user_id: u64) -> GatewayResult<CompletionReceipt>;
}

#[async_trait]
impl<G: RemoteGateway + ?Sized> RemoteGateway for Arc<G> {
    async fn fetch_structure(&self) -> GatewayResult<Vec<Node>> {
        (**self).fetch_structure().await
    }

    async fn fetch_queue(&self) -> GatewayResult<Vec<QueueEntry>> {
        (**self).fetch_queue().await
    }

    async fn submit_completion(&self, user_id: u64) -> GatewayResult<CompletionReceipt> {
        (**self).submit_completion(user_id).await
    }
}
