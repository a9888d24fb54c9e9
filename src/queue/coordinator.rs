//! Registration queue coordinator
//!
//! Owns the queue snapshot and drives the complete-registration workflow.
//! State lives in a `watch` channel: checks and updates are synchronous
//! closures, so the in-flight check and the marker insert can never be
//! separated by an await point.

use tokio::sync::watch;

use crate::gateway::RemoteGateway;
use crate::metrics;
use crate::models::{CompletionReceipt, QueueEntry};

use super::error::QueueError;
use super::state::{FlightPolicy, FlightStage, Phase, QueueState};

/// Result of a `complete` call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The backend acknowledged; `refreshed` tells whether the follow-up
    /// fetch succeeded
    Completed {
        receipt: CompletionReceipt,
        refreshed: bool,
    },

    /// Another completion for this entry (or, under `FlightPolicy::Single`,
    /// for any entry) is still outstanding. Nothing was sent.
    Rejected,
}

/// Queue state owner
pub struct QueueCoordinator<G> {
    gateway: G,
    policy: FlightPolicy,
    state: watch::Sender<QueueState>,
}

impl<G: RemoteGateway> QueueCoordinator<G> {
    /// Create a coordinator with an empty snapshot
    pub fn new(gateway: G, policy: FlightPolicy) -> Self {
        let (state, _) = watch::channel(QueueState::default());
        Self {
            gateway,
            policy,
            state,
        }
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<QueueState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn state(&self) -> QueueState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.state.borrow().snapshot.clone()
    }

    pub fn last_error(&self) -> Option<QueueError> {
        self.state.borrow().last_error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase()
    }

    pub fn is_busy(&self, user_id: u64) -> bool {
        self.state.borrow().is_busy(user_id)
    }

    /// Dismiss the error banner
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// Replace the snapshot with the backend's current queue.
    ///
    /// On failure the previous snapshot stays and the error is recorded.
    /// Overlapping refreshes are not sequenced: whichever response lands
    /// last wins.
    pub async fn refresh(&self) -> Result<usize, QueueError> {
        self.state.send_modify(|s| s.refreshes_pending += 1);
        let _pending = RefreshGuard { state: &self.state };

        match self.gateway.fetch_queue().await {
            Ok(entries) => {
                let count = entries.len();
                self.state.send_modify(|s| {
                    s.snapshot = entries;
                    s.last_error = None;
                });
                metrics::set_queue_length(count);
                tracing::debug!(entries = count, "Queue refreshed");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Queue refresh failed");
                let err = QueueError::FetchFailed(e);
                self.state
                    .send_modify(|s| s.last_error = Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Complete the registration of `user_id`, then refresh the queue.
    ///
    /// A second call for an entry that is still in flight returns
    /// [`CompletionOutcome::Rejected`] without contacting the backend. The
    /// in-flight marker is released when this future finishes or is dropped.
    pub async fn complete(&self, user_id: u64) -> Result<CompletionOutcome, QueueError> {
        let policy = self.policy;
        let acquired = self.state.send_if_modified(|s| {
            let blocked = match policy {
                FlightPolicy::PerEntry => s.in_flight.contains_key(&user_id),
                FlightPolicy::Single => !s.in_flight.is_empty(),
            };
            if blocked {
                return false;
            }
            s.in_flight.insert(user_id, FlightStage::Submitting);
            true
        });

        if !acquired {
            tracing::debug!(user_id, "Completion already in flight, rejected");
            metrics::record_completion("rejected");
            return Ok(CompletionOutcome::Rejected);
        }
        let _marker = InFlightGuard {
            state: &self.state,
            user_id,
        };

        tracing::info!(user_id, "Completing registration");

        match self.gateway.submit_completion(user_id).await {
            Ok(receipt) => {
                tracing::info!(
                    user_id,
                    placement_parent = ?receipt.placement_parent,
                    level = ?receipt.level,
                    "Registration completed"
                );
                metrics::record_completion("success");

                self.state.send_modify(|s| {
                    if let Some(stage) = s.in_flight.get_mut(&user_id) {
                        *stage = FlightStage::Refreshing;
                    }
                });
                let refreshed = self.refresh().await.is_ok();

                Ok(CompletionOutcome::Completed { receipt, refreshed })
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Registration completion failed");
                metrics::record_completion("failure");

                let err = QueueError::CompletionFailed { user_id, source: e };
                self.state
                    .send_modify(|s| s.last_error = Some(err.clone()));
                Err(err)
            }
        }
    }
}

// Releases the in-flight marker on every exit path, including cancellation
struct InFlightGuard<'a> {
    state: &'a watch::Sender<QueueState>,
    user_id: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let user_id = self.user_id;
        self.state
            .send_modify(|s| {
                s.in_flight.remove(&user_id);
            });
    }
}

struct RefreshGuard<'a> {
    state: &'a watch::Sender<QueueState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.refreshes_pending = s.refreshes_pending.saturating_sub(1));
    }
}
