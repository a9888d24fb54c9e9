//! Registration queue
//!
//! # State machine
//!
//! ```text
//! Idle --refresh--> Fetching --ok/err--> Idle
//! Idle --complete(id)--> Completing(id) --ok--> Fetching --done--> Idle
//!                                       --err--> Idle
//! ```
//!
//! Under [`FlightPolicy::PerEntry`] several entries may be in `Completing`
//! at once; a second `complete` for the same entry is rejected.

pub mod coordinator;
pub mod error;
pub mod state;

pub use coordinator::{CompletionOutcome, QueueCoordinator};
pub use error::QueueError;
pub use state::{FlightPolicy, FlightStage, Phase, QueueState};
