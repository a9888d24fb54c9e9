//! equilibrium-admin - Admin client for the Equilibrium partner network
//!
//! Reads the partner structure and the registration queue from the
//! Equilibrium backend and drives the manual complete-registration workflow.
//!
//! # Architecture
//!
//! - [`gateway`] - HTTP transport to the backend API
//! - [`structure`] - Level grouping of the flat partner node list
//! - [`queue`] - Queue snapshot state and the completion workflow
//! - [`models`] - Wire data structures
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//! - [`metrics`] - Prometheus counters
//!
//! # Example
//!
//! ```no_run
//! use equilibrium_admin::config::Config;
//! use equilibrium_admin::gateway::HttpGateway;
//! use equilibrium_admin::queue::QueueCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let gateway = HttpGateway::new(config.client_config())?;
//!     let queue = QueueCoordinator::new(gateway, config.queue.flight_policy);
//!     queue.refresh().await?;
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod error;
pub mod gateway;
pub mod i18n;
pub mod metrics;
pub mod models;
pub mod queue;
pub mod structure;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{AdminErrorTrait, Error, ErrorCategory, Result};
    pub use crate::gateway::{GatewayError, HttpGateway, RemoteGateway};
    pub use crate::models::{Ident, Node, QueueEntry};
    pub use crate::queue::{CompletionOutcome, FlightPolicy, QueueCoordinator, QueueState};
    pub use crate::structure::{materialize, MaterializeOptions, RootPolicy, StructureTree};
}

// Direct re-exports for convenience
pub use models::{Ident, Node, QueueEntry};
