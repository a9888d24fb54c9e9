pub mod queue;
pub mod structure;

// Re-export command functions for convenience
pub use queue::{complete, queue};
pub use structure::structure;
