//! Integration tests module
//!
//! End-to-end tests against a mock backend:
//! - Structure fetch and level grouping
//! - Queue refresh and the complete-registration workflow
//! - Error handling and recovery scenarios

pub mod error_scenarios;
pub mod fixtures;
pub mod queue_workflow;
pub mod structure_test;
