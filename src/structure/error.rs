//! Structural integrity findings
//!
//! These are diagnostics, not failures: the materializer records them and
//! degrades to a partial or empty rendering.

use thiserror::Error;

use crate::models::Ident;

/// Problems detected in the parent-link graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralIntegrityError {
    /// Non-empty input without any parentless node
    #[error("Structure has no root node")]
    NoRoot,

    /// More than one parentless node
    #[error("Structure has {count} root nodes")]
    MultipleRoots { count: usize },

    /// Traversal reached the depth bound and stopped
    #[error("Structure exceeds the depth bound of {bound}")]
    DepthBoundExceeded { bound: usize },

    /// A node was reached a second time through a duplicate identifier
    #[error("Node {user} reached more than once")]
    RevisitedNode { user: Ident },
}
