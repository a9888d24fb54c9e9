//! Partner structure materializer
//!
//! Turns the backend's flat node list into levels ordered by structural
//! depth, ready to be rendered top to bottom.
//!
//! # Outcomes
//!
//! | Status         | Input          | Levels                     |
//! |----------------|----------------|----------------------------|
//! | `Empty`        | no nodes       | none                       |
//! | `NoRoot`       | nodes, no root | none                       |
//! | `RootRejected` | several roots  | none (`RootPolicy::Reject`)|
//! | `Rooted`       | a root found   | level 0 and onwards        |
//!
//! # Usage
//!
//! ```ignore
//! use equilibrium_admin::structure::{materialize, MaterializeOptions};
//!
//! let tree = materialize(&nodes, &MaterializeOptions::default());
//! for level in tree.levels() {
//!     println!("{}: {}", level.depth, level.nodes.len());
//! }
//! ```

pub mod error;
pub mod materialize;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::gateway::{GatewayResult, RemoteGateway};
use crate::i18n::t;
use crate::metrics;
use crate::models::{Ident, Node};

pub use error::StructuralIntegrityError;
pub use materialize::materialize;

// ============================================================================
// Options
// ============================================================================

/// What to do when several nodes have no parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPolicy {
    /// Use the first parentless node in input order
    #[default]
    FirstWins,

    /// Render nothing
    Reject,
}

impl FromStr for RootPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_wins" | "first" => Ok(Self::FirstWins),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown root policy: {other}")),
        }
    }
}

/// Materializer options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeOptions {
    pub root_policy: RootPolicy,

    /// Deepest level to emit; defaults to the input node count
    pub max_depth: Option<usize>,
}

// ============================================================================
// Output
// ============================================================================

/// Overall result of a materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureStatus {
    Empty,
    NoRoot,
    RootRejected,
    Rooted,
}

/// Nodes at one structural depth, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub depth: usize,
    pub nodes: Vec<Node>,
}

/// Level-grouped structure plus diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureTree {
    status: StructureStatus,
    input_count: usize,
    root_count: usize,
    levels: Vec<Level>,
    #[serde(skip)]
    issues: Vec<StructuralIntegrityError>,
}

impl StructureTree {
    pub(crate) fn new(
        status: StructureStatus,
        input_count: usize,
        root_count: usize,
        levels: Vec<Level>,
        issues: Vec<StructuralIntegrityError>,
    ) -> Self {
        Self {
            status,
            input_count,
            root_count,
            levels,
            issues,
        }
    }

    pub fn status(&self) -> StructureStatus {
        self.status
    }

    /// Levels from the root down. Can be iterated any number of times.
    pub fn levels(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    /// Number of nodes received
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Number of nodes placed in a level
    pub fn reachable_count(&self) -> usize {
        self.levels.iter().map(|l| l.nodes.len()).sum()
    }

    /// Nodes received but not reachable from the root
    pub fn orphan_count(&self) -> usize {
        self.input_count.saturating_sub(self.reachable_count())
    }

    /// Number of parentless nodes in the input
    pub fn root_count(&self) -> usize {
        self.root_count
    }

    pub fn issues(&self) -> &[StructuralIntegrityError] {
        &self.issues
    }

    /// Structural depth of the first node placed for `user`
    pub fn depth_of(&self, user: &Ident) -> Option<usize> {
        self.levels
            .iter()
            .find(|level| level.nodes.iter().any(|n| &n.user == user))
            .map(|level| level.depth)
    }

    /// Localized banner for the degenerate outcomes
    pub fn banner(&self) -> Option<String> {
        match self.status {
            StructureStatus::Empty => Some(t!("structure.empty").to_string()),
            StructureStatus::NoRoot => Some(t!("structure.no_root").to_string()),
            StructureStatus::RootRejected => Some(
                t!("structure.multiple_roots", count = self.root_count).to_string(),
            ),
            StructureStatus::Rooted if self.orphan_count() > 0 => Some(
                t!(
                    "structure.partial",
                    rendered = self.reachable_count(),
                    total = self.input_count
                )
                .to_string(),
            ),
            StructureStatus::Rooted => None,
        }
    }
}

/// Fetch the structure and group it by level
pub async fn load_structure<G: RemoteGateway + ?Sized>(
    gateway: &G,
    options: &MaterializeOptions,
) -> GatewayResult<StructureTree> {
    let nodes = gateway.fetch_structure().await?;
    let tree = materialize(&nodes, options);

    tracing::info!(
        status = ?tree.status(),
        input = tree.input_count(),
        rendered = tree.reachable_count(),
        orphans = tree.orphan_count(),
        roots = tree.root_count(),
        levels = tree.levels().len(),
        "Structure materialized"
    );
    for issue in tree.issues() {
        tracing::warn!(issue = %issue, "Structural integrity issue");
    }
    metrics::record_materialization(tree.status());

    Ok(tree)
}
