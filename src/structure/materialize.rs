//! Level grouping of a flat node list
//!
//! Children are found through a `parent -> [index]` map built once per call.
//! Traversal goes level by level, which yields the same bucket order as a
//! depth-first walk that appends children before recursing, without using
//! the call stack.

use std::collections::HashMap;

use crate::models::{Ident, Node};

use super::error::StructuralIntegrityError;
use super::{Level, MaterializeOptions, RootPolicy, StructureStatus, StructureTree};

/// Group `nodes` by their structural depth from the root.
///
/// Pure: the same input and options always produce the same tree. Nodes not
/// reachable from the chosen root are left out and counted as orphans.
pub fn materialize(nodes: &[Node], options: &MaterializeOptions) -> StructureTree {
    let input_count = nodes.len();

    if nodes.is_empty() {
        return StructureTree::new(StructureStatus::Empty, input_count, 0, Vec::new(), Vec::new());
    }

    let roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_root())
        .map(|(i, _)| i)
        .collect();
    let root_count = roots.len();
    let mut issues = Vec::new();

    let root = match (roots.first(), root_count, options.root_policy) {
        (None, _, _) => {
            issues.push(StructuralIntegrityError::NoRoot);
            return StructureTree::new(StructureStatus::NoRoot, input_count, 0, Vec::new(), issues);
        }
        (Some(&root), 1, _) => root,
        (Some(&root), count, RootPolicy::FirstWins) => {
            issues.push(StructuralIntegrityError::MultipleRoots { count });
            root
        }
        (Some(_), count, RootPolicy::Reject) => {
            issues.push(StructuralIntegrityError::MultipleRoots { count });
            return StructureTree::new(
                StructureStatus::RootRejected,
                input_count,
                root_count,
                Vec::new(),
                issues,
            );
        }
    };

    let children = index_children(nodes);
    let bound = options.max_depth.unwrap_or(input_count);

    let mut visited = vec![false; input_count];
    visited[root] = true;
    let mut buckets: Vec<Vec<usize>> = vec![vec![root]];

    loop {
        let depth = buckets.len();
        let mut next = Vec::new();

        for &parent in &buckets[depth - 1] {
            let mut kids: Vec<usize> = nodes[parent]
                .keys()
                .filter_map(|key| children.get(key))
                .flatten()
                .copied()
                .collect();
            // input order across both keys
            kids.sort_unstable();
            kids.dedup();

            for kid in kids {
                if visited[kid] {
                    issues.push(StructuralIntegrityError::RevisitedNode {
                        user: nodes[kid].user.clone(),
                    });
                    continue;
                }
                visited[kid] = true;
                next.push(kid);
            }
        }

        if next.is_empty() {
            break;
        }
        if depth > bound {
            issues.push(StructuralIntegrityError::DepthBoundExceeded { bound });
            break;
        }
        buckets.push(next);
    }

    let levels: Vec<Level> = buckets
        .into_iter()
        .enumerate()
        .map(|(depth, bucket)| Level {
            depth,
            nodes: bucket
                .into_iter()
                .map(|i| with_depth(&nodes[i], depth))
                .collect(),
        })
        .collect();

    StructureTree::new(
        StructureStatus::Rooted,
        input_count,
        root_count,
        levels,
        issues,
    )
}

fn index_children(nodes: &[Node]) -> HashMap<&Ident, Vec<usize>> {
    let mut children: HashMap<&Ident, Vec<usize>> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if let Some(parent) = &node.parent {
            children.entry(parent).or_default().push(i);
        }
    }
    children
}

// Server-supplied levels may be stale; the grouping depth wins.
fn with_depth(node: &Node, depth: usize) -> Node {
    let mut node = node.clone();
    let depth = u32::try_from(depth).unwrap_or(u32::MAX);
    if node.level != depth {
        tracing::trace!(user = %node.user, reported = node.level, depth, "Recomputed node level");
    }
    node.level = depth;
    node
}
