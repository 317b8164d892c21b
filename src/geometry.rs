//! # Geometry Resolver
//!
//! Computes a node's offset relative to an arbitrary ancestor. Every node's
//! geometry is stored relative to its immediate positioning ancestor, so the
//! resolver accumulates deltas along the parent chain. The chain is collected
//! into an explicit array and walked by index — bounded by tree depth, no
//! recursion.
//!
//! Hosts usually report only top/left/width/height. When any link in the
//! chain is missing a `right`/`bottom` component, those offsets are derived
//! from the ancestor's total size instead (the same correction the browser
//! world needs, where `offsetRight`/`offsetBottom` do not exist).

use crate::model::{ContentTree, NodeId};

/// A resolved offset box, in content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Resolve `node`'s offset relative to `ancestor`.
///
/// Always succeeds: the parent chain is finite and rooted, and the walk
/// stops at `ancestor` (or at the tree root if `node` is not a descendant,
/// in which case the accumulated offsets are returned as-is).
pub fn offset_to_ancestor(tree: &ContentTree, node: NodeId, ancestor: NodeId) -> Offsets {
    let mut chain = Vec::new();
    let mut current = node;
    while current != ancestor {
        chain.push(current);
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let mut top = 0.0;
    let mut left = 0.0;
    let mut right = Some(0.0_f64);
    let mut bottom = Some(0.0_f64);
    for &link in &chain {
        let geometry = tree.get(link).geometry;
        top += geometry.top;
        left += geometry.left;
        right = match (right, geometry.right) {
            (Some(acc), Some(r)) => Some(acc + r),
            _ => None,
        };
        bottom = match (bottom, geometry.bottom) {
            (Some(acc), Some(b)) => Some(acc + b),
            _ => None,
        };
    }

    let container = tree.get(ancestor).geometry;
    let size = tree.get(node).geometry;
    Offsets {
        top,
        left,
        right: right.unwrap_or(container.width - left - size.width),
        bottom: bottom.unwrap_or(container.height - top - size.height),
    }
}
