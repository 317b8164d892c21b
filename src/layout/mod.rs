//! # Page-Split Layout Engine
//!
//! This is the heart of pagecut and the reason it exists.
//!
//! ## The Problem
//!
//! Exporting an on-screen panel by rasterizing it and slicing the image at
//! fixed intervals cuts paragraphs, table rows and images in half wherever
//! a page boundary happens to land. The content itself has to move: any
//! element that would straddle a boundary must be pushed, whole, onto the
//! next page band *before* the rasterizer runs.
//!
//! ## How the Split Pass Works
//!
//! 1. [`leaves`] reduces the tree to its ordered atomic units, and
//!    [`combine_leaves`] merges adjacent inline runs so wrapped text is
//!    treated as one block.
//! 2. [`plan_breaks`] folds over the leaves in document order, tracking
//!    page-relative position, and records a [`BreakPlan`] for every leaf
//!    that would cross a band boundary.
//! 3. [`apply_breaks`] inserts the spacer geometry — margins for normal
//!    flow, blank synthetic rows inside tables — plus a painted divider
//!    per gap.
//!
//! The pass mutates the tree it is given; callers hand it the per-invocation
//! working clone, never the live tree.

pub mod apply;
pub mod leaves;
pub mod plan;

pub use apply::apply_breaks;
pub use leaves::{combine_leaves, is_block_level, leaves};
pub use plan::{plan_breaks, BreakPlan, PageMetrics};

use crate::model::{Color, ContentTree, NodeId};

/// Run the full split pass against a page grid: combine inline runs, plan
/// breaks, and apply them. Returns the applied plans.
pub fn split(
    tree: &mut ContentTree,
    root: NodeId,
    metrics: &PageMetrics,
    background: Color,
) -> Vec<BreakPlan> {
    combine_leaves(tree, root);
    let leaf_list = leaves(tree, root);
    let plans = plan_breaks(tree, root, &leaf_list, metrics);
    apply_breaks(tree, root, &plans, background);
    plans
}
