//! # Page-Break Planning
//!
//! Walks the leaf sequence in document order and decides, leaf by leaf,
//! whether the leaf crosses a page band boundary. Each decision depends on
//! the cumulative blank/margin height inserted for every earlier leaf, so
//! planning is a strictly sequential fold over the ordered sequence — one
//! coordinator loop, never a scatter-gather.

use log::{debug, trace};

use crate::geometry::offset_to_ancestor;
use crate::model::{ContentTree, NodeId};

/// Immutable per-invocation page grid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    /// Height of one page band, in content pixels.
    pub page_height: f64,
    /// Height of one output page, in document units (points).
    pub output_page_height: f64,
    /// Requested margin, in document units (points).
    pub margin_units: f64,
    /// The margin converted into content pixels.
    pub margin_pixels: f64,
}

impl PageMetrics {
    pub fn new(page_height: f64, output_page_height: f64, margin_units: f64) -> Self {
        PageMetrics {
            page_height,
            output_page_height,
            margin_units,
            margin_pixels: page_height / (output_page_height - margin_units * 2.0) * margin_units,
        }
    }
}

/// One planned break: spacer geometry to insert before `leaf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakPlan {
    pub leaf: NodeId,
    /// Document-pixel top of the inserted gap, accounting for all spacer
    /// height inserted by earlier plans.
    pub top: f64,
    /// Height of the inserted spacer: the unusable remainder of the current
    /// band plus one bottom and one top page margin.
    pub spacer_height: f64,
    /// Cumulative blank height after this break.
    pub total_blank_height: f64,
    /// Cumulative margin height after this break.
    pub total_margin_height: f64,
}

/// Plan breaks for `leaves` (in document order) against the page grid.
///
/// A leaf whose height exactly equals the remaining band height does NOT
/// break: only strictly overflowing leaves are pushed to the next band, so
/// content flush with a page boundary stays where it is.
pub fn plan_breaks(
    tree: &ContentTree,
    root: NodeId,
    leaves: &[NodeId],
    metrics: &PageMetrics,
) -> Vec<BreakPlan> {
    let mut plans = Vec::new();
    let mut total_blank_height = 0.0;
    let mut total_margin_height = 0.0;

    for &leaf in leaves {
        let offset = offset_to_ancestor(tree, leaf, root);
        let position = offset.top + total_blank_height;
        let rest_height_on_page = metrics.page_height - position.rem_euclid(metrics.page_height);
        let height = tree.get(leaf).geometry.height;
        trace!(
            "leaf at top {:.1}: height {:.1}, {:.1} left on band",
            offset.top,
            height,
            rest_height_on_page
        );
        if height > rest_height_on_page {
            let top = offset.top + total_margin_height + total_blank_height;
            let spacer_height = rest_height_on_page + metrics.margin_pixels * 2.0;
            total_blank_height += rest_height_on_page;
            total_margin_height += metrics.margin_pixels * 2.0;
            plans.push(BreakPlan {
                leaf,
                top,
                spacer_height,
                total_blank_height,
                total_margin_height,
            });
        }
    }

    debug!(
        "planned {} break(s) over {} leaves (band height {:.1}px)",
        plans.len(),
        leaves.len(),
        metrics.page_height
    );
    plans
}
