//! # Break Application
//!
//! Turns planned breaks into spacer geometry in the working tree. Two
//! insertion strategies, matching how the surrounding layout reacts to
//! extra vertical space:
//!
//! - a table row gets a blank synthetic row inserted before it (a top
//!   margin would not move a row inside a table), and
//! - anything else gets its own top margin increased, with the previous
//!   sibling's bottom margin folded in so margin collapsing cannot swallow
//!   part of the spacer.
//!
//! Each break also leaves a full-width divider node painted in the page
//! background, marking the gap visually in the re-rendered output.

use crate::layout::plan::BreakPlan;
use crate::model::{
    Color, ContentTree, Display, Geometry, NodeId, NodeKind, NodeStyle, Synthetic,
};

/// Apply `plans` (in document order) to the tree, inserting spacers and
/// divider markers. The tree is expected to be the engine's working clone.
pub fn apply_breaks(tree: &mut ContentTree, root: NodeId, plans: &[BreakPlan], background: Color) {
    let root_width = tree.get(root).geometry.width;
    for plan in plans {
        let leaf = tree.get(plan.leaf);
        if leaf.style.display == Display::TableRow {
            insert_blank_row(tree, plan);
        } else {
            let extra = plan.spacer_height + previous_bottom_margin(tree, root, plan.leaf);
            let style = &mut tree.get_mut(plan.leaf).style;
            style.margin_top = Some(style.margin_top.unwrap_or(0.0) + extra);
        }
        insert_divider(tree, root, plan, root_width, background);
    }
}

fn insert_blank_row(tree: &mut ContentTree, plan: &BreakPlan) {
    let leaf = tree.get(plan.leaf);
    let tag = match &leaf.kind {
        NodeKind::Element { tag } => tag.clone(),
        _ => "tr".to_string(),
    };
    let height = leaf.style.margin_top.unwrap_or(0.0) + plan.spacer_height;
    let row_width = leaf.geometry.width;

    let blank = tree.new_synthetic(
        NodeKind::Element { tag },
        NodeStyle {
            display: Display::TableRow,
            ..NodeStyle::default()
        },
        Geometry {
            top: 0.0,
            left: 0.0,
            width: row_width,
            height,
            right: None,
            bottom: None,
        },
        Synthetic::BlankRow,
    );
    tree.insert_before(blank, plan.leaf);
}

/// Bottom margin of the nearest previous sibling, found by walking up the
/// ancestor chain until a node with a previous sibling appears. Zero at the
/// root and zero when the margin was never measured.
fn previous_bottom_margin(tree: &ContentTree, root: NodeId, leaf: NodeId) -> f64 {
    let mut current = leaf;
    while current != root {
        if let Some(previous) = tree.previous_sibling(current) {
            return tree.get(previous).style.margin_bottom.unwrap_or(0.0);
        }
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    0.0
}

fn insert_divider(
    tree: &mut ContentTree,
    root: NodeId,
    plan: &BreakPlan,
    root_width: f64,
    background: Color,
) {
    let divider = tree.new_synthetic(
        NodeKind::element("div"),
        NodeStyle {
            display: Display::Block,
            background: Some(background),
            ..NodeStyle::default()
        },
        Geometry {
            top: plan.top,
            left: 0.0,
            width: root_width,
            height: plan.spacer_height,
            right: None,
            bottom: None,
        },
        Synthetic::Divider,
    );
    tree.append_child(root, divider);
}
