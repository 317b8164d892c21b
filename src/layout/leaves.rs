//! # Leaf Extraction
//!
//! Reduces a content tree to the ordered sequence of atomic pagination
//! units. A leaf is never split across a page boundary; everything the
//! break planner does operates on this sequence.
//!
//! The rules, applied depth-first, left-to-right:
//!
//! 1. Comments contribute nothing.
//! 2. Blank text (empty or whitespace-only) contributes nothing.
//! 3. A childless node is itself a leaf.
//! 4. A node with no block-level children, a row-direction flex container,
//!    or a table row is itself a leaf — its whole subtree moves as one unit.
//! 5. Otherwise the node is transparent: recurse into its children.
//!
//! Rule 4 never applies to the extraction root itself: the root is the
//! print target, and collapsing it into a single leaf would make the whole
//! document atomic and unpaginatable. The root always recurses.
//!
//! After extraction, [`combine_leaves`] merges each run of adjacent inline
//! leaves into one synthetic paragraph so that, e.g., a wrapped sequence of
//! text spans is paginated as a single block instead of span by span.

use log::trace;

use crate::model::{
    ContentTree, Display, FlexDirection, Float, Geometry, NodeId, NodeKind, NodeStyle, Synthetic,
};

/// Whether a node is block-level for pagination purposes.
///
/// Elements with computed display `block`, `table` or `flex` are
/// block-level; so is any non-blank text or inline element that floats
/// (a float takes the node out of the inline flow). Table rows count as
/// block-level here too — otherwise a table whose children are all rows
/// would have "no block-level children" and collapse into a single
/// unsplittable leaf instead of recursing to row granularity.
pub fn is_block_level(tree: &ContentTree, id: NodeId) -> bool {
    let node = tree.get(id);
    match &node.kind {
        NodeKind::Comment => false,
        NodeKind::Text { content } => {
            !content.trim().is_empty() && node.style.float != Float::None
        }
        NodeKind::Element { .. } => {
            matches!(
                node.style.display,
                Display::Block | Display::Table | Display::Flex | Display::TableRow
            ) || (node.style.display == Display::Inline && node.style.float != Float::None)
        }
    }
}

/// Extract the ordered leaf sequence rooted at `node`.
///
/// `node` itself is always treated as transparent; only a childless root is
/// its own (sole) leaf.
pub fn leaves(tree: &ContentTree, node: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    let children = tree.children(node);
    if children.is_empty() {
        result.push(node);
    } else {
        for &child in children {
            collect(tree, child, &mut result);
        }
    }
    result
}

fn collect(tree: &ContentTree, id: NodeId, out: &mut Vec<NodeId>) {
    let node = tree.get(id);
    match &node.kind {
        NodeKind::Comment => return,
        NodeKind::Text { content } if content.trim().is_empty() => return,
        _ => {}
    }
    if node.synthetic == Some(Synthetic::Divider) {
        return;
    }

    let children = tree.children(id);
    if children.is_empty() {
        out.push(id);
        return;
    }

    let row_flex =
        node.style.display == Display::Flex && node.style.flex_direction == FlexDirection::Row;
    let has_block_child = children.iter().any(|&child| is_block_level(tree, child));
    if row_flex || !has_block_child || node.style.display == Display::TableRow {
        out.push(id);
    } else {
        for &child in children {
            collect(tree, child, out);
        }
    }
}

/// Merge runs of adjacent non-block leaves into synthetic paragraphs.
///
/// A run is a maximal sequence of consecutive leaves that are not
/// block-level *and* are actually adjacent siblings in the tree (each one's
/// previous sibling is the run's previous member). Every run — including a
/// run of one — is wrapped in a synthetic `<p>` inserted in place of its
/// first member, and the members move inside it.
///
/// A live DOM would recompute layout for the wrapper; a snapshot cannot, so
/// the paragraph's geometry is synthesized as the bounding box of the run
/// and the members' offsets are rebased against it.
pub fn combine_leaves(tree: &mut ContentTree, root: NodeId) {
    let leaf_list = leaves(tree, root);
    let mut runs: Vec<Vec<NodeId>> = Vec::new();
    for leaf in leaf_list {
        if is_block_level(tree, leaf) {
            continue;
        }
        match runs.last_mut() {
            Some(run) if tree.previous_sibling(leaf) == run.last().copied() => run.push(leaf),
            _ => runs.push(vec![leaf]),
        }
    }

    trace!("combining {} inline run(s)", runs.len());
    for run in runs {
        wrap_run(tree, &run);
    }
}

fn wrap_run(tree: &mut ContentTree, run: &[NodeId]) {
    let mut top = f64::INFINITY;
    let mut left = f64::INFINITY;
    let mut bottom = f64::NEG_INFINITY;
    let mut right = f64::NEG_INFINITY;
    for &member in run {
        let geometry = tree.get(member).geometry;
        top = top.min(geometry.top);
        left = left.min(geometry.left);
        bottom = bottom.max(geometry.top + geometry.height);
        right = right.max(geometry.left + geometry.width);
    }

    let paragraph = tree.new_synthetic(
        NodeKind::element("p"),
        NodeStyle {
            display: Display::Block,
            ..NodeStyle::default()
        },
        Geometry {
            top,
            left,
            width: right - left,
            height: bottom - top,
            right: None,
            bottom: None,
        },
        Synthetic::Paragraph,
    );
    tree.insert_before(paragraph, run[0]);
    for &member in run {
        let geometry = &mut tree.get_mut(member).geometry;
        geometry.top -= top;
        geometry.left -= left;
        tree.append_child(paragraph, member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(top: f64, height: f64) -> Geometry {
        Geometry {
            top,
            left: 0.0,
            width: 400.0,
            height,
            right: None,
            bottom: None,
        }
    }

    fn block_style() -> NodeStyle {
        NodeStyle {
            display: Display::Block,
            ..NodeStyle::default()
        }
    }

    fn root_tree() -> ContentTree {
        ContentTree::new(
            NodeKind::element("div"),
            block_style(),
            Geometry {
                top: 0.0,
                left: 0.0,
                width: 400.0,
                height: 1000.0,
                right: None,
                bottom: None,
            },
        )
    }

    #[test]
    fn comments_and_blank_text_contribute_nothing() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.add_child(root, NodeKind::Comment, NodeStyle::default(), Geometry::default());
        tree.add_child(root, NodeKind::text("   \n\t"), NodeStyle::default(), Geometry::default());
        let visible = tree.add_child(root, NodeKind::element("div"), block_style(), geometry(0.0, 50.0));
        assert_eq!(leaves(&tree, root), vec![visible]);
    }

    #[test]
    fn childless_node_is_a_leaf() {
        let mut tree = root_tree();
        let root = tree.root();
        let child = tree.add_child(root, NodeKind::element("img"), block_style(), geometry(0.0, 50.0));
        assert_eq!(leaves(&tree, root), vec![child]);
    }

    #[test]
    fn row_flex_container_is_atomic() {
        let mut tree = root_tree();
        let root = tree.root();
        let flex = tree.add_child(
            root,
            NodeKind::element("div"),
            NodeStyle {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                ..NodeStyle::default()
            },
            geometry(0.0, 50.0),
        );
        tree.add_child(flex, NodeKind::element("div"), block_style(), geometry(0.0, 50.0));
        tree.add_child(flex, NodeKind::element("div"), block_style(), geometry(0.0, 50.0));
        assert_eq!(leaves(&tree, root), vec![flex]);
    }

    #[test]
    fn column_flex_container_recurses() {
        let mut tree = root_tree();
        let root = tree.root();
        let flex = tree.add_child(
            root,
            NodeKind::element("div"),
            NodeStyle {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                ..NodeStyle::default()
            },
            geometry(0.0, 100.0),
        );
        let a = tree.add_child(flex, NodeKind::element("div"), block_style(), geometry(0.0, 50.0));
        let b = tree.add_child(flex, NodeKind::element("div"), block_style(), geometry(50.0, 50.0));
        assert_eq!(leaves(&tree, root), vec![a, b]);
    }

    #[test]
    fn table_row_is_atomic_even_with_block_cells() {
        let mut tree = root_tree();
        let root = tree.root();
        let table = tree.add_child(
            root,
            NodeKind::element("table"),
            NodeStyle {
                display: Display::Table,
                ..NodeStyle::default()
            },
            geometry(0.0, 100.0),
        );
        let row = tree.add_child(
            table,
            NodeKind::element("tr"),
            NodeStyle {
                display: Display::TableRow,
                ..NodeStyle::default()
            },
            geometry(0.0, 50.0),
        );
        tree.add_child(row, NodeKind::element("div"), block_style(), geometry(0.0, 50.0));
        assert_eq!(leaves(&tree, root), vec![row]);
    }

    #[test]
    fn floated_inline_counts_as_block_level() {
        let mut tree = root_tree();
        let root = tree.root();
        let floated = tree.add_child(
            root,
            NodeKind::element("span"),
            NodeStyle {
                display: Display::Inline,
                float: Float::Left,
                ..NodeStyle::default()
            },
            geometry(0.0, 30.0),
        );
        assert!(is_block_level(&tree, floated));
    }

    #[test]
    fn leaves_partition_visible_content() {
        // Every non-blank, non-comment node is covered by exactly one leaf
        // subtree and no leaf is an ancestor of another.
        let mut tree = root_tree();
        let root = tree.root();
        let section = tree.add_child(root, NodeKind::element("section"), block_style(), geometry(0.0, 400.0));
        tree.add_child(section, NodeKind::element("div"), block_style(), geometry(0.0, 200.0));
        let inline_holder = tree.add_child(section, NodeKind::element("div"), block_style(), geometry(200.0, 200.0));
        tree.add_child(inline_holder, NodeKind::element("span"), NodeStyle::default(), geometry(0.0, 20.0));
        tree.add_child(inline_holder, NodeKind::text("tail"), NodeStyle::default(), geometry(20.0, 20.0));
        tree.add_child(root, NodeKind::Comment, NodeStyle::default(), Geometry::default());

        let leaf_list = leaves(&tree, root);
        for (i, &a) in leaf_list.iter().enumerate() {
            for &b in leaf_list.iter().skip(i + 1) {
                assert!(!is_ancestor(&tree, a, b), "leaves overlap");
                assert!(!is_ancestor(&tree, b, a), "leaves overlap");
            }
        }
        let mut covered = 0;
        for &leaf in &leaf_list {
            covered += subtree_size(&tree, leaf);
        }
        // Two leaves: the childless div (1 node) and the inline holder with
        // its span + text (3 nodes). Transparent containers and the comment
        // are not covered.
        assert_eq!(covered, 4);
    }

    fn is_ancestor(tree: &ContentTree, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = tree.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = tree.parent(id);
        }
        false
    }

    fn subtree_size(tree: &ContentTree, id: NodeId) -> usize {
        1 + tree
            .children(id)
            .iter()
            .map(|&child| subtree_size(tree, child))
            .sum::<usize>()
    }

    #[test]
    fn adjacent_inline_siblings_merge_into_one_paragraph() {
        let mut tree = root_tree();
        let root = tree.root();
        for i in 0..3 {
            tree.add_child(
                root,
                NodeKind::element("span"),
                NodeStyle::default(),
                Geometry {
                    top: 10.0 + i as f64 * 20.0,
                    left: 5.0,
                    width: 100.0,
                    height: 20.0,
                    right: None,
                    bottom: None,
                },
            );
        }
        combine_leaves(&mut tree, root);

        let leaf_list = leaves(&tree, root);
        assert_eq!(leaf_list.len(), 1);
        let paragraph = leaf_list[0];
        assert_eq!(tree.get(paragraph).synthetic, Some(Synthetic::Paragraph));
        assert_eq!(tree.children(paragraph).len(), 3);

        // Bounding-box geometry: spans 10..70 vertically.
        let geometry = tree.get(paragraph).geometry;
        assert_eq!(geometry.top, 10.0);
        assert_eq!(geometry.height, 60.0);
        // Members are rebased against the wrapper.
        let first = tree.children(paragraph)[0];
        assert_eq!(tree.get(first).geometry.top, 0.0);
        assert_eq!(tree.get(first).geometry.left, 0.0);
    }

    #[test]
    fn block_between_inlines_splits_the_run() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.add_child(root, NodeKind::element("span"), NodeStyle::default(), geometry(0.0, 20.0));
        tree.add_child(root, NodeKind::element("div"), block_style(), geometry(20.0, 50.0));
        tree.add_child(root, NodeKind::element("span"), NodeStyle::default(), geometry(70.0, 20.0));
        combine_leaves(&mut tree, root);

        let leaf_list = leaves(&tree, root);
        assert_eq!(leaf_list.len(), 3);
        assert_eq!(tree.get(leaf_list[0]).synthetic, Some(Synthetic::Paragraph));
        assert_eq!(tree.get(leaf_list[1]).synthetic, None);
        assert_eq!(tree.get(leaf_list[2]).synthetic, Some(Synthetic::Paragraph));
    }

    #[test]
    fn non_sibling_inlines_do_not_merge() {
        let mut tree = root_tree();
        let root = tree.root();
        let a = tree.add_child(root, NodeKind::element("div"), block_style(), geometry(0.0, 20.0));
        let b = tree.add_child(root, NodeKind::element("div"), block_style(), geometry(20.0, 20.0));
        tree.add_child(a, NodeKind::element("span"), NodeStyle::default(), geometry(0.0, 20.0));
        tree.add_child(b, NodeKind::element("span"), NodeStyle::default(), geometry(0.0, 20.0));
        combine_leaves(&mut tree, root);

        // The spans never surface as leaves: each parent div has no
        // block-level child and is atomic, so nothing merges across the gap.
        let leaf_list = leaves(&tree, root);
        assert_eq!(leaf_list.len(), 2);
        assert!(leaf_list.iter().all(|&l| tree.get(l).synthetic.is_none()));
    }
}
