//! # Content Tree Model
//!
//! The input representation for the pagination engine. A content tree is a
//! measured snapshot of a rendered document fragment: every node carries the
//! tag/kind the host saw, its computed display category, and the geometry the
//! host's layout engine already resolved. This is designed to be easily
//! produced by a DOM walker, a React reconciler, or direct JSON construction.
//!
//! The engine never computes layout. It trusts the geometry it is handed and
//! only ever *adds* vertical space (margins, blank rows, dividers) so that
//! content lines up with page bands.
//!
//! Internally the tree is an arena: nodes live in one `Vec` and refer to each
//! other by [`NodeId`]. That keeps the mutation primitives the split pass
//! needs (insert-before, wrap-a-run, parent walks) cheap and borrow-friendly,
//! and cloning the whole tree for a print invocation is a single `Vec` clone.

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`ContentTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node *is*: an element with a tag, a text run, or a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Element { tag: String },
    Text { content: String },
    Comment,
}

impl NodeKind {
    pub fn element(tag: &str) -> Self {
        NodeKind::Element {
            tag: tag.to_string(),
        }
    }

    pub fn text(content: &str) -> Self {
        NodeKind::Text {
            content: content.to_string(),
        }
    }
}

/// Computed display category, as resolved by the host's style system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    Block,
    #[default]
    Inline,
    Table,
    TableRow,
    Flex,
    /// Any display value the engine does not distinguish (inline-block,
    /// grid, list-item, ...). Treated as non-block for leaf extraction.
    Other,
}

/// Main-axis direction of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Computed float value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

/// An RGB color. Used for the raster background and divider paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
}

/// The slice of computed style the split pass reads and writes.
///
/// Margins are optional on purpose: a host that could not resolve a numeric
/// value sends nothing, and the engine substitutes zero wherever it reads
/// one (the original recovered from `NaN` the same way).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    pub display: Display,
    pub flex_direction: FlexDirection,
    pub float: Float,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

/// Box geometry in content pixels, relative to the node's immediate
/// positioning ancestor (its parent element in a snapshot).
///
/// `right`/`bottom` are optional because most hosts only report
/// top/left/width/height; the geometry resolver derives the missing
/// components from the root container's size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

/// Marker for nodes the engine inserted itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Synthetic {
    /// Wrapper around a merged run of inline siblings.
    Paragraph,
    /// Blank table row pushing the following row to the next page band.
    BlankRow,
    /// Full-width painted gap marking a page boundary.
    Divider,
}

/// One node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub style: NodeStyle,
    pub geometry: Geometry,
    pub synthetic: Option<Synthetic>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-backed content tree with a single root at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTree {
    nodes: Vec<NodeData>,
}

impl ContentTree {
    /// Create a tree containing only a root node.
    pub fn new(kind: NodeKind, style: NodeStyle, geometry: Geometry) -> Self {
        ContentTree {
            nodes: vec![NodeData {
                kind,
                style,
                geometry,
                synthetic: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|&c| c == id)?;
        if index == 0 {
            None
        } else {
            Some(siblings[index - 1])
        }
    }

    /// Append a new node as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        style: NodeStyle,
        geometry: Geometry,
    ) -> NodeId {
        let id = self.push_detached(kind, style, geometry, None);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Create a detached synthetic node; attach it with [`ContentTree::insert_before`]
    /// or [`ContentTree::append_child`].
    pub fn new_synthetic(
        &mut self,
        kind: NodeKind,
        style: NodeStyle,
        geometry: Geometry,
        marker: Synthetic,
    ) -> NodeId {
        self.push_detached(kind, style, geometry, Some(marker))
    }

    /// Insert a detached node immediately before `reference` under the same
    /// parent. No effect if `reference` is itself detached.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) {
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
        else {
            return;
        };
        self.nodes[parent.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Attach a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        self.detach(node);
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.push(node);
    }

    /// Move `node` out of its current parent's child list (it stays in the
    /// arena and keeps its own subtree).
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != node);
            self.nodes[node.0].parent = None;
        }
    }

    fn push_detached(
        &mut self,
        kind: NodeKind,
        style: NodeStyle,
        geometry: Geometry,
        synthetic: Option<Synthetic>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            style,
            geometry,
            synthetic,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ── Snapshot conversion ─────────────────────────────────────

    /// Build a tree from a nested snapshot. The snapshot's root becomes the
    /// tree's root.
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Self {
        let mut tree = ContentTree::new(
            snapshot.kind.clone(),
            snapshot.style.clone(),
            snapshot.geometry,
        );
        let root = tree.root();
        for child in &snapshot.children {
            Self::attach_snapshot(&mut tree, root, child);
        }
        tree
    }

    /// Parse a JSON snapshot, as serialized by a host-side DOM walker.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: NodeSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(&snapshot))
    }

    fn attach_snapshot(tree: &mut ContentTree, parent: NodeId, snapshot: &NodeSnapshot) {
        let id = tree.add_child(
            parent,
            snapshot.kind.clone(),
            snapshot.style.clone(),
            snapshot.geometry,
        );
        tree.nodes[id.0].synthetic = snapshot.synthetic;
        for child in &snapshot.children {
            Self::attach_snapshot(tree, id, child);
        }
    }

    /// Serialize the tree (typically the mutated working clone) back into the
    /// nested form, so the host's renderer can re-render it with the inserted
    /// spacer geometry applied.
    pub fn to_snapshot(&self) -> NodeSnapshot {
        self.node_snapshot(self.root())
    }

    fn node_snapshot(&self, id: NodeId) -> NodeSnapshot {
        let node = &self.nodes[id.0];
        NodeSnapshot {
            kind: node.kind.clone(),
            style: node.style.clone(),
            geometry: node.geometry,
            synthetic: node.synthetic,
            children: node
                .children
                .iter()
                .map(|&child| self.node_snapshot(child))
                .collect(),
        }
    }
}

/// The nested, serde-friendly form of a content node. This is the wire
/// format between the host front-end and the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic: Option<Synthetic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}
