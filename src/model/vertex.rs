//! Vertex module for phylogenetic tree representation.

use crate::model::tree::TreeIndex;

/// During construction, Internal and Leaf vertex might not have parent set yet.
const NO_PARENT_SET: TreeIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children, no parent and no branch length, might have a label
/// - **Internal**: Has children and a parent, might have label and branch length
/// - **Leaf**: Has no children, has a label and might have a branch length
///
/// Trees read from NEXUS files are not necessarily binary, so internal vertices
/// store their children as list.
///
/// # Invariants
/// - `index` is the position of the vertex in the tree arena
/// - Internal vertices and leaves have `parent` set, `NO_PARENT_SET = usize::MAX` only during construction
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree (has no parent)
    Root {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Indices of the child vertices
        children: Vec<TreeIndex>,
        /// Optional label (e.g. a support value)
        label: Option<String>,
    },
    /// Internal vertex (has parent and children)
    Internal {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Index of the parent vertex
        parent: TreeIndex,
        /// Indices of the child vertices
        children: Vec<TreeIndex>,
        /// Distance to parent vertex
        branch_length: Option<f64>,
        /// Optional label (e.g. a support value)
        label: Option<String>,
    },
    /// Leaf vertex (has parent and label, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Index of the parent vertex
        parent: TreeIndex,
        /// Taxon name or translate key
        label: String,
        /// Distance to parent vertex
        branch_length: Option<f64>,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    pub fn new_root(index: TreeIndex, children: Vec<TreeIndex>, label: Option<String>) -> Self {
        Vertex::Root { index, children, label }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    pub fn new_internal(
        index: TreeIndex,
        children: Vec<TreeIndex>,
        branch_length: Option<f64>,
        label: Option<String>,
    ) -> Self {
        Vertex::Internal { index, parent: NO_PARENT_SET, children, branch_length, label }
    }

    /// Creates a new leaf vertex.
    pub fn new_leaf(index: TreeIndex, label: String, branch_length: Option<f64>) -> Self {
        Vertex::Leaf { index, parent: NO_PARENT_SET, label, branch_length }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> TreeIndex {
        match self {
            Vertex::Root { index, .. } => *index,
            Vertex::Internal { index, .. } => *index,
            Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns the branch length, `None` for the root or if not set.
    pub fn branch_length(&self) -> Option<f64> {
        match self {
            Vertex::Root { .. } => None,
            Vertex::Internal { branch_length, .. } => *branch_length,
            Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Returns the label of this vertex, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Root { label, .. } => label.as_deref(),
            Vertex::Internal { label, .. } => label.as_deref(),
            Vertex::Leaf { label, .. } => Some(label),
        }
    }

    /// Returns the children, empty for leaves.
    pub fn children(&self) -> &[TreeIndex] {
        match self {
            Vertex::Root { children, .. } => children,
            Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Returns whether this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns whether this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns whether this vertex is the root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Sets the parent index; ignored for the root.
    pub fn set_parent(&mut self, parent_index: TreeIndex) {
        match self {
            Vertex::Root { .. } => {}
            Vertex::Internal { parent, .. } => *parent = parent_index,
            Vertex::Leaf { parent, .. } => *parent = parent_index,
        }
    }

    /// Returns the parent index, `None` for the root or during construction.
    pub fn parent_index(&self) -> Option<TreeIndex> {
        match self {
            Vertex::Root { .. } => None,
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                (*parent != NO_PARENT_SET).then_some(*parent)
            }
        }
    }

    /// Replaces the label of a leaf; no-op for other vertices.
    pub(crate) fn set_leaf_label(&mut self, new_label: String) {
        if let Vertex::Leaf { label, .. } = self {
            *label = new_label;
        }
    }
}
