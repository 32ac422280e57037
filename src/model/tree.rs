//! Phylogenetic tree structure as produced by the NEXUS `TREE` command.

use crate::model::vertex::Vertex;
use crate::parser::utils::safe_name;

/// Index of a vertex in a tree (arena).
pub type TreeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: TreeIndex = usize::MAX;

// =#========================================================================#=
// TREE METADATA
// =#========================================================================#=
/// Name, rooted flag and weight of a tree, as given by a `TREE` command and
/// its `[&R]`, `[&U]`, `[&W <weight>]` directives.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeMetadata {
    pub name: String,
    pub rooted: bool,
    pub weight: f64,
}

impl Default for TreeMetadata {
    fn default() -> Self {
        TreeMetadata { name: String::new(), rooted: false, weight: 1.0 }
    }
}

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by [TreeIndex].
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena
/// - Index of root is maintained
/// - No assumption on order of indices is maintained
/// - Leaves store their label directly; internal vertices may carry a label too
/// - Vertices may have any positive number of children
///
/// # Construction
/// Add vertices bottom-up, finishing with the root. Test validity with [Tree::is_valid].
///
/// # Example
/// ```
/// use nexalign::model::Tree;
///
/// // Create a tree: ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new(3);
/// let a = tree.add_leaf("A".to_string(), Some(0.2));
/// let b = tree.add_leaf("B".to_string(), Some(0.2));
/// let c = tree.add_leaf("C".to_string(), Some(0.4));
/// let ab = tree.add_internal_vertex(vec![a, b], Some(0.2), None);
/// tree.add_root(vec![ab, c], None);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.to_newick(), "((A:0.2,B:0.2):0.2,C:0.4);");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    metadata: TreeMetadata,
    root_index: TreeIndex,
    vertices: Vec<Vertex>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new empty tree with room for about `num_leaves` leaves.
    pub fn new(num_leaves: usize) -> Self {
        Tree {
            metadata: TreeMetadata::default(),
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(2 * num_leaves.max(1)),
        }
    }

    /// Attaches name, rooted flag and weight to this tree.
    pub fn with_metadata(mut self, metadata: TreeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    pub fn add_root(&mut self, children: Vec<TreeIndex>, label: Option<String>) -> TreeIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices.push(Vertex::new_root(index, children, label));
        self.root_index = index;

        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<TreeIndex>,
        branch_length: Option<f64>,
        label: Option<String>,
    ) -> TreeIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices.push(Vertex::new_internal(index, children, branch_length, label));

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    pub fn add_leaf(&mut self, label: String, branch_length: Option<f64>) -> TreeIndex {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new_leaf(index, label, branch_length));
        index
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set and points to the only Root vertex
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to the correct parent
    /// - Internal vertices and the root have at least one child
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.vertices.len() || !self.vertices[self.root_index].is_root() {
            return false;
        }

        let mut num_roots = 0;
        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            match vertex {
                Vertex::Root { .. } => num_roots += 1,
                _ => {
                    let Some(parent) = vertex.parent_index() else {
                        return false;
                    };
                    if parent >= self.vertices.len() || !self.vertices[parent].children().contains(&index) {
                        return false;
                    }
                }
            }

            if !vertex.is_leaf() && vertex.children().is_empty() {
                return false;
            }
            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent_index() != Some(index) {
                    return false;
                }
            }
        }

        num_roots == 1
    }

    /// Returns the name of this tree.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns whether the tree was declared rooted (`[&R]`).
    pub fn is_rooted(&self) -> bool {
        self.metadata.rooted
    }

    /// Returns the tree weight (`[&W <weight>]`, default 1).
    pub fn weight(&self) -> f64 {
        self.metadata.weight
    }

    /// Returns the metadata of this tree.
    pub fn metadata(&self) -> &TreeMetadata {
        &self.metadata
    }

    /// Returns whether a root has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the root vertex.
    ///
    /// # Panics
    /// Panics if no root has been added yet.
    pub fn root(&self) -> &Vertex {
        &self.vertices[self.root_index]
    }

    /// Returns the vertex at the given index.
    pub fn vertex(&self, index: TreeIndex) -> &Vertex {
        &self.vertices[index]
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_leaf()).count()
    }

    /// Returns the total number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the leaf labels in pre-order (left to right as written).
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .filter_map(|v| v.label())
            .collect()
    }

    /// Replaces every leaf label by the result of `relabel`, stopping at the first error.
    pub fn relabel_leaves<E, F>(&mut self, mut relabel: F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        for vertex in self.vertices.iter_mut().filter(|v| v.is_leaf()) {
            let new_label = relabel(vertex.label().unwrap_or_default())?;
            vertex.set_leaf_label(new_label);
        }
        Ok(())
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

impl std::ops::Index<TreeIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: TreeIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<TreeIndex> for Tree {
    fn index_mut(&mut self, index: TreeIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl Tree {
    /// Converts the tree to a Newick string terminated with `;`.
    ///
    /// Labels containing whitespace or punctuation are single-quoted.
    pub fn to_newick(&self) -> String {
        fn build_newick(tree: &Tree, newick: &mut String, index: TreeIndex) {
            let vertex = &tree[index];

            if !vertex.is_leaf() {
                newick.push('(');
                for (i, &child) in vertex.children().iter().enumerate() {
                    if i > 0 {
                        newick.push(',');
                    }
                    build_newick(tree, newick, child);
                }
                newick.push(')');
            }

            if let Some(label) = vertex.label() {
                newick.push_str(&safe_name(label, false));
            }
            if let Some(branch_length) = vertex.branch_length() {
                newick.push(':');
                newick.push_str(&branch_length.to_string());
            }
        }

        let mut newick = String::with_capacity(self.vertices.len() * 8);
        if self.is_root_set() {
            build_newick(self, &mut newick, self.root_index);
        }
        newick.push(';');
        newick
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(TreeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so the leftmost is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<TreeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        for &child in vertex.children().iter().rev() {
            self.stack.push(child);
        }

        Some(vertex)
    }
}
