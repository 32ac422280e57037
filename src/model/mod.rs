//! Object model shared by the NEXUS document and the Newick parser.
//!
//! - [Sequence] rows of a character matrix, with their [DataType]
//! - [Alphabet] IUPAC ambiguity tables per datatype
//! - [Tree] phylogenetic trees in arena representation, with [Vertex] variants

/// Datatypes and ambiguity tables
pub mod alphabet;
/// Matrix rows
pub mod sequence;
/// Phylogenetic tree structure and operations
pub mod tree;
/// Tree vertex types (root, internal, leaf)
pub mod vertex;

pub use alphabet::{Alphabet, DataType};
pub use sequence::{Residues, Sequence};
pub use tree::{Tree, TreeIndex, TreeMetadata};
pub use vertex::Vertex;
