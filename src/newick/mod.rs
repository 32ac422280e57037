//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick format strings
//! into [`Tree`]s. The NEXUS `TREE` command hands its tree specification
//! to this parser; it may also be used directly.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string, returns a [`Tree`]
//!
//! # Format
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere where whitespace is allowed
//! * Annotations such as `A[&rate=0.5]:2.1` are treated as comments

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::write_newick;

use crate::model::Tree;
use crate::parser::ParsingError;
use crate::parser::scanner::Scanner;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`Tree`].
///
/// # Example
/// ```
/// use nexalign::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut scanner = Scanner::new(newick.as_ref());
    NewickParser::new().parse_str(&mut scanner)
}
