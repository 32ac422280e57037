//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which turns the tree
//! specification of a NEXUS `TREE` command (or a plain Newick string) into
//! a [Tree].

use crate::model::tree::{Tree, TreeIndex, TreeMetadata};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::parsing_error::ParsingError;
use crate::parser::scanner::Scanner;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick format phylogenetic trees.
///
/// Trees may be multifurcating. Leaf labels are kept verbatim (quoted labels
/// are unquoted); translating them is left to the caller. Bracketed comments,
/// including `[&...]` annotations, are skipped.
///
/// # Format
/// * `tree ::= subtree [';']`
/// * `subtree ::= leaf | internal_vertex`
/// * `internal_vertex ::= '(' subtree {',' subtree} ')' [label] [branch_length]`
/// * `leaf ::= label [branch_length]`
/// * `branch_length ::= ':' number`
///
/// # Example
/// ```
/// use nexalign::newick::NewickParser;
/// use nexalign::parser::scanner::Scanner;
///
/// let mut scanner = Scanner::new("((A:1.0,B:1.0)90:0.5,C:1.5,D);");
/// let tree = NewickParser::new().parse_str(&mut scanner).unwrap();
/// assert_eq!(tree.leaf_labels(), vec!["A", "B", "C", "D"]);
/// ```
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser]; the number of leaves is learned from the first tree.
    pub fn new() -> Self {
        Self { know_num_leaves: false, num_leaves: DEFAULT_NUM_LEAVES_GUESS }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of data structures.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses a single tree; it must be followed by `;` or the end of text.
    pub fn parse_str(&mut self, scanner: &mut Scanner) -> Result<Tree, ParsingError> {
        self.parse_with_metadata(scanner, TreeMetadata::default())
    }

    /// Parses a single tree and attaches the given metadata to it.
    pub fn parse_with_metadata(&mut self, scanner: &mut Scanner, metadata: TreeMetadata) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new(self.num_leaves).with_metadata(metadata);
        self.parse_root(scanner, &mut tree)?;

        if !self.know_num_leaves {
            self.num_leaves = tree.num_leaves();
            self.know_num_leaves = true;
        }

        Ok(tree)
    }

    /// Parses all `;`-separated trees until the end of text.
    pub fn parse_all(&mut self, scanner: &mut Scanner) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        scanner.skip_comment_and_whitespace()?;
        while !scanner.is_eof() {
            trees.push(self.parse_str(scanner)?);
            scanner.skip_comment_and_whitespace()?;
        }
        Ok(trees)
    }
}

// ============================================================================
// Recursive Descent (private)
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][:branch_length]` followed by `;` or end of text
    /// - The root branch length is read and dropped
    fn parse_root(&mut self, scanner: &mut Scanner, tree: &mut Tree) -> Result<(), ParsingError> {
        scanner.skip_comment_and_whitespace()?;

        let children = self.parse_children(scanner, tree)?;
        let label = self.parse_internal_label(scanner)?;
        let _ = self.parse_branch_length(scanner)?;
        tree.add_root(children, label);

        scanner.skip_comment_and_whitespace()?;
        if !scanner.consume_if(';') && !scanner.is_eof() {
            return Err(ParsingError::invalid_newick_string(
                scanner,
                format!("Expected ';' at end of tree but found {:?}", scanner.peek()),
            ));
        }

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex(&mut self, scanner: &mut Scanner, tree: &mut Tree) -> Result<TreeIndex, ParsingError> {
        scanner.skip_comment_and_whitespace()?;
        if scanner.peek_is('(') {
            self.parse_internal_vertex(scanner, tree)
        } else {
            self.parse_leaf(scanner, tree)
        }
    }

    /// Parses internal vertex `(children)[label][:branch_length]`, adds it to tree and returns its index.
    fn parse_internal_vertex(&mut self, scanner: &mut Scanner, tree: &mut Tree) -> Result<TreeIndex, ParsingError> {
        let children = self.parse_children(scanner, tree)?;
        let label = self.parse_internal_label(scanner)?;
        let branch_length = self.parse_branch_length(scanner)?;

        Ok(tree.add_internal_vertex(children, branch_length, label))
    }

    /// Parses the comma separated children list `(a, b, ...)` and returns their indices.
    fn parse_children(&mut self, scanner: &mut Scanner, tree: &mut Tree) -> Result<Vec<TreeIndex>, ParsingError> {
        if !scanner.consume_if('(') {
            return Err(ParsingError::invalid_newick_string(
                scanner,
                format!("Expected '(' before children but found {:?}", scanner.peek()),
            ));
        }

        let mut children = vec![self.parse_vertex(scanner, tree)?];
        loop {
            scanner.skip_comment_and_whitespace()?;
            if scanner.consume_if(',') {
                children.push(self.parse_vertex(scanner, tree)?);
            } else if scanner.consume_if(')') {
                return Ok(children);
            } else {
                return Err(ParsingError::invalid_newick_string(
                    scanner,
                    format!("Expected ',' or ')' after child but found {:?}", scanner.peek()),
                ));
            }
        }
    }

    /// Parses leaf vertex `label[:branch_length]`, adds it to tree and returns its index.
    fn parse_leaf(&mut self, scanner: &mut Scanner, tree: &mut Tree) -> Result<TreeIndex, ParsingError> {
        let label = scanner.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() {
            return Err(ParsingError::invalid_newick_string(
                scanner,
                format!("Expected leaf label but found {:?}", scanner.peek()),
            ));
        }
        let branch_length = self.parse_branch_length(scanner)?;

        Ok(tree.add_leaf(label, branch_length))
    }

    /// Parses an optional label following a closing parenthesis.
    fn parse_internal_label(&mut self, scanner: &mut Scanner) -> Result<Option<String>, ParsingError> {
        let label = scanner.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses optional branch length `[:number]`, supporting scientific notation.
    fn parse_branch_length(&mut self, scanner: &mut Scanner) -> Result<Option<f64>, ParsingError> {
        scanner.skip_comment_and_whitespace()?;
        if !scanner.consume_if(':') {
            return Ok(None);
        }
        scanner.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(c) = scanner.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                branch_length_str.push(c);
                scanner.next_char();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(scanner, format!("Invalid branch length: {branch_length_str}"))
        })?;
        Ok(Some(value))
    }
}
