//! Configurable reading of NEXUS files into a [Document].
//!
//! [NexusParserBuilder] collects the options (tree burnin, skipping the first
//! tree, keeping unknown blocks) and [build()](NexusParserBuilder::build) reads
//! the whole text. The resulting [NexusParser] gives access to the document and
//! iterates over the trees that survived burnin.

use crate::model::Tree;
use crate::nexus::document::Document;
use crate::parser::ParsingError;
use std::fs::File;
use std::io::Read;

// =#========================================================================#=
// BURNIN
// =#========================================================================#=
/// Specifies how many initial trees to discard as burnin.
///
/// Burnin is commonly used in MCMC sampling to discard initial trees
/// before the chain has converged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Burnin {
    /// Discard a fixed number of trees.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::Burnin;
    /// let burnin = Burnin::Count(1001); // discard first 1001 trees
    /// ```
    Count(usize),

    /// Discard a fraction of the trees, in the range [0.0, 1.0).
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::Burnin;
    /// let burnin = Burnin::Percentage(0.25); // discard first 25% of trees
    /// ```
    Percentage(f64),
}

impl Burnin {
    /// Number of trees to discard out of `num_trees`; never more than `num_trees`.
    pub fn get_count(&self, num_trees: usize) -> usize {
        let count = match self {
            Burnin::Count(n) => *n,
            Burnin::Percentage(pct) => (num_trees as f64 * pct.clamp(0.0, 1.0)).floor() as usize,
        };
        count.min(num_trees)
    }
}

impl Default for Burnin {
    fn default() -> Self {
        Burnin::Count(0)
    }
}

// =#========================================================================#=
// NEXUS PARSER BUILDER
// =#========================================================================#=
/// Builder for configuring and creating a [NexusParser].
///
/// # Configuration Options
///
/// * **Skip first**: drop the very first tree, e.g. the start tree of an MCMC run
///   - [with_skip_first()](NexusParserBuilder::with_skip_first)
/// * **Burnin**: drop a count or fraction of the (remaining) initial trees
///   - [with_burnin()](NexusParserBuilder::with_burnin)
/// * **Unknown blocks**: kept for passthrough by default
///   - [discard_unknown_blocks()](NexusParserBuilder::discard_unknown_blocks)
///
/// # Example
/// ```
/// use nexalign::nexus::{Burnin, NexusParserBuilder};
///
/// let text = "#NEXUS
/// begin trees;
///   tree t1 = (a,b);
///   tree t2 = (a,(b,c));
///   tree t3 = ((a,b),c);
///   tree t4 = (c,(a,b));
/// end;";
/// let mut parser = NexusParserBuilder::for_str(text)
///     .with_skip_first()
///     .with_burnin(Burnin::Percentage(0.34))
///     .build()
///     .unwrap();
///
/// assert_eq!(parser.num_total_trees(), 4);
/// assert_eq!(parser.num_trees(), 2);
/// assert_eq!(parser.next_tree_ref().unwrap().name(), "t3");
/// ```
#[derive(Debug)]
pub struct NexusParserBuilder {
    text: String,
    skip_first: bool,
    burnin: Burnin,
    keep_unknown_blocks: bool,
}

impl NexusParserBuilder {
    /// Creates a builder for NEXUS text held in memory.
    pub fn for_str<S: Into<String>>(text: S) -> Self {
        Self { text: text.into(), skip_first: false, burnin: Burnin::default(), keep_unknown_blocks: true }
    }

    /// Creates a builder for a NEXUS file; the file is read completely.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn for_file(mut file: File) -> std::io::Result<Self> {
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Ok(Self::for_str(text))
    }

    /// Configures the parser to drop the first tree.
    ///
    /// If burnin is configured as well, the first tree is dropped first and
    /// burnin applies to the remaining trees.
    pub fn with_skip_first(mut self) -> Self {
        self.skip_first = true;
        self
    }

    /// Configures the amount of burnin to drop.
    pub fn with_burnin(mut self, burnin: Burnin) -> Self {
        self.burnin = burnin;
        self
    }

    /// Drops blocks with unknown titles instead of keeping them for passthrough.
    pub fn discard_unknown_blocks(mut self) -> Self {
        self.keep_unknown_blocks = false;
        self
    }

    /// Reads the text and applies skip-first and burnin to the trees.
    ///
    /// # Errors
    /// Returns a [ParsingError] for any malformed command or block.
    pub fn build(self) -> Result<NexusParser, ParsingError> {
        let mut document = Document::new();
        document.keep_unknown_blocks = self.keep_unknown_blocks;
        document.read(&self.text)?;

        let num_total_trees = document.trees.len();
        let skip = usize::from(self.skip_first && num_total_trees > 0);
        let start = skip + self.burnin.get_count(num_total_trees - skip);
        document.trees.drain(..start);
        log::debug!(
            "read {} trees, {} remain after skip-first and burnin",
            num_total_trees,
            document.trees.len()
        );

        Ok(NexusParser { document, num_total_trees, tree_pos: 0 })
    }
}

// =#========================================================================#=
// NEXUS PARSER
// =#========================================================================#=
/// A parsed NEXUS file: its [Document] and a cursor over its trees.
#[derive(Debug)]
pub struct NexusParser {
    document: Document,
    /// Number of `TREE` commands including dropped ones
    num_total_trees: usize,
    /// Next tree returned by `next_tree_ref()`
    /// - Invariant: `tree_pos <= document.trees.len()`
    tree_pos: usize,
}

impl NexusParser {
    /// The parsed document (with dropped trees removed).
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consumes this parser and returns the parsed document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Returns the next tree, `None` after the last one.
    pub fn next_tree_ref(&mut self) -> Option<&Tree> {
        let tree = self.document.trees.get(self.tree_pos)?;
        self.tree_pos += 1;
        Some(tree)
    }

    /// Resets to the first tree (respecting skip-first and burnin).
    pub fn reset(&mut self) {
        self.tree_pos = 0;
    }

    /// Number of trees left after skip-first and burnin.
    pub fn num_trees(&self) -> usize {
        self.document.trees.len()
    }

    /// Number of trees in the file including dropped ones.
    pub fn num_total_trees(&self) -> usize {
        self.num_total_trees
    }
}
