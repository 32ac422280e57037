//! Nexalign is a library to read, edit and write NEXUS files holding
//! character matrices (alignments), character and taxon sets, and
//! phylogenetic trees.
//!
//! Core functionality provided:
//! - Nexus: Parse `TAXA`, `DATA`/`CHARACTERS`, `SETS`/`ASSUMPTIONS`/`CODONS`
//!   and `TREES` blocks into a [Document](nexus::Document); unknown blocks are
//!   kept for passthrough.
//! - Sets: Character and taxon identifiers with ranges, stepped ranges and
//!   named sets, resolved to 0-based indices and taxon labels.
//! - Editing: Crop, bootstrap, insert gaps, add sequences, combine matrices,
//!   find constant and gap-only sites, and derive step matrices.
//! - Writing: NEXUS (plain, interleaved or by partition, with renumbered
//!   sets), FASTA and PHYLIP.
//! - Newick: Parse tree descriptions into [Tree](model::Tree)s and write them back.
//!
//! Limitations:
//! - Only molecular datatypes (DNA, RNA, protein)
//! - No `TRANSPOSE` or `TOKENS` matrices
//! - Trees are stored, not analysed
//!
//! # Usage patterns
//! 1. Quick access with default settings, see [parse_nexus_str],
//!    [parse_nexus_file] and [parse_newick_str].
//! 2. Configure reading with [NexusParserBuilder](nexus::NexusParserBuilder)
//!    (tree burnin, unknown blocks) and writing with
//!    [WriteOptions](nexus::WriteOptions).
//!
//! ## Example
//! ```
//! use nexalign::nexus::WriteOptions;
//! use nexalign::parse_nexus_str;
//!
//! let mut doc = parse_nexus_str("#NEXUS
//!     begin data;
//!       dimensions ntax=3 nchar=6;
//!       format datatype=dna;
//!       matrix
//!         Fox   ACGTAC
//!         Wolf  ACGTTC
//!         Jackal ACGAAC
//!       ;
//!     end;
//!     begin sets;
//!       charset tail = 4-6;
//!     end;").unwrap();
//!
//! doc.insert_gap(1, 2, false).unwrap();
//! assert_eq!(doc.nchar(), 8);
//! assert_eq!(doc.charsets()["tail"], [5, 6, 7]);
//!
//! let text = doc.to_nexus_string(&WriteOptions::default().with_delete(vec!["Wolf".into()])).unwrap();
//! assert!(text.contains("dimensions ntax=2 nchar=8;"));
//! assert!(text.contains("charset tail = 6-8;"));
//! ```
//!
//! ## Example Parser Configuration
//! ```no_run
//! use nexalign::nexus::{Burnin, NexusParserBuilder};
//! use std::fs::File;
//!
//! let mut parser = NexusParserBuilder::for_file(File::open("mcmc_samples.trees")?)?
//!     .with_skip_first()                    // Skip start tree
//!     .with_burnin(Burnin::Percentage(0.1)) // Discard first 10%
//!     .build()?;
//!
//! while let Some(tree) = parser.next_tree_ref() {
//!     println!("{}", tree.to_newick());
//! }
//! # Ok::<(), nexalign::parser::ParsingError>(())
//! ```

pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;

use crate::model::Tree;
use crate::nexus::Document;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Nexus API
// ============================================================================
/// Parses NEXUS text using default settings, returning a [Document].
///
/// See [`nexus::parse_str`] for full documentation.
pub fn parse_nexus_str<S: AsRef<str>>(text: S) -> Result<Document, ParsingError> {
    nexus::parse_str(text)
}

/// Parses a NEXUS file using default settings, returning a [Document].
///
/// See [`nexus::parse_file`] for full documentation.
pub fn parse_nexus_file<P: AsRef<Path>>(path: P) -> Result<Document, ParsingError> {
    nexus::parse_file(path)
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}
