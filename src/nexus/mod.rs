//! NEXUS reader, document model and writer for character matrices, sets and trees.
//!
//! This module provides:
//! - [Document]: the parsed content of a NEXUS file, with editing operations
//! - [NexusParserBuilder] / [NexusParser]: configurable reading (burnin, unknown blocks)
//! - [NexusWriter] / [WriteOptions]: writing a document back to NEXUS
//! - [StepMatrix]: weighted parsimony cost matrices
//! - [combine]: concatenating several documents into one
//!
//! # Quick API
//! For simple use cases with default settings:
//! - [`parse_str`]: parses NEXUS text into a [Document]
//! - [`parse_file`]: parses a NEXUS file into a [Document]
//!
//! # Format
//! A NEXUS file starts with `#NEXUS` and consists of blocks
//! `begin <title>; <command>; ... end;`. The following blocks are interpreted:
//! - `TAXA`: `DIMENSIONS NTAX`, `TAXLABELS`
//! - `DATA` / `CHARACTERS`: `DIMENSIONS`, `FORMAT`, `MATRIX`, `CHARLABELS`,
//!   `CHARSTATELABELS`, `STATELABELS`, `OPTIONS`, `ELIMINATE`, `TAXLABELS`
//! - `SETS` / `ASSUMPTIONS` / `CODONS`: `CHARSET`, `TAXSET`, `CHARPARTITION`,
//!   `TAXPARTITION`, `CODONPOSSET`, `SET`, `OPTIONS`
//! - `TREES`: `TRANSLATE`, `TREE`
//!
//! Blocks with any other title are kept unchanged (see
//! [NexusParserBuilder::discard_unknown_blocks]).
//!
//! ## Details
//! * Keywords are case-insensitive, labels keep their case
//! * Comments `[...]` are removed, except special comments `[&...]` in trees
//! * `FORMAT` must precede `MATRIX`; `TRANSPOSE`, `TOKENS` and non-molecular
//!   datatypes are rejected
//! * Character and taxon sets are given by 1-based numbers, ranges `a-b`,
//!   stepped ranges `a-b\n`, labels and names of earlier sets

pub mod block;
pub mod defs;
pub mod document;
pub mod lexer;
pub mod sets;

mod commands;
mod edit;
mod export;
mod parser;
mod stepmatrix;
mod writer;

pub use self::document::{CharPartition, Document, TaxPartition};
pub use self::edit::combine;
pub use self::parser::{Burnin, NexusParser, NexusParserBuilder};
pub use self::sets::compact_for_nexus;
pub use self::stepmatrix::StepMatrix;
pub use self::writer::{NexusWriter, WriteOptions};

use crate::parser::ParsingError;
use std::fs::File;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (public)
// ============================================================================
/// Parses NEXUS text into a [Document], keeping unknown blocks.
///
/// # Example
/// ```
/// use nexalign::nexus::parse_str;
///
/// let doc = parse_str("#NEXUS
///     begin data;
///       dimensions ntax=2 nchar=3;
///       format datatype=dna missing=? gap=-;
///       matrix
///         Fox  AC-
///         Wolf A?T
///       ;
///     end;").unwrap();
/// assert_eq!(doc.taxlabels(), ["Fox", "Wolf"]);
/// assert_eq!(doc.sequence("Wolf").unwrap().as_str(), "A?T");
/// ```
pub fn parse_str<S: AsRef<str>>(text: S) -> Result<Document, ParsingError> {
    let parser = NexusParserBuilder::for_str(text.as_ref()).build()?;
    Ok(parser.into_document())
}

/// Parses a NEXUS file into a [Document], keeping unknown blocks.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document, ParsingError> {
    let file = File::open(path.as_ref())?;
    log::info!("reading {}", path.as_ref().display());
    let parser = NexusParserBuilder::for_file(file)?.build()?;
    Ok(parser.into_document())
}
