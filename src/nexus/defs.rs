//! NEXUS format constants and definitions.
//!
//! This module contains the keywords, default symbols and block definitions
//! used when reading and writing NEXUS files.

/// NEXUS file header "#NEXUS"
pub(crate) const NEXUS_HEADER: &str = "#NEXUS";

/// NEXUS block begin keyword "begin"
pub(crate) const BLOCK_BEGIN: &str = "begin";

/// NEXUS block end keywords "end" and "endblock"
pub(crate) const BLOCK_END: &[&str] = &["end", "endblock"];

/// Marker characters that turn a bracketed comment into a special comment
pub(crate) const SPECIAL_COMMENTS: &[char] = &['&'];

/// Default missing symbol
pub(crate) const DEFAULT_MISSING: char = '?';

/// Default gap symbol
pub(crate) const DEFAULT_GAP: char = '-';

/// Default value of the `gapmode` option
pub(crate) const DEFAULT_GAPMODE: &str = "missing";

/// Block width of interleaved matrices written by default
pub(crate) const DEFAULT_INTERLEAVE_BLOCKSIZE: usize = 70;

/// Name of the character partition holding codon positions
pub const CODON_POSITIONS: &str = "codonpositions";

/// Name of the partition recording source column ranges after combining matrices
pub const COMBINED: &str = "combined";

/// Minimal document every new document starts from
pub const DEFAULT_NEXUS: &str =
    "#NEXUS\nbegin data; dimensions ntax=0 nchar=0; format datatype=dna; end; ";

/// NEXUS block types
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NexusBlock {
    Taxa,
    Trees,
    Data,
    Characters,
    Sets,
    Codons,
    UnknownBlock(String),
}

impl NexusBlock {
    /// Parse a block name (case-insensitive) into a NexusBlock variant
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "taxa" => NexusBlock::Taxa,
            "trees" => NexusBlock::Trees,
            "data" => NexusBlock::Data,
            "characters" => NexusBlock::Characters,
            "sets" => NexusBlock::Sets,
            "codons" => NexusBlock::Codons,
            _ => NexusBlock::UnknownBlock(name.to_string()),
        }
    }
}
