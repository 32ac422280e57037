//! The in-memory NEXUS document.
//!
//! A [Document] collects everything the known blocks of a NEXUS file define:
//! dimensions, format, the character matrix, labels, sets and partitions,
//! trees, and the raw text of blocks it does not know. It is populated strictly
//! in file order by the command handlers (see `commands.rs`); a later command
//! overrides what an earlier one set.

use crate::model::alphabet::{Alphabet, DataType};
use crate::model::{Sequence, Tree};
use crate::nexus::block::{CommandOptions, RawBlock, assemble_blocks};
use crate::nexus::defs::{DEFAULT_GAP, DEFAULT_GAPMODE, DEFAULT_MISSING, NexusBlock};
use crate::nexus::lexer::command_lines;
use crate::parser::ParsingError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

/// Character partition: member name → sorted 0-based character indices.
pub type CharPartition = BTreeMap<String, Vec<usize>>;

/// Taxon partition: member name → sorted taxon names.
pub type TaxPartition = BTreeMap<String, Vec<String>>;

// =#========================================================================#=
// DOCUMENT
// =#========================================================================#=
/// Taxa, character matrix, sets, partitions and trees of a NEXUS file.
///
/// # Invariants
/// - After a `MATRIX` command, every sequence has exactly `nchar` residues and
///   the taxon labels are exactly the matrix keys (in file order).
/// - Character set and partition indices are 0-based and below `nchar`.
/// - Taxon set members are (disambiguated) taxon labels.
///
/// # Example
/// ```
/// use nexalign::nexus::Document;
///
/// let text = "#NEXUS
/// begin data;
///   dimensions ntax=2 nchar=4;
///   format datatype=dna missing=? gap=-;
///   matrix
///     Fox  ACGT
///     Wolf AC-T
///   ;
/// end;";
/// let document: Document = text.parse().unwrap();
/// assert_eq!(document.taxlabels(), ["Fox", "Wolf"]);
/// assert_eq!(document.sequence("Wolf").unwrap().as_str(), "AC-T");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) ntax: usize,
    pub(crate) nchar: usize,

    // FORMAT
    pub(crate) datatype: DataType,
    pub(crate) alphabet: Alphabet,
    pub(crate) respectcase: bool,
    pub(crate) missing: char,
    pub(crate) gap: char,
    pub(crate) symbols: Option<String>,
    pub(crate) equate: Option<String>,
    pub(crate) matchchar: Option<char>,
    pub(crate) labels: Option<String>,
    pub(crate) interleave: bool,
    pub(crate) tokens: bool,
    pub(crate) valid_chars: HashSet<char>,
    pub(crate) rev_ambiguities: HashMap<String, char>,

    // MATRIX and labels
    pub(crate) matrix: HashMap<String, Sequence>,
    pub(crate) taxlabels: Vec<String>,
    pub(crate) unaltered_taxlabels: Vec<String>,
    pub(crate) declared_taxlabels: Vec<String>,
    pub(crate) charlabels: BTreeMap<usize, String>,
    pub(crate) statelabels: BTreeMap<usize, Vec<String>>,

    // SETS and CODONS
    pub(crate) charsets: BTreeMap<String, Vec<usize>>,
    pub(crate) taxsets: BTreeMap<String, Vec<String>>,
    pub(crate) charpartitions: BTreeMap<String, CharPartition>,
    pub(crate) taxpartitions: BTreeMap<String, TaxPartition>,
    pub(crate) codonposset: Option<String>,

    // TREES
    pub(crate) trees: Vec<Tree>,
    pub(crate) translate: Option<BTreeMap<usize, String>>,

    // Option commands and passthrough
    pub(crate) set_options: CommandOptions,
    pub(crate) options: CommandOptions,
    pub(crate) eliminate: CommandOptions,
    pub(crate) unknown_blocks: Vec<RawBlock>,
    pub(crate) keep_unknown_blocks: bool,

    // Prerequisites of MATRIX
    pub(crate) has_format: bool,
    pub(crate) has_dimensions: bool,
}

// ============================================================================
// Construction & Reading (pub)
// ============================================================================
impl Document {
    /// Creates an empty DNA document with default symbols (`?` missing, `-` gap).
    ///
    /// No `FORMAT` or `DIMENSIONS` counts as seen yet, so a `MATRIX` read into
    /// this document still needs both.
    pub fn new() -> Self {
        let mut options = CommandOptions::default();
        options.insert("gapmode", Some(DEFAULT_GAPMODE.to_string()));

        let mut document = Document {
            ntax: 0,
            nchar: 0,
            datatype: DataType::Dna,
            alphabet: Alphabet::for_datatype(DataType::Dna),
            respectcase: false,
            missing: DEFAULT_MISSING,
            gap: DEFAULT_GAP,
            symbols: None,
            equate: None,
            matchchar: None,
            labels: None,
            interleave: false,
            tokens: false,
            valid_chars: HashSet::new(),
            rev_ambiguities: HashMap::new(),
            matrix: HashMap::new(),
            taxlabels: Vec::new(),
            unaltered_taxlabels: Vec::new(),
            declared_taxlabels: Vec::new(),
            charlabels: BTreeMap::new(),
            statelabels: BTreeMap::new(),
            charsets: BTreeMap::new(),
            taxsets: BTreeMap::new(),
            charpartitions: BTreeMap::new(),
            taxpartitions: BTreeMap::new(),
            codonposset: None,
            trees: Vec::new(),
            translate: None,
            set_options: CommandOptions::default(),
            options,
            eliminate: CommandOptions::default(),
            unknown_blocks: Vec::new(),
            keep_unknown_blocks: true,
            has_format: false,
            has_dimensions: false,
        };
        document.refresh_character_tables();
        document
    }

    /// Reads NEXUS text into this document, block by block in file order.
    ///
    /// Known blocks are dispatched command by command; other blocks are kept
    /// as [RawBlock]s. The first error aborts reading; the document must then
    /// be considered unusable.
    pub fn read(&mut self, text: &str) -> Result<(), ParsingError> {
        let lines = command_lines(text)?;
        let blocks = assemble_blocks(&lines)?;

        for block in blocks {
            match block.kind() {
                NexusBlock::UnknownBlock(title) => {
                    log::debug!("keeping unknown block {title} ({} commands)", block.lines.len());
                    if self.keep_unknown_blocks {
                        self.unknown_blocks.push(block);
                    }
                }
                _ => {
                    log::debug!("reading block {}", block.title);
                    for line in &block.lines {
                        self.dispatch(line)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Document {
    type Err = ParsingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut document = Document::new();
        document.read(text)?;
        Ok(document)
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl Document {
    /// Number of taxa
    pub fn ntax(&self) -> usize {
        self.ntax
    }

    /// Number of characters (columns)
    pub fn nchar(&self) -> usize {
        self.nchar
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Ambiguity table of the current datatype, including missing and gap symbols.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn respectcase(&self) -> bool {
        self.respectcase
    }

    pub fn missing(&self) -> char {
        self.missing
    }

    pub fn gap(&self) -> char {
        self.gap
    }

    pub fn symbols(&self) -> Option<&str> {
        self.symbols.as_deref()
    }

    pub fn equate(&self) -> Option<&str> {
        self.equate.as_deref()
    }

    pub fn matchchar(&self) -> Option<char> {
        self.matchchar
    }

    pub fn labels(&self) -> Option<&str> {
        self.labels.as_deref()
    }

    /// Whether the matrix was declared interleaved
    pub fn interleave(&self) -> bool {
        self.interleave
    }

    pub fn tokens(&self) -> bool {
        self.tokens
    }

    /// Whether `c` may occur in a sequence (format symbols, gap or missing).
    pub fn is_valid_char(&self, c: char) -> bool {
        c == self.gap || c == self.missing || self.valid_chars.contains(&c)
    }

    /// Taxon labels in matrix order.
    pub fn taxlabels(&self) -> &[String] {
        &self.taxlabels
    }

    /// Taxon names as they appeared in the matrix, before disambiguation.
    pub fn unaltered_taxlabels(&self) -> &[String] {
        &self.unaltered_taxlabels
    }

    /// Taxon names listed by a `TAXLABELS` command.
    pub fn declared_taxlabels(&self) -> &[String] {
        &self.declared_taxlabels
    }

    /// Matrix, keyed by taxon label (see [taxlabels](Self::taxlabels) for the order).
    pub fn matrix(&self) -> &HashMap<String, Sequence> {
        &self.matrix
    }

    pub fn sequence(&self, taxon: &str) -> Option<&Sequence> {
        self.matrix.get(taxon)
    }

    /// Character labels by 0-based index
    pub fn charlabels(&self) -> &BTreeMap<usize, String> {
        &self.charlabels
    }

    /// State names by 0-based character index (from `CHARSTATELABELS`)
    pub fn statelabels(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.statelabels
    }

    pub fn charsets(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.charsets
    }

    pub fn taxsets(&self) -> &BTreeMap<String, Vec<String>> {
        &self.taxsets
    }

    pub fn charpartitions(&self) -> &BTreeMap<String, CharPartition> {
        &self.charpartitions
    }

    pub fn taxpartitions(&self) -> &BTreeMap<String, TaxPartition> {
        &self.taxpartitions
    }

    /// Name of the character partition defined by `CODONPOSSET`
    pub fn codonposset(&self) -> Option<&str> {
        self.codonposset.as_deref()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Active translate table (key → taxon name), if any
    pub fn translate(&self) -> Option<&BTreeMap<usize, String>> {
        self.translate.as_ref()
    }

    /// Options of the last `SET` command
    pub fn set_options(&self) -> &CommandOptions {
        &self.set_options
    }

    /// Options of `OPTIONS` commands, on top of the default `gapmode=missing`
    pub fn options(&self) -> &CommandOptions {
        &self.options
    }

    /// Options of the last `ELIMINATE` command
    pub fn eliminate(&self) -> &CommandOptions {
        &self.eliminate
    }

    /// Blocks with titles this crate does not interpret, in file order.
    pub fn unknown_blocks(&self) -> &[RawBlock] {
        &self.unknown_blocks
    }

    /// Resolves `taxon` against the taxon labels, treating `_` and space as equal.
    pub fn check_taxlabels(&self, taxon: &str) -> Option<&str> {
        let wanted = taxon.replace(' ', "_");
        self.taxlabels
            .iter()
            .find(|t| t.replace(' ', "_") == wanted)
            .map(String::as_str)
    }
}

// ============================================================================
// Crate internals
// ============================================================================
impl Document {
    /// Current `gapmode` option, lower-cased.
    pub(crate) fn gapmode(&self) -> String {
        self.options
            .value("gapmode")
            .unwrap_or(DEFAULT_GAPMODE)
            .to_ascii_lowercase()
    }

    /// Whether gaps count as missing data (`gapmode=missing`).
    pub(crate) fn gap_is_missing(&self) -> bool {
        self.gapmode() == DEFAULT_GAPMODE
    }

    /// Rebuilds the ambiguity table, valid characters and reverse table for the
    /// current datatype, missing and gap symbols.
    pub(crate) fn refresh_character_tables(&mut self) {
        let base = Alphabet::for_datatype(self.datatype);

        let mut valid: String = base.ambiguous_values().keys().collect();
        valid.push_str(base.unambiguous_letters());
        self.valid_chars = if self.respectcase {
            valid.chars().collect()
        } else {
            valid
                .chars()
                .flat_map(|c| [c.to_ascii_lowercase(), c.to_ascii_uppercase()])
                .collect()
        };
        self.rev_ambiguities = base.reverse_ambiguities();

        self.alphabet = base;
        if matches!(self.datatype, DataType::Dna | DataType::Rna) {
            if !self.alphabet.ambiguous_values().contains_key(&self.missing) {
                let expansion = format!("{}{}", self.alphabet.unambiguous_letters(), self.gap);
                self.alphabet.insert_ambiguity(self.missing, expansion);
            }
            self.alphabet.insert_ambiguity(self.gap, self.gap.to_string());
        }
    }

    /// Row of the matrix for a taxon label known to be present.
    ///
    /// # Panics
    /// Panics if taxon labels and matrix keys diverged.
    pub(crate) fn row(&self, taxon: &str) -> &Sequence {
        match self.matrix.get(taxon) {
            Some(sequence) => sequence,
            None => panic!("taxon label {taxon} has no matrix row"),
        }
    }
}
