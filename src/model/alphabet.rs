//! Datatypes and IUPAC ambiguity tables.
//!
//! A [DataType] names the kind of characters in a matrix; the corresponding
//! [Alphabet] knows the unambiguous letters and the ambiguity codes with their
//! expansions.

use crate::parser::ParsingError;
use std::collections::{BTreeMap, HashMap};

/// Unambiguous DNA bases.
pub const UNAMBIGUOUS_DNA_LETTERS: &str = "GATC";
/// Unambiguous RNA bases.
pub const UNAMBIGUOUS_RNA_LETTERS: &str = "GAUC";
/// The twenty standard amino acids.
pub const PROTEIN_LETTERS: &str = "ACDEFGHIKLMNPQRSTVWY";
/// IUPAC ambiguous DNA alphabet (used as symbol list for `datatype=dna`).
pub const IUPAC_DNA_LETTERS: &str = "GATCRYWSMKHBVDN";
/// IUPAC ambiguous RNA alphabet (used as symbol list for `datatype=rna`).
pub const IUPAC_RNA_LETTERS: &str = "GAUCRYWSMKHBVDN";

const DNA_AMBIGUITIES: &[(char, &str)] = &[
    ('A', "A"), ('C', "C"), ('G', "G"), ('T', "T"),
    ('M', "AC"), ('R', "AG"), ('W', "AT"), ('S', "CG"), ('Y', "CT"), ('K', "GT"),
    ('V', "ACG"), ('H', "ACT"), ('D', "AGT"), ('B', "CGT"),
    ('X', "GATC"), ('N', "GATC"),
];

const RNA_AMBIGUITIES: &[(char, &str)] = &[
    ('A', "A"), ('C', "C"), ('G', "G"), ('U', "U"),
    ('M', "AC"), ('R', "AG"), ('W', "AU"), ('S', "CG"), ('Y', "CU"), ('K', "GU"),
    ('V', "ACG"), ('H', "ACU"), ('D', "AGU"), ('B', "CGU"),
    ('X', "GAUC"), ('N', "GAUC"),
];

const PROTEIN_AMBIGUITIES: &[(char, &str)] = &[('B', "DN"), ('Z', "EQ"), ('X', PROTEIN_LETTERS)];

/// Code excluded from the reverse table, it duplicates `N` (or means "anything").
const ANY_CODE: char = 'X';

// =#========================================================================#=
// DATATYPE
// =#========================================================================#=
/// Kind of characters stored in a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Dna,
    Rna,
    Protein,
    /// Result of combining matrices of different datatypes
    Indeterminate,
}

impl DataType {
    /// Parse a `FORMAT DATATYPE=` value (case-insensitive).
    ///
    /// `nucleotide` is an alias of `dna`; `standard` and everything else are rejected.
    pub fn from_name(name: &str) -> Result<Self, ParsingError> {
        match name.to_ascii_lowercase().as_str() {
            "dna" | "nucleotide" => Ok(DataType::Dna),
            "rna" => Ok(DataType::Rna),
            "protein" => Ok(DataType::Protein),
            "standard" => Err(ParsingError::unsupported("Datatype standard is not supported")),
            other => Err(ParsingError::unsupported(format!("Unsupported datatype: {other}"))),
        }
    }

    /// Name as written in a `FORMAT` command, `None` if indeterminate.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            DataType::Dna => Some("dna"),
            DataType::Rna => Some("rna"),
            DataType::Protein => Some("protein"),
            DataType::Indeterminate => None,
        }
    }
}

// =#========================================================================#=
// ALPHABET
// =#========================================================================#=
/// Ambiguity table and letters of a [DataType].
#[derive(Debug, Clone, PartialEq)]
pub struct Alphabet {
    ambiguous_values: BTreeMap<char, String>,
    unambiguous_letters: String,
    letters: Option<&'static str>,
}

impl Alphabet {
    /// Builds the IUPAC tables for the given datatype.
    pub fn for_datatype(datatype: DataType) -> Self {
        let (table, unambiguous, letters): (&[(char, &str)], String, Option<&'static str>) = match datatype {
            DataType::Dna => (DNA_AMBIGUITIES, UNAMBIGUOUS_DNA_LETTERS.to_string(), Some(IUPAC_DNA_LETTERS)),
            DataType::Rna => (RNA_AMBIGUITIES, UNAMBIGUOUS_RNA_LETTERS.to_string(), Some(IUPAC_RNA_LETTERS)),
            DataType::Protein => (PROTEIN_AMBIGUITIES, format!("{PROTEIN_LETTERS}*"), None),
            DataType::Indeterminate => (&[], String::new(), None),
        };

        Alphabet {
            ambiguous_values: table.iter().map(|(code, exp)| (*code, exp.to_string())).collect(),
            unambiguous_letters: unambiguous,
            letters,
        }
    }

    /// Ambiguity code → expansion.
    pub fn ambiguous_values(&self) -> &BTreeMap<char, String> {
        &self.ambiguous_values
    }

    /// Registers an extra code, e.g. the missing symbol expanding to every state.
    pub(crate) fn insert_ambiguity(&mut self, code: char, expansion: String) {
        self.ambiguous_values.insert(code, expansion);
    }

    /// Letters that stand for exactly one state.
    pub fn unambiguous_letters(&self) -> &str {
        &self.unambiguous_letters
    }

    /// Full symbol alphabet for nucleotide datatypes.
    pub fn letters(&self) -> Option<&'static str> {
        self.letters
    }

    /// Expansion of `code` (upper-cased), or the code itself if it is not ambiguous.
    pub fn expand(&self, code: char) -> String {
        let upper = code.to_ascii_uppercase();
        self.ambiguous_values
            .get(&upper)
            .cloned()
            .unwrap_or_else(|| upper.to_string())
    }

    /// Reverse table: sorted expansion → ambiguity code. `X` is left out.
    pub fn reverse_ambiguities(&self) -> HashMap<String, char> {
        self.ambiguous_values
            .iter()
            .filter(|(code, _)| !code.eq_ignore_ascii_case(&ANY_CODE))
            .map(|(code, expansion)| (sorted_chars(expansion), *code))
            .collect()
    }
}

/// Returns the characters of `s` in ascending order.
pub(crate) fn sorted_chars(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_table_is_keyed_by_sorted_expansion() {
        let rev = Alphabet::for_datatype(DataType::Dna).reverse_ambiguities();
        assert_eq!(rev.get("ACG"), Some(&'V'));
        assert_eq!(rev.get("ACGT"), Some(&'N'));
        assert_eq!(rev.get("A"), Some(&'A'));
    }

    #[test]
    fn test_protein_table() {
        let alphabet = Alphabet::for_datatype(DataType::Protein);
        assert!(alphabet.unambiguous_letters().ends_with('*'));
        assert_eq!(alphabet.expand('b'), "DN");
        assert_eq!(alphabet.expand('K'), "K");
        assert_eq!(alphabet.reverse_ambiguities().len(), 2);
    }

    #[test]
    fn test_standard_datatype_is_rejected() {
        assert!(DataType::from_name("standard").is_err());
        assert!(DataType::from_name("morphology").is_err());
        assert_eq!(DataType::from_name("Nucleotide").unwrap(), DataType::Dna);
    }
}
