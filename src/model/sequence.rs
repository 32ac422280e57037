//! Sequence type stored in a character matrix.

use crate::model::alphabet::DataType;
use std::fmt;

// =#========================================================================#=
// SEQUENCE
// =#========================================================================#=
/// A row of a character matrix: residues together with their [DataType].
///
/// Residues are kept exactly as read (case included); validity against a
/// format's alphabet is checked by the parser before a `Sequence` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    residues: String,
    datatype: DataType,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new<S: Into<String>>(residues: S, datatype: DataType) -> Self {
        Self { residues: residues.into(), datatype }
    }

    /// Returns the residues as string slice.
    pub fn as_str(&self) -> &str {
        &self.residues
    }

    /// Returns the datatype.
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Returns the number of residues.
    pub fn len(&self) -> usize {
        self.residues.chars().count()
    }

    /// Returns whether the sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Returns the residue at 0-based position `i`.
    pub fn residue(&self, i: usize) -> Option<char> {
        self.residues.chars().nth(i)
    }

    /// Appends residues (e.g. the next block of an interleaved matrix).
    pub fn push_str(&mut self, residues: &str) {
        self.residues.push_str(residues);
    }

    /// Returns the first residue `is_valid_char` rejects, if any.
    pub fn invalid_residue<F: Fn(char) -> bool>(&self, is_valid_char: F) -> Option<char> {
        self.residues.chars().find(|c| !is_valid_char(*c))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.residues)
    }
}

// =#========================================================================#=
// RESIDUES
// =#========================================================================#=
/// Anything that can serve as matrix row: plain strings and typed [Sequence]s.
///
/// Column operations (cropping, bootstrapping) are generic over this trait so
/// that their output has the same representation as their input.
pub trait Residues: Clone {
    /// Returns the residues as string slice.
    fn residues(&self) -> &str;

    /// Returns a row of the same representation holding `residues`.
    fn with_residues(&self, residues: String) -> Self;
}

impl Residues for String {
    fn residues(&self) -> &str {
        self
    }

    fn with_residues(&self, residues: String) -> Self {
        residues
    }
}

impl Residues for Sequence {
    fn residues(&self) -> &str {
        &self.residues
    }

    fn with_residues(&self, residues: String) -> Self {
        Sequence::new(residues, self.datatype)
    }
}
