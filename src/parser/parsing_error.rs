//! Error types for the NEXUS and Newick parsers and the document editor.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors caused by malformed NEXUS input or invalid edit requests.
//! Conditions that can only arise from a bug in this crate are not reported
//! through this channel, they panic.

use crate::parser::scanner::Scanner;
use std::error::Error;
use std::fmt;

/// Default length of context provided by errors raised from a [Scanner]
const DEFAULT_CONTEXT_LENGTH: usize = 50;


// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Kinds of format errors that can occur while reading or editing NEXUS data.
///
/// All kinds belong to one family: any of them means "this document could not
/// be parsed (or edited) as requested". The attached message carries the details.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    /// Unmatched `[` or `]`
    UnmatchedComment(String),
    /// Illegal block nesting, unmatched `END` or a missing block title
    InvalidBlockStructure(String),
    /// Command name not known inside a known block
    UnknownCommand(String),
    /// A command ran before the state it depends on was set (e.g. MATRIX before FORMAT)
    MissingPrerequisite(String),
    /// Taxon or character count does not agree with the declared dimensions
    DimensionMismatch(String),
    /// Character not allowed by the current format in a sequence
    IllegalCharacter { taxon: String, character: char, sequence: String },
    /// Set, taxon or translate identifier that cannot be resolved
    UnresolvedIdentifier(String),
    /// Malformed command, range or partition syntax
    InvalidFormatting(String),
    /// Datatype or command option that is recognized but not supported
    UnsupportedFeature(String),
    InvalidNewickString(String),
    /// Structural edit with arguments that do not fit the document
    InvalidEdit(String),
}


// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Format error with contextual information (position and surrounding text).
#[derive(Debug, Clone)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: Option<usize>,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError without any context.
    pub fn new(kind: ParsingErrorType) -> Self {
        Self { kind, position: None, context: String::new() }
    }

    /// Create a ParsingError from an error type and scanner state
    pub fn from_scanner(kind: ParsingErrorType, scanner: &Scanner) -> Self {
        Self {
            kind,
            position: Some(scanner.position()),
            context: scanner.context(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Attaches the offending text (usually a command line) to the error.
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = context.into();
        self
    }

    /// Attaches a character offset to the error.
    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Convenience constructor for UnmatchedComment
    pub fn unmatched_comment<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::UnmatchedComment(msg.into()))
    }

    /// Convenience constructor for InvalidBlockStructure
    pub fn invalid_block_structure<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::InvalidBlockStructure(msg.into()))
    }

    /// Convenience constructor for UnknownCommand
    pub fn unknown_command<S: Into<String>>(name: S) -> Self {
        Self::new(ParsingErrorType::UnknownCommand(name.into()))
    }

    /// Convenience constructor for MissingPrerequisite
    pub fn missing_prerequisite<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::MissingPrerequisite(msg.into()))
    }

    /// Convenience constructor for DimensionMismatch
    pub fn dimension_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::DimensionMismatch(msg.into()))
    }

    /// Convenience constructor for IllegalCharacter
    pub fn illegal_character(taxon: &str, character: char, sequence: &str) -> Self {
        Self::new(ParsingErrorType::IllegalCharacter {
            taxon: taxon.to_string(),
            character,
            sequence: sequence.to_string(),
        })
    }

    /// Convenience constructor for UnresolvedIdentifier
    pub fn unresolved_identifier<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::UnresolvedIdentifier(msg.into()))
    }

    /// Convenience constructor for InvalidFormatting
    pub fn invalid_formatting<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::InvalidFormatting(msg.into()))
    }

    /// Convenience constructor for UnsupportedFeature
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::UnsupportedFeature(msg.into()))
    }

    /// Convenience constructor for InvalidNewickString
    pub fn invalid_newick_string(scanner: &Scanner, msg: String) -> Self {
        Self::from_scanner(ParsingErrorType::InvalidNewickString(msg), scanner)
    }

    /// Convenience constructor for InvalidEdit
    pub fn invalid_edit<S: Into<String>>(msg: S) -> Self {
        Self::new(ParsingErrorType::InvalidEdit(msg.into()))
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred, if known
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Get the text the error was raised on (may be empty)
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Main error message
        match &self.kind {
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}")?,
            ParsingErrorType::UnmatchedComment(msg) => write!(f, "Unmatched comment - {msg}")?,
            ParsingErrorType::InvalidBlockStructure(msg) => write!(f, "Invalid block structure - {msg}")?,
            ParsingErrorType::UnknownCommand(name) => write!(f, "Unknown command: {name}")?,
            ParsingErrorType::MissingPrerequisite(msg) => write!(f, "Missing prerequisite - {msg}")?,
            ParsingErrorType::DimensionMismatch(msg) => write!(f, "Dimension mismatch - {msg}")?,
            ParsingErrorType::IllegalCharacter { taxon, character, sequence } => {
                write!(f, "Taxon {taxon}: Illegal character {character} in sequence {sequence}")?
            }
            ParsingErrorType::UnresolvedIdentifier(msg) => write!(f, "Could not resolve identifier - {msg}")?,
            ParsingErrorType::InvalidFormatting(msg) => write!(f, "Invalid formatting - {msg}")?,
            ParsingErrorType::UnsupportedFeature(msg) => write!(f, "Unsupported feature - {msg}")?,
            ParsingErrorType::InvalidNewickString(msg) => write!(f, "Invalid newick string: {msg}")?,
            ParsingErrorType::InvalidEdit(msg) => write!(f, "Invalid edit - {msg}")?,
        }

        // Additional position information
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }

        // Additional context if available
        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }

        Ok(())
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError::new(ParsingErrorType::IoError(err.to_string()))
    }
}
