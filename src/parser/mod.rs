//! Low-level machinery shared by the NEXUS and Newick parsers.
//!
//! This module provides the character [Scanner](scanner::Scanner) used to read
//! command arguments and tree strings, the [ParsingError] family, and small
//! utilities for names and numbers.

pub mod parsing_error;
pub mod scanner;
pub mod utils;

pub use parsing_error::{ParsingError, ParsingErrorType};
