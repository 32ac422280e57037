//! Constants for the Newick parser.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[char] = &['(', '[', ',', ':', ';', ' ', '\n', '\t', '\r', ')', ']'];

/// Default guess for number of leaves, when unknown
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 10;
