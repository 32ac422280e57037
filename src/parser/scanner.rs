//! Character-by-character cursor over a single command's text.
//!
//! This module provides [Scanner], which serves two masters: the NEXUS command
//! handlers, which read their argument text word by word (NEXUS "words" follow the
//! quoting and punctuation rules of the format), and the Newick parser, which needs
//! label, comment and single-character lookahead operations.

use crate::parser::parsing_error::ParsingError;

/// Characters that always form a word of their own.
pub(crate) const PUNCTUATION: &str = "()[]{}/\\,;:=*'\"`+-<>";

/// Characters separating words.
pub(crate) const WHITESPACE: &str = " \t\n\r";

/// Characters that start a quoted word.
const QUOTES: &str = "'\"";

// =#========================================================================#=
// SCANNER
// =#========================================================================#=
/// A cursor over text with support for peeking, word extraction and label parsing.
///
/// The whole text is held in memory. All operations are non-failing except the
/// comment skipping and label parsing helpers, which report unclosed brackets.
///
/// # Example
/// ```
/// use nexalign::parser::scanner::Scanner;
///
/// let mut scanner = Scanner::new("  'Wilson''s petrel' = 1-5\\3");
/// assert_eq!(scanner.next_word(), Some("'Wilson's petrel'".to_string()));
/// assert_eq!(scanner.peek_nonwhitespace(), Some('='));
/// assert_eq!(scanner.next_nonwhitespace(), Some('='));
/// assert_eq!(scanner.next_word(), Some("1".to_string()));
/// assert_eq!(scanner.next_word(), Some("-".to_string()));
/// assert_eq!(scanner.rest(), "5\\3");
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

// ============================================================================
// Word Level API (pub)
// ============================================================================
impl Scanner {
    /// Creates a new `Scanner` positioned at the start of `text`.
    pub fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), pos: 0 }
    }

    /// Peeks at the current character without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Gets the current character and advances the position (consumes it).
    #[inline(always)]
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Returns the first non-whitespace character ahead without consuming anything.
    pub fn peek_nonwhitespace(&self) -> Option<char> {
        self.chars[self.pos..].iter().copied().find(|c| !is_whitespace(*c))
    }

    /// Skips whitespace, then consumes and returns the next character.
    pub fn next_nonwhitespace(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.next_char()
    }

    /// Consumes and returns the next NEXUS word.
    ///
    /// - Leading whitespace is skipped.
    /// - Punctuation forms a one-character word.
    /// - A quoted word runs to the matching quote and keeps its enclosing quotes;
    ///   a doubled quote inside stands for one literal quote character.
    /// - Otherwise the word runs until whitespace, punctuation or end of text.
    ///
    /// Returns `None` at end of text.
    pub fn next_word(&mut self) -> Option<String> {
        let first = self.next_nonwhitespace()?;
        let mut word = String::from(first);

        if QUOTES.contains(first) {
            while let Some(c) = self.next_char() {
                word.push(c);
                if c == first {
                    if self.peek() == Some(first) {
                        // Doubled quote: keep one, continue inside the word
                        self.next_char();
                    } else {
                        break;
                    }
                }
            }
            return Some(word);
        }

        if is_punctuation(first) {
            return Some(word);
        }

        while let Some(c) = self.peek() {
            if is_punctuation(c) || is_whitespace(c) {
                break;
            }
            word.push(c);
            self.pos += 1;
        }

        Some(word)
    }

    /// Consumes and returns the text up to (not including) the earliest of the
    /// given delimiters. The scanner is then positioned at that delimiter.
    ///
    /// Returns `None` and leaves the position unchanged if none of them occurs.
    pub fn next_until(&mut self, delimiters: &[char]) -> Option<String> {
        let offset = self.chars[self.pos..].iter().position(|c| delimiters.contains(c))?;
        let text: String = self.chars[self.pos..self.pos + offset].iter().collect();
        self.pos += offset;
        Some(text)
    }

    /// Returns the remaining, unconsumed text without consuming it.
    pub fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    /// Returns whether the end of text has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Returns the current offset (in characters).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns up to `k` characters from the current position for error context.
    pub fn context(&self, k: usize) -> String {
        self.chars[self.pos..].iter().take(k).collect()
    }
}

// ============================================================================
// Label & Comment API (pub)
// ============================================================================
impl Scanner {
    /// Skips (consumes) all consecutive whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    /// Skips (consumes) a bracketed comment if present. Comments may nest.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.peek() != Some('[') {
            return Ok(false);
        }

        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(true);
                    }
                }
                _ => {}
            }
        }

        Err(ParsingError::unmatched_comment("'[' without closing ']'").at_position(start))
    }

    /// Skips (consumes) all consecutive whitespace and bracketed comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current character matches `ch` (case-insensitive for ASCII).
    pub fn peek_is(&self, ch: char) -> bool {
        self.peek().is_some_and(|c| c.eq_ignore_ascii_case(&ch))
    }

    /// Consumes the current character if it matches `ch` (case-insensitive).
    pub fn consume_if(&mut self, ch: char) -> bool {
        if self.peek_is(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Leading whitespace and comments are skipped. Quoted labels are returned
    /// without their quotes and with doubled quotes collapsed.
    pub fn parse_label(&mut self, delimiters: &[char]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some('\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a label enclosed in single quotes, e.g. `'Wilson''s'` becomes `Wilson's`.
    ///
    /// Assumes the opening quote has not been consumed yet.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start = self.pos;
        self.next_char(); // consume opening '

        let mut label = String::new();
        while let Some(c) = self.next_char() {
            if c == '\'' {
                if self.peek() == Some('\'') {
                    label.push('\'');
                    self.next_char();
                } else {
                    return Ok(label);
                }
            } else {
                label.push(c);
            }
        }

        Err(ParsingError::invalid_formatting(format!("Unclosed quoted label starting at {start}"))
            .at_position(start))
    }

    /// Parses an unquoted label until any of the given delimiters is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[char]) -> String {
        let mut label = String::new();

        while let Some(c) = self.peek() {
            if delimiters.contains(&c) {
                break;
            }
            label.push(c);
            self.pos += 1;
        }

        label
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
fn is_whitespace(c: char) -> bool {
    WHITESPACE.contains(c)
}

fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_word_splits_punctuation() {
        let mut scanner = Scanner::new("10-20\\3 ,x");
        let words: Vec<String> = std::iter::from_fn(|| scanner.next_word()).collect();
        assert_eq!(words, vec!["10", "-", "20", "\\", "3", ",", "x"]);
    }

    #[test]
    fn test_next_word_keeps_brackets_inside_quotes() {
        let mut scanner = Scanner::new("\"a [b] c\" d");
        assert_eq!(scanner.next_word().as_deref(), Some("\"a [b] c\""));
        assert_eq!(scanner.next_word().as_deref(), Some("d"));
        assert_eq!(scanner.next_word(), None);
    }

    #[test]
    fn test_next_until_stops_at_earliest_delimiter() {
        let mut scanner = Scanner::new("&W 0.5]rest,");
        assert_eq!(scanner.next_char(), Some('&'));
        assert_eq!(scanner.next_until(&[',', ']']).as_deref(), Some("W 0.5"));
        assert_eq!(scanner.peek(), Some(']'));
        assert_eq!(scanner.next_until(&['#']), None);
        assert_eq!(scanner.peek(), Some(']'));
    }

    #[test]
    fn test_skip_nested_comment() {
        let mut scanner = Scanner::new("[a[b]c]  x");
        scanner.skip_comment_and_whitespace().unwrap();
        assert_eq!(scanner.peek(), Some('x'));

        let mut scanner = Scanner::new("[a[b]c");
        assert!(scanner.skip_comment().is_err());
    }
}
