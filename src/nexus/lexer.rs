//! Lexical normalization of NEXUS text into logical command lines.
//!
//! Comments are stripped (special `[&...]` comments are kept), the text is
//! split at every `;` outside quotes and comments, and each resulting line is
//! whitespace-normalized. Only the `MATRIX` command keeps its line breaks,
//! since rows of a matrix are line-oriented.

use crate::nexus::defs::{NEXUS_HEADER, SPECIAL_COMMENTS};
use crate::parser::ParsingError;

/// Characters that start (and end) quoted text.
const QUOTES: &[char] = &['\'', '"'];

/// Command whose payload keeps its line breaks.
const MATRIX: &str = "matrix";

/// Turns raw NEXUS text into its logical command lines.
///
/// # Errors
/// Returns an error on an unmatched `]` or on a comment still open at the end of text.
///
/// # Example
/// ```
/// use nexalign::nexus::lexer::command_lines;
///
/// let lines = command_lines("#NEXUS\nbegin [a [nested] comment] data;\n tree t = [&R] (a,b);").unwrap();
/// assert_eq!(lines, vec!["begin  data", "tree t = [&R] (a,b)"]);
/// ```
pub fn command_lines(text: &str) -> Result<Vec<String>, ParsingError> {
    let lines = split_commands(text)?;
    Ok(lines.iter().filter_map(|line| normalize_line(line)).collect())
}

/// Strips comments and splits at `;`, in a single pass with one character lookahead.
fn split_commands(text: &str) -> Result<Vec<String>, ParsingError> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut current = String::new();

    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut special = false;
    let mut comment_start = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '[' if depth == 0 && !special && chars.get(i + 1).is_some_and(|n| SPECIAL_COMMENTS.contains(n)) => {
                special = true;
                comment_start = i;
                current.push(c);
            }
            '[' if special => current.push(c),
            '[' => {
                if depth == 0 {
                    comment_start = i;
                }
                depth += 1;
            }
            ']' if special => {
                special = false;
                current.push(c);
            }
            ']' => {
                if depth == 0 {
                    return Err(ParsingError::unmatched_comment("']' without opening '['").at_position(i));
                }
                depth -= 1;
            }
            _ if depth > 0 => {}
            _ if special => current.push(c),
            _ if QUOTES.contains(&c) => {
                quote = Some(c);
                current.push(c);
            }
            ';' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if depth > 0 || special {
        return Err(ParsingError::unmatched_comment("'[' without closing ']'").at_position(comment_start));
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

/// Normalizes line breaks, strips a leading `#NEXUS` and joins physical lines,
/// except for `MATRIX`. Returns `None` for blank lines.
fn normalize_line(line: &str) -> Option<String> {
    let line = line.replace("\r\n", "\n").replace('\r', "\n");
    let mut line = line.trim();

    while line.len() >= NEXUS_HEADER.len()
        && line.is_char_boundary(NEXUS_HEADER.len())
        && line[..NEXUS_HEADER.len()].eq_ignore_ascii_case(NEXUS_HEADER)
    {
        line = line[NEXUS_HEADER.len()..].trim();
    }

    if line.is_empty() {
        return None;
    }

    let first_word = line.split_whitespace().next().unwrap_or_default();
    if first_word.eq_ignore_ascii_case(MATRIX) {
        Some(line.to_string())
    } else {
        Some(line.replace('\n', " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_comment_is_kept_and_ordinary_dropped() {
        let lines = command_lines("tree t = [&W 2] [plain [nested]] (a,b);").unwrap();
        assert_eq!(lines, vec!["tree t = [&W 2]  (a,b)"]);
    }

    #[test]
    fn test_special_comment_closes_at_first_bracket() {
        assert!(command_lines("tree t = [&W [1]] (a,b);").is_err());
    }

    #[test]
    fn test_semicolon_inside_quotes_and_special_comments() {
        let lines = command_lines("taxlabels 'a;b' c; tree x = [&k=1;2] (a,b);").unwrap();
        assert_eq!(lines, vec!["taxlabels 'a;b' c", "tree x = [&k=1;2] (a,b)"]);
    }

    #[test]
    fn test_matrix_keeps_newlines() {
        let lines = command_lines("dimensions\nntax=2;\nmatrix\r\nA ACGT\r\nB ACGT\n;").unwrap();
        assert_eq!(lines, vec!["dimensions ntax=2", "matrix\nA ACGT\nB ACGT"]);
    }

    #[test]
    fn test_repeated_header_is_stripped() {
        let lines = command_lines("#NEXUS begin data; end; #nexus\nbegin trees; end;").unwrap();
        assert_eq!(lines, vec!["begin data", "end", "begin trees", "end"]);
    }
}
