//! Utility functions for NEXUS names and numbers.
//!
//! This module provides functions for safely writing names (quoting them when
//! they contain whitespace or punctuation), stripping quotes from parsed words,
//! disambiguating colliding taxon names, and evaluating the small integer
//! expressions allowed in `DIMENSIONS`.

use crate::parser::parsing_error::ParsingError;
use crate::parser::scanner::{PUNCTUATION, WHITESPACE};

/// Suffix appended to colliding names
const COPY_SUFFIX: &str = "copy";

/// Makes a name safe for NEXUS output.
///
/// Internal single quotes are doubled; if the name then contains whitespace
/// or punctuation, it is wrapped in single quotes. In `mrbayes` mode, spaces
/// become underscores and every character other than ASCII letters, digits and
/// underscores is dropped instead.
///
/// # Examples
/// ```
/// # use nexalign::parser::utils::safe_name;
/// assert_eq!(safe_name("Pukeko", false), "Pukeko");
/// assert_eq!(safe_name("Australasian Swamphen", false), "'Australasian Swamphen'");
/// assert_eq!(safe_name("Baillon's Crake", false), "'Baillon''s Crake'");
/// assert_eq!(safe_name("Sp.-1", false), "'Sp.-1'");
/// assert_eq!(safe_name("Baillon's Crake (marsh)", true), "Baillons_Crake_marsh");
/// ```
pub fn safe_name(name: &str, mrbayes: bool) -> String {
    if mrbayes {
        return name
            .replace(' ', "_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
    }

    let escaped = name.replace('\'', "''");
    if escaped.chars().any(|c| WHITESPACE.contains(c) || PUNCTUATION.contains(c)) {
        format!("'{escaped}'")
    } else {
        escaped
    }
}

/// Removes enclosing (single or double) quotes, repeatedly.
///
/// # Examples
/// ```
/// # use nexalign::parser::utils::quote_strip;
/// assert_eq!(quote_strip("'Fox'"), "Fox");
/// assert_eq!(quote_strip("\"'Red Fox'\""), "Red Fox");
/// assert_eq!(quote_strip("Fox"), "Fox");
/// ```
pub fn quote_strip(word: &str) -> &str {
    let mut word = word;
    while word.len() >= 2
        && ((word.starts_with('\'') && word.ends_with('\''))
            || (word.starts_with('"') && word.ends_with('"')))
    {
        word = &word[1..word.len() - 1];
    }
    word
}

/// Returns `label`, or a `.copy`, `.copy1`, `.copy2`, ... variant of it,
/// such that `exists` does not report it as taken.
///
/// # Examples
/// ```
/// # use nexalign::parser::utils::unique_label;
/// let taken = ["Fox".to_string(), "Fox.copy".to_string()];
/// assert_eq!(unique_label("Wolf", |l| taken.iter().any(|t| t == l)), "Wolf");
/// assert_eq!(unique_label("Fox", |l| taken.iter().any(|t| t == l)), "Fox.copy1");
/// ```
pub fn unique_label<F: Fn(&str) -> bool>(label: &str, exists: F) -> String {
    let mut label = label.to_string();

    while exists(&label) {
        label = next_copy_label(&label);
    }

    label
}

fn next_copy_label(label: &str) -> String {
    if let Some((base, last)) = label.rsplit_once('.') {
        if let Some(counter) = last.strip_prefix(COPY_SUFFIX) {
            if counter.is_empty() || counter.chars().all(|c| c.is_ascii_digit()) {
                let n: usize = counter.parse().unwrap_or(0);
                return format!("{base}.{COPY_SUFFIX}{}", n + 1);
            }
        }
    }
    format!("{label}.{COPY_SUFFIX}")
}

/// Evaluates a non-negative integer expression such as `12`, `3*4` or `(10+2)/2`.
///
/// # Examples
/// ```
/// # use nexalign::parser::utils::eval_count;
/// assert_eq!(eval_count("12").unwrap(), 12);
/// assert_eq!(eval_count("2*(3+4)").unwrap(), 14);
/// assert!(eval_count("2*").is_err());
/// assert!(eval_count("2-5").is_err());
/// assert!(eval_count("-(0-9223372036854775807-1)").is_err());
/// ```
pub fn eval_count(text: &str) -> Result<usize, ParsingError> {
    let tokens: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut evaluator = Evaluator { tokens: &tokens, pos: 0 };

    let value = evaluator.expression();
    match value {
        Some(v) if evaluator.pos == tokens.len() && v >= 0 => Ok(v as usize),
        _ => Err(ParsingError::invalid_formatting(format!("Not a valid count: {text}"))),
    }
}

/// Recursive descent over `+ - * / ( )` and decimal integers.
struct Evaluator<'a> {
    tokens: &'a [char],
    pos: usize,
}

impl Evaluator<'_> {
    fn expression(&mut self) -> Option<i64> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.tokens.get(self.pos).copied() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value.checked_add(rhs)? } else { value.checked_sub(rhs)? };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<i64> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.tokens.get(self.pos).copied() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == '*' { value.checked_mul(rhs)? } else { value.checked_div(rhs)? };
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<i64> {
        match self.tokens.get(self.pos).copied()? {
            '(' => {
                self.pos += 1;
                let value = self.expression()?;
                if self.tokens.get(self.pos) != Some(&')') {
                    return None;
                }
                self.pos += 1;
                Some(value)
            }
            '+' => {
                self.pos += 1;
                self.factor()
            }
            '-' => {
                self.pos += 1;
                self.factor()?.checked_neg()
            }
            _ => {
                let start = self.pos;
                while self.tokens.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits: String = self.tokens[start..self.pos].iter().collect();
                digits.parse().ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_count_overflow_is_an_error() {
        assert_eq!(eval_count("-(-3)").unwrap(), 3);
        assert!(eval_count("-(0-9223372036854775807-1)").is_err());
        assert!(eval_count("9223372036854775807+1").is_err());
        assert!(eval_count("99999999999999999999").is_err());
    }
}
