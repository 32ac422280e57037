//! Resolution of character and taxon set specifications.
//!
//! A set specification such as `coding = 1-10\3 intron 'Red fox'` is resolved
//! against the document: numbers are 1-based positions, names are character
//! labels, taxon labels or earlier defined sets, and `a - b [\ step]` denotes a
//! range. [compact_for_nexus] is the inverse direction, producing the shortest
//! range notation for a list of indices.

use crate::nexus::document::{CharPartition, Document, TaxPartition};
use crate::parser::ParsingError;
use crate::parser::scanner::Scanner;
use crate::parser::utils::quote_strip;

/// Separator of set name and elements in `CHARSET`/`TAXSET`
pub(crate) const SET_SEPARATOR: char = '=';

/// Separator of member name and elements inside partitions
pub(crate) const MEMBER_SEPARATOR: char = ':';

/// An identifier resolved to one element, or to all elements of a named set.
#[derive(Debug, Clone, PartialEq)]
enum Resolved<T> {
    Single(T),
    List(Vec<T>),
}

// ============================================================================
// Resolution (pub)
// ============================================================================
impl Document {
    /// Resolves a list of character identifiers (without `name =`) into sorted,
    /// de-duplicated 0-based indices.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::Document;
    ///
    /// let document: Document = "begin data; dimensions ntax=1 nchar=20; end;".parse().unwrap();
    /// assert_eq!(document.resolve_charset("2-4 12-18\\3 3").unwrap(), vec![1, 2, 3, 11, 14, 17]);
    /// ```
    pub fn resolve_charset(&self, text: &str) -> Result<Vec<usize>, ParsingError> {
        let mut scanner = Scanner::new(text);
        let indices = self.parse_char_list(&mut scanner).map_err(|e| e.with_context(text))?;
        Ok(make_unique(indices))
    }

    /// Resolves a list of taxon identifiers (without `name =`) into sorted,
    /// de-duplicated taxon labels.
    pub fn resolve_taxset(&self, text: &str) -> Result<Vec<String>, ParsingError> {
        let mut scanner = Scanner::new(text);
        let taxa = self.parse_taxon_list(&mut scanner).map_err(|e| e.with_context(text))?;
        Ok(make_unique(taxa))
    }
}

// ============================================================================
// Set commands (crate)
// ============================================================================
impl Document {
    /// Parses `name = elements` of a `CHARSET` (or `name : elements` of a member).
    pub(crate) fn char_set_definition(&self, text: &str, separator: char) -> Result<(String, Vec<usize>), ParsingError> {
        let mut scanner = Scanner::new(text);
        let name = name_n_vector(&mut scanner, separator)?;
        let indices = self.parse_char_list(&mut scanner)?;
        Ok((name, make_unique(indices)))
    }

    /// Parses `name = elements` of a `TAXSET` (or `name : elements` of a member).
    pub(crate) fn tax_set_definition(&self, text: &str, separator: char) -> Result<(String, Vec<String>), ParsingError> {
        let mut scanner = Scanner::new(text);
        let name = name_n_vector(&mut scanner, separator)?;
        let taxa = self.parse_taxon_list(&mut scanner)?;
        Ok((name, make_unique(taxa)))
    }

    /// Parses `name = member: elements, member: elements, ...` of a `CHARPARTITION`.
    pub(crate) fn char_partition_definition(&self, text: &str) -> Result<(String, CharPartition), ParsingError> {
        let mut scanner = Scanner::new(text);
        let name = name_n_vector(&mut scanner, SET_SEPARATOR)?;

        let mut partition = CharPartition::new();
        for member in split_members(&scanner.rest()) {
            let (member_name, indices) = self.char_set_definition(member, MEMBER_SEPARATOR)?;
            partition.insert(member_name, indices);
        }
        Ok((name, partition))
    }

    /// Parses `name = member: elements, member: elements, ...` of a `TAXPARTITION`.
    pub(crate) fn tax_partition_definition(&self, text: &str) -> Result<(String, TaxPartition), ParsingError> {
        let mut scanner = Scanner::new(text);
        let name = name_n_vector(&mut scanner, SET_SEPARATOR)?;

        let mut partition = TaxPartition::new();
        for member in split_members(&scanner.rest()) {
            let (member_name, taxa) = self.tax_set_definition(member, MEMBER_SEPARATOR)?;
            partition.insert(member_name, taxa);
        }
        Ok((name, partition))
    }
}

// ============================================================================
// Lists & Identifiers (private)
// ============================================================================
impl Document {
    /// Parses whitespace separated character identifiers and ranges `a - b [\ step]`.
    fn parse_char_list(&self, scanner: &mut Scanner) -> Result<Vec<usize>, ParsingError> {
        let mut indices = Vec::new();

        while let Some(identifier) = scanner.next_word() {
            let start = self.resolve_char(&identifier)?;

            if scanner.peek_nonwhitespace() != Some('-') {
                match start {
                    Resolved::Single(index) => indices.push(index),
                    Resolved::List(list) => indices.extend(list),
                }
                continue;
            }

            scanner.next_nonwhitespace();
            let end_identifier = scanner
                .next_word()
                .ok_or_else(|| ParsingError::invalid_formatting(format!("Range from {identifier} without end")))?;
            let end = self.resolve_char(&end_identifier)?;

            let (Resolved::Single(start), Resolved::Single(end)) = (start, end) else {
                return Err(ParsingError::invalid_formatting(format!(
                    "Name of character sets not allowed in range definition: {identifier}"
                )));
            };

            let mut step = 1;
            if scanner.peek_nonwhitespace() == Some('\\') {
                scanner.next_nonwhitespace();
                let step_word = scanner.next_word().unwrap_or_default();
                step = step_word
                    .parse::<usize>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| ParsingError::invalid_formatting(format!("Illegal range step: {step_word}")))?;
            }

            if start <= end {
                indices.extend((start..=end).step_by(step));
            }
        }

        Ok(indices)
    }

    /// Parses whitespace separated taxon identifiers and ranges `a - b`.
    ///
    /// A range takes all taxa between the two positions of the taxon labels.
    fn parse_taxon_list(&self, scanner: &mut Scanner) -> Result<Vec<String>, ParsingError> {
        let mut taxa = Vec::new();

        while let Some(identifier) = scanner.next_word() {
            let start = self.resolve_taxon(&identifier)?;

            if scanner.peek_nonwhitespace() != Some('-') {
                match start {
                    Resolved::Single(taxon) => taxa.push(taxon),
                    Resolved::List(list) => taxa.extend(list),
                }
                continue;
            }

            scanner.next_nonwhitespace();
            let end_identifier = scanner
                .next_word()
                .ok_or_else(|| ParsingError::invalid_formatting(format!("Range from {identifier} without end")))?;
            let end = self.resolve_taxon(&end_identifier)?;

            let (Resolved::Single(start), Resolved::Single(end)) = (start, end) else {
                return Err(ParsingError::invalid_formatting(format!(
                    "Name of taxon sets not allowed in range definition: {identifier}"
                )));
            };

            let position = |taxon: &str| self.taxlabels.iter().position(|t| t == taxon);
            if let (Some(from), Some(to)) = (position(&start), position(&end)) {
                if from <= to {
                    taxa.extend(self.taxlabels[from..=to].iter().cloned());
                }
            }
        }

        Ok(taxa)
    }

    /// Resolves a character identifier: a 1-based number, a character label
    /// (first match), or the name of a character set.
    fn resolve_char(&self, identifier: &str) -> Result<Resolved<usize>, ParsingError> {
        let identifier = quote_strip(identifier);

        if let Ok(n) = identifier.parse::<usize>() {
            return if (1..=self.nchar).contains(&n) {
                Ok(Resolved::Single(n - 1))
            } else {
                Err(ParsingError::unresolved_identifier(format!(
                    "Illegal character identifier: {n} not in 1..={}",
                    self.nchar
                )))
            };
        }

        if let Some((&index, _)) = self.charlabels.iter().find(|(_, label)| *label == identifier) {
            return Ok(Resolved::Single(index));
        }
        if let Some(set) = self.charsets.get(identifier) {
            return Ok(Resolved::List(set.clone()));
        }

        Err(ParsingError::unresolved_identifier(format!("Unknown character identifier: {identifier}")))
    }

    /// Resolves a taxon identifier: a 1-based number, a taxon label
    /// (underscores and spaces are equal), or the name of a taxon set.
    fn resolve_taxon(&self, identifier: &str) -> Result<Resolved<String>, ParsingError> {
        let identifier = quote_strip(identifier);

        if let Ok(n) = identifier.parse::<usize>() {
            return match self.taxlabels.get(n.wrapping_sub(1)) {
                Some(taxon) if n <= self.ntax => Ok(Resolved::Single(taxon.clone())),
                _ => Err(ParsingError::unresolved_identifier(format!(
                    "Illegal taxon identifier: {n} not in 1..={}",
                    self.ntax
                ))),
            };
        }

        if let Some(taxon) = self.check_taxlabels(identifier) {
            return Ok(Resolved::Single(taxon.to_string()));
        }
        if let Some(set) = self.taxsets.get(identifier) {
            return Ok(Resolved::List(set.clone()));
        }

        Err(ParsingError::unresolved_identifier(format!("Unknown taxon identifier: {identifier}")))
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
/// Reads the set name: `[*] name [(standard)] <separator>`.
///
/// The leading `*` (default set marker) is ignored, the `VECTOR` format is
/// not supported.
fn name_n_vector(scanner: &mut Scanner, separator: char) -> Result<String, ParsingError> {
    let text = scanner.rest();
    let formatting_error = || ParsingError::invalid_formatting("Set without name or separator").with_context(&text);

    let mut name = scanner.next_word();
    if name.as_deref() == Some("*") {
        name = scanner.next_word();
    }
    let name = name.ok_or_else(formatting_error)?;
    let name = quote_strip(&name).to_string();
    if name.is_empty() {
        return Err(formatting_error());
    }

    if scanner.peek_nonwhitespace() == Some('(') {
        scanner.next_nonwhitespace();
        let qualifier = scanner.next_word().unwrap_or_default().to_ascii_lowercase();
        if scanner.next_nonwhitespace() != Some(')') {
            return Err(formatting_error());
        }
        match qualifier.as_str() {
            "standard" => {}
            "vector" => return Err(ParsingError::unsupported("VECTOR format").with_context(&text)),
            other => {
                return Err(ParsingError::invalid_formatting(format!("Unknown qualifier {other}")).with_context(&text));
            }
        }
    }

    if scanner.next_nonwhitespace() != Some(separator) {
        return Err(formatting_error());
    }

    Ok(name)
}

/// Splits partition members at commas outside quotes.
fn split_members(text: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (_, Some(open)) if c == open => quote = None,
            (',', None) => {
                members.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    members.push(&text[start..]);

    members
}

/// Sorts and de-duplicates.
pub(crate) fn make_unique<T: Ord>(mut list: Vec<T>) -> Vec<T> {
    list.sort();
    list.dedup();
    list
}

// =#========================================================================#=
// COMPACTION
// =#========================================================================#=
/// Writes 0-based indices in shortest 1-based NEXUS range notation.
///
/// Runs of constant step are merged into `a-b` (step 1) or `a-b\step`; the
/// step of a run is fixed by its first two elements, if a third continues it.
///
/// # Example
/// ```
/// use nexalign::nexus::sets::compact_for_nexus;
///
/// assert_eq!(compact_for_nexus(&[1, 2, 3, 5, 6, 7, 8, 11, 14, 17]), "2-4 6-9 12-18\\3");
/// assert_eq!(compact_for_nexus(&[0, 4]), "1 5");
/// assert_eq!(compact_for_nexus(&[]), "");
/// ```
pub fn compact_for_nexus(indices: &[usize]) -> String {
    let list = make_unique(indices.to_vec());
    let mut parts = Vec::new();

    let mut pos = 0;
    while pos < list.len() {
        let first = list[pos];
        let mut step = 1;
        let mut len = 1;

        while pos + len < list.len() {
            let x = list[pos + len];
            if x == first + len * step {
                len += 1;
            } else if len == 1 && pos + 2 < list.len() && list[pos + 2] - x == x - first {
                step = x - first;
                len += 1;
            } else {
                break;
            }
        }

        let last = list[pos + len - 1];
        parts.push(match (len, step) {
            (1, _) => format!("{}", first + 1),
            (_, 1) => format!("{}-{}", first + 1, last + 1),
            _ => format!("{}-{}\\{}", first + 1, last + 1, step),
        });
        pos += len;
    }

    parts.join(" ")
}
