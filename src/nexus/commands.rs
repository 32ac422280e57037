//! Command handlers of the known blocks.
//!
//! Each [Command] has exactly one handler, run in file order against the
//! [Document]. Handlers may depend on state set by earlier commands; in
//! particular `MATRIX` requires `FORMAT` and `DIMENSIONS` to have been seen.

use crate::model::alphabet::{DataType, sorted_chars};
use crate::model::{Sequence, TreeMetadata};
use crate::newick::NewickParser;
use crate::nexus::block::{Command, CommandLine, CommandOptions, Payload};
use crate::nexus::document::Document;
use crate::nexus::sets::SET_SEPARATOR;
use crate::parser::ParsingError;
use crate::parser::scanner::Scanner;
use crate::parser::utils::{eval_count, quote_strip, unique_label};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Dispatch (crate)
// ============================================================================
impl Document {
    /// Splits a command line and runs its handler.
    pub(crate) fn dispatch(&mut self, line: &str) -> Result<(), ParsingError> {
        let command_line = CommandLine::parse(line)?;
        log::trace!("dispatching {:?}", command_line.command);

        let context = || {
            let mut context: String = line.chars().take(80).collect();
            if context.len() < line.len() {
                context.push_str("...");
            }
            context
        };

        let result = match (&command_line.command, &command_line.payload) {
            (Command::Dimensions, Payload::Options(options)) => self.dimensions(options),
            (Command::Format, Payload::Options(options)) => self.format(options),
            (Command::Set, Payload::Options(options)) => {
                self.set_options = options.clone();
                Ok(())
            }
            (Command::Options, Payload::Options(options)) => {
                self.options.merge(options);
                Ok(())
            }
            (Command::Eliminate, Payload::Options(options)) => {
                self.eliminate = options.clone();
                Ok(())
            }
            (Command::Matrix, Payload::Raw(text)) => self.matrix_command(text),
            (Command::TaxLabels, Payload::Raw(text)) => self.taxlabels_command(text),
            (Command::CharLabels, Payload::Raw(text)) => self.charlabels_command(text, false),
            (Command::CharStateLabels, Payload::Raw(text)) => self.charlabels_command(text, true),
            (Command::Translate, Payload::Raw(text)) => self.translate_command(text),
            (Command::Tree | Command::UTree, Payload::Raw(text)) => self.tree_command(text),
            (Command::CharSet, Payload::Raw(text)) => {
                let (name, indices) = self.char_set_definition(text, SET_SEPARATOR)?;
                self.charsets.insert(name, indices);
                Ok(())
            }
            (Command::TaxSet, Payload::Raw(text)) => {
                let (name, taxa) = self.tax_set_definition(text, SET_SEPARATOR)?;
                self.taxsets.insert(name, taxa);
                Ok(())
            }
            (Command::CharPartition, Payload::Raw(text)) => {
                let (name, partition) = self.char_partition_definition(text)?;
                self.charpartitions.insert(name, partition);
                Ok(())
            }
            (Command::TaxPartition, Payload::Raw(text)) => {
                let (name, partition) = self.tax_partition_definition(text)?;
                self.taxpartitions.insert(name, partition);
                Ok(())
            }
            (Command::CodonPosSet, Payload::Raw(text)) => {
                let (name, partition) = self.char_partition_definition(text)?;
                self.charpartitions.insert(name.clone(), partition);
                self.codonposset = Some(name);
                Ok(())
            }
            (
                Command::Title
                | Command::Link
                | Command::StateLabels
                | Command::CodeSet
                | Command::StateSet
                | Command::ChangeSet
                | Command::TreeSet
                | Command::TreePartition,
                _,
            ) => {
                log::debug!("ignoring command {:?}", command_line.command);
                Ok(())
            }
            (Command::Unknown(name), _) => Err(ParsingError::unknown_command(name.clone())),
            (command, _) => unreachable!("payload kind does not match command {command:?}"),
        };

        result.map_err(|e| if e.context().is_empty() { e.with_context(context()) } else { e })
    }
}

// ============================================================================
// DIMENSIONS & FORMAT (private)
// ============================================================================
impl Document {
    /// `DIMENSIONS [NTAX=n] [NCHAR=n]`
    fn dimensions(&mut self, options: &CommandOptions) -> Result<(), ParsingError> {
        if let Some(ntax) = options.value("ntax") {
            self.ntax = eval_count(ntax)?;
        }
        if let Some(nchar) = options.value("nchar") {
            self.nchar = eval_count(nchar)?;
        }
        self.has_dimensions = true;
        Ok(())
    }

    /// `FORMAT [DATATYPE=..] [RESPECTCASE] [SYMBOLS=..] [MISSING=c] [GAP=c] [MATCHCHAR=c] ...`
    fn format(&mut self, options: &CommandOptions) -> Result<(), ParsingError> {
        if options.contains("respectcase") {
            self.respectcase = true;
        }

        if let Some(symbols) = options.value("symbols") {
            let mut symbols = quote_strip(symbols).replace(' ', "");
            if !self.respectcase {
                symbols = format!("{}{}", symbols.to_lowercase(), symbols.to_uppercase());
            }
            let mut symbols: Vec<char> = symbols.chars().collect();
            symbols.sort_unstable();
            symbols.dedup();
            self.symbols = Some(symbols.into_iter().collect());
        }

        if let Some(datatype) = options.value("datatype") {
            self.datatype = DataType::from_name(datatype)?;
        }

        if let Some(missing) = options.value("missing").and_then(first_char) {
            self.missing = missing;
        }
        if let Some(gap) = options.value("gap").and_then(first_char) {
            self.gap = gap;
        }
        if let Some(equate) = options.value("equate") {
            self.equate = Some(equate.to_string());
        }
        if let Some(matchchar) = options.value("matchchar").and_then(first_char) {
            self.matchchar = Some(matchchar);
        }
        if let Some(labels) = options.value("labels") {
            self.labels = Some(labels.to_string());
        }
        if options.contains("transpose") {
            return Err(ParsingError::unsupported("TRANSPOSE"));
        }
        if let Some(interleave) = options.get("interleave") {
            self.interleave = match interleave {
                None => true,
                Some(value) => value.eq_ignore_ascii_case("yes"),
            };
        }
        if options.contains("tokens") {
            self.tokens = true;
        }
        if options.contains("notokens") {
            self.tokens = false;
        }

        self.refresh_character_tables();
        if let Some(letters) = self.alphabet.letters() {
            self.symbols = Some(letters.to_string());
        }

        self.has_format = true;
        Ok(())
    }
}

fn first_char(value: &str) -> Option<char> {
    quote_strip(value).chars().next()
}

// ============================================================================
// MATRIX (private)
// ============================================================================
/// Row of a non-interleaved matrix, possibly spread over several lines.
///
/// A row is `pending` until it holds at least `nchar` characters, then it
/// moves to `complete` and waits to be taken.
#[derive(Debug, Default)]
struct RowAccumulator {
    pending: Option<(String, String)>,
    complete: Option<(String, String)>,
}

impl RowAccumulator {
    /// Feeds one physical line; it starts a new row unless one is pending.
    fn feed(&mut self, line: &str, nchar: usize) {
        let row = match self.pending.take() {
            Some((name, mut residues)) => {
                residues.extend(line.split_whitespace());
                (name, residues)
            }
            None => split_row(line),
        };

        if effective_len(&row.1) >= nchar {
            self.complete = Some(row);
        } else {
            self.pending = Some(row);
        }
    }

    /// Takes the row completed by the last line, if any.
    fn take_complete(&mut self) -> Option<(String, String)> {
        self.complete.take()
    }

    /// Flushes an unfinished last row; its length check happens later.
    fn finish(self) -> Option<(String, String)> {
        self.complete.or(self.pending)
    }
}

impl Document {
    /// `MATRIX` followed by one row per taxon (or per taxon and block, if interleaved).
    fn matrix_command(&mut self, text: &str) -> Result<(), ParsingError> {
        if !self.has_format {
            return Err(ParsingError::missing_prerequisite("FORMAT must be specified before MATRIX"));
        }
        if !self.has_dimensions || self.ntax == 0 || self.nchar == 0 {
            return Err(ParsingError::missing_prerequisite("Dimensions must be specified before MATRIX"));
        }

        self.matrix = HashMap::new();
        self.taxlabels.clear();
        self.unaltered_taxlabels.clear();

        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let rows = if self.interleave {
            interleaved_rows(&lines)
        } else {
            sequential_rows(&lines, self.nchar)
        };

        let mut taxcount = 0;
        let mut first_block = true;
        let mut refseq: Vec<char> = Vec::new();

        for (name, residues) in rows {
            taxcount += 1;
            if taxcount > self.ntax {
                if !self.interleave {
                    return Err(ParsingError::dimension_mismatch(
                        "Too many taxa in matrix - should matrix be interleaved?",
                    ));
                }
                taxcount = 1;
                first_block = false;
            }

            let residues = self.replace_parenthesized_ambiguities(&residues)?;
            let mut residues: Vec<char> = residues.chars().collect();
            if taxcount == 1 {
                refseq = residues.clone();
            } else if let Some(matchchar) = self.matchchar {
                for (i, c) in residues.iter_mut().enumerate().filter(|(_, c)| **c == matchchar) {
                    *c = *refseq.get(i).ok_or_else(|| {
                        ParsingError::dimension_mismatch(format!("Taxon {name}: no reference character at position {}", i + 1))
                    })?;
                }
            }
            let sequence = Sequence::new(residues.into_iter().collect::<String>(), self.datatype);
            if let Some(c) = sequence.invalid_residue(|c| self.is_valid_char(c)) {
                return Err(ParsingError::illegal_character(&name, c, sequence.as_str()));
            }

            if first_block {
                let id = unique_label(&name, |l| self.matrix.contains_key(l));
                if id != name {
                    log::warn!("duplicate taxon {name} renamed to {id}");
                }
                self.unaltered_taxlabels.push(name);
                self.matrix.insert(id.clone(), sequence);
                self.taxlabels.push(id);
            } else {
                let earlier = &self.taxlabels[..taxcount - 1];
                let id = unique_label(&name, |l| earlier.iter().any(|t| t == l));
                let taxon = self.check_taxlabels(&id).map(str::to_string).ok_or_else(|| {
                    ParsingError::dimension_mismatch(format!(
                        "Taxon {id} not in first block of interleaved matrix. Check matrix dimensions and interleave."
                    ))
                })?;
                if let Some(row) = self.matrix.get_mut(&taxon) {
                    row.push_str(sequence.as_str());
                }
            }
        }

        if taxcount < self.ntax {
            return Err(ParsingError::dimension_mismatch("Not enough taxa in matrix"));
        }

        for taxon in &self.taxlabels {
            let len = self.row(taxon).len();
            if len != self.nchar {
                return Err(ParsingError::dimension_mismatch(format!(
                    "Matrix nchar {} does not match data length ({len}) for taxon {taxon}",
                    self.nchar
                )));
            }
        }

        let mut keys: Vec<&String> = self.matrix.keys().collect();
        let mut labels: Vec<&String> = self.taxlabels.iter().collect();
        keys.sort();
        labels.sort();
        assert_eq!(keys, labels, "taxon labels diverged from matrix keys");

        Ok(())
    }

    /// Replaces inline ambiguities such as `(AG)` by their ambiguity code (`R`).
    ///
    /// The code is lower-case if the group was written in lower case.
    fn replace_parenthesized_ambiguities(&self, residues: &str) -> Result<String, ParsingError> {
        if !residues.contains(['(', ')']) {
            return Ok(residues.to_string());
        }

        let mut replaced = String::with_capacity(residues.len());
        let mut rest = residues;
        while let Some(open) = rest.find(['(', ')']) {
            let close = rest.find(')');
            match close {
                Some(close) if close > open => {
                    let group = sorted_chars(&rest[open + 1..close]);
                    let upper = group.to_uppercase();
                    let code = self.rev_ambiguities.get(&upper).ok_or_else(|| {
                        ParsingError::unresolved_identifier(format!("No ambiguity code for ({group})"))
                    })?;
                    replaced.push_str(&rest[..open]);
                    replaced.push(if group != upper { code.to_ascii_lowercase() } else { *code });
                    rest = &rest[close + 1..];
                }
                Some(_) => {
                    return Err(ParsingError::invalid_formatting(format!("Missing opening parenthesis in: {residues}")));
                }
                None => {
                    return Err(ParsingError::invalid_formatting(format!("Missing closing parenthesis in: {residues}")));
                }
            }
        }
        replaced.push_str(rest);

        Ok(replaced)
    }
}

/// Splits a matrix line into taxon name (quotes stripped) and residues (whitespace removed).
fn split_row(line: &str) -> (String, String) {
    let mut scanner = Scanner::new(line);
    let name = scanner.next_word().unwrap_or_default();
    let residues = scanner.rest().split_whitespace().collect();
    (quote_strip(&name).to_string(), residues)
}

/// Number of matrix columns in `residues`: a parenthesized group is one column.
fn effective_len(residues: &str) -> usize {
    let mut len = 0;
    let mut in_group = false;
    for c in residues.chars() {
        match c {
            '(' => {
                in_group = true;
                len += 1;
            }
            ')' => in_group = false,
            _ if !in_group => len += 1,
            _ => {}
        }
    }
    len
}

/// Rows of an interleaved matrix: one per line; a line holding only a name
/// takes its residues from the following line.
fn interleaved_rows(lines: &[&str]) -> Vec<(String, String)> {
    let mut rows = Vec::with_capacity(lines.len());
    let mut lines = lines.iter();
    while let Some(line) = lines.next() {
        let (name, mut residues) = split_row(line);
        if residues.is_empty() {
            if let Some(next) = lines.next() {
                residues = next.split_whitespace().collect();
            }
        }
        rows.push((name, residues));
    }
    rows
}

/// Rows of a non-interleaved matrix: a row continues over following lines until
/// it holds `nchar` columns.
fn sequential_rows(lines: &[&str], nchar: usize) -> Vec<(String, String)> {
    let mut accumulator = RowAccumulator::default();
    let mut rows = Vec::new();

    for line in lines {
        accumulator.feed(line, nchar);
        if let Some(row) = accumulator.take_complete() {
            rows.push(row);
        }
    }
    rows.extend(accumulator.finish());

    rows
}

// ============================================================================
// LABELS, TRANSLATE & TREES (private)
// ============================================================================
impl Document {
    /// `TAXLABELS name name ...`; the names are recorded, the matrix defines the taxa.
    fn taxlabels_command(&mut self, text: &str) -> Result<(), ParsingError> {
        let mut scanner = Scanner::new(text);
        self.declared_taxlabels.clear();
        while let Some(word) = scanner.next_word() {
            self.declared_taxlabels.push(quote_strip(&word).to_string());
        }
        Ok(())
    }

    /// `CHARLABELS id label, ...` and `CHARSTATELABELS id label [/ state ...], ...`
    fn charlabels_command(&mut self, text: &str, with_states: bool) -> Result<(), ParsingError> {
        let mut charlabels = BTreeMap::new();
        let mut statelabels = BTreeMap::new();
        let mut scanner = Scanner::new(text);

        // a trailing comma is tolerated
        while let Some(word) = scanner.next_word() {
            let index = self.resolve_charset(&word)?;
            let [index] = index.as_slice() else {
                return Err(ParsingError::invalid_formatting(format!("{word} is not a single character")));
            };

            let label = scanner
                .next_word()
                .ok_or_else(|| ParsingError::invalid_formatting(format!("Missing label for character {word}")))?;
            charlabels.insert(*index, quote_strip(&label).to_string());

            if with_states && scanner.peek_nonwhitespace() == Some('/') {
                scanner.next_nonwhitespace();
                let mut names = Vec::new();
                while !matches!(scanner.peek_nonwhitespace(), None | Some(',')) {
                    if let Some(state) = scanner.next_word() {
                        names.push(quote_strip(&state).to_string());
                    }
                }
                statelabels.insert(*index, names);
            }

            match scanner.next_nonwhitespace() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(ParsingError::invalid_formatting(format!("Expected ',' but found {c:?}"))),
            }
        }

        self.charlabels = charlabels;
        if with_states {
            self.statelabels = statelabels;
        }
        Ok(())
    }

    /// `TRANSLATE key label, ...` with integer keys.
    fn translate_command(&mut self, text: &str) -> Result<(), ParsingError> {
        let mut translate = BTreeMap::new();
        let mut scanner = Scanner::new(text);

        while let Some(word) = scanner.next_word() {
            let key: usize = word
                .parse()
                .map_err(|_| ParsingError::invalid_formatting(format!("Translate key {word} is not an integer")))?;
            let label = scanner
                .next_word()
                .ok_or_else(|| ParsingError::invalid_formatting(format!("Missing label for translate key {key}")))?;
            translate.insert(key, quote_strip(&label).to_string());

            match scanner.next_nonwhitespace() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(ParsingError::invalid_formatting(format!("Expected ',' but found {c:?}"))),
            }
        }

        self.translate = Some(translate);
        Ok(())
    }

    /// `TREE [*] name = [&R|&U] [&W weight] newick`; `UTREE` is the same command.
    fn tree_command(&mut self, text: &str) -> Result<(), ParsingError> {
        let mut scanner = Scanner::new(text);
        if scanner.peek_nonwhitespace() == Some('*') {
            scanner.next_nonwhitespace();
        }

        let name = scanner
            .next_word()
            .ok_or_else(|| ParsingError::invalid_formatting("Tree without name"))?;
        if scanner.next_nonwhitespace() != Some('=') {
            return Err(ParsingError::invalid_formatting("Syntax error in tree description"));
        }

        let mut metadata = TreeMetadata { name: quote_strip(&name).to_string(), ..TreeMetadata::default() };
        while scanner.peek_nonwhitespace() == Some('[') {
            scanner.next_nonwhitespace();
            let symbol = scanner.next_char();
            if symbol != Some('&') {
                return Err(ParsingError::invalid_formatting(format!(
                    "Illegal special comment [{}...] in tree description",
                    symbol.unwrap_or(' ')
                )));
            }
            let special = scanner.next_char();
            let value = scanner
                .next_until(&[']'])
                .ok_or_else(|| ParsingError::unmatched_comment("Special comment without closing ']'"))?;
            scanner.next_char();

            match special.map(|c| c.to_ascii_uppercase()) {
                Some('R') => metadata.rooted = true,
                Some('U') => metadata.rooted = false,
                Some('W') => {
                    metadata.weight = value
                        .trim()
                        .parse()
                        .map_err(|_| ParsingError::invalid_formatting(format!("Illegal tree weight: {value}")))?;
                }
                _ => log::debug!("ignoring special comment in tree {}", metadata.name),
            }
        }

        let newick = scanner.rest();
        let mut newick_scanner = Scanner::new(newick.trim());
        let mut parser = if self.ntax > 0 {
            NewickParser::new().with_num_leaves(self.ntax)
        } else {
            NewickParser::new()
        };
        let mut tree = parser.parse_with_metadata(&mut newick_scanner, metadata)?;

        if let Some(translate) = self.translate.as_ref().filter(|t| !t.is_empty()) {
            tree.relabel_leaves(|label| {
                label
                    .parse::<usize>()
                    .ok()
                    .and_then(|key| translate.get(&key))
                    .cloned()
                    .ok_or_else(|| {
                        ParsingError::unresolved_identifier(format!("Unable to substitute {label} using translate data"))
                    })
            })?;
        }

        log::trace!("read tree {} with {} leaves", tree.name(), tree.num_leaves());
        self.trees.push(tree);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    fn parse(body: &str) -> Result<Document, ParsingError> {
        format!("#NEXUS\nbegin data;\n{body}\nend;").parse()
    }

    #[test]
    fn test_duplicate_taxa_get_copy_suffix() {
        let doc = parse("dimensions ntax=2 nchar=4; format datatype=dna; matrix\nFox ACGT\nFox AC-T\n;").unwrap();
        assert_eq!(doc.taxlabels(), ["Fox", "Fox.copy"]);
        assert_eq!(doc.unaltered_taxlabels(), ["Fox", "Fox"]);
        assert_eq!(doc.sequence("Fox.copy").unwrap().as_str(), "AC-T");
    }

    #[test]
    fn test_matrix_needs_format_and_dimensions() {
        let err = parse("dimensions ntax=1 nchar=4; matrix\nFox ACGT\n;").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::MissingPrerequisite(_)));
        let err = parse("format datatype=dna; matrix\nFox ACGT\n;").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::MissingPrerequisite(_)));
    }

    #[test]
    fn test_parenthesized_ambiguities_and_matchchar() {
        let doc = parse(
            "dimensions ntax=2 nchar=5; format datatype=dna matchchar=.; matrix\nA AC(AG)Tg\nB ..(ag).(CT)\n;",
        )
        .unwrap();
        assert_eq!(doc.sequence("A").unwrap().as_str(), "ACRTg");
        assert_eq!(doc.sequence("B").unwrap().as_str(), "ACrTY");

        assert!(parse("dimensions ntax=1 nchar=3; format datatype=dna; matrix\nA A(QG)C\n;").is_err());
        assert!(parse("dimensions ntax=1 nchar=3; format datatype=dna; matrix\nA A(AGC\n;").is_err());
    }

    #[test]
    fn test_rows_may_span_lines() {
        let doc = parse("dimensions ntax=2 nchar=8; format datatype=dna; matrix\nA ACGT\nACGT\nB AAAA AAAA\n;").unwrap();
        assert_eq!(doc.sequence("A").unwrap().as_str(), "ACGTACGT");
        assert_eq!(doc.sequence("B").unwrap().as_str(), "AAAAAAAA");
    }

    #[test]
    fn test_interleaved_blocks_append_in_any_order() {
        let doc = parse(
            "dimensions ntax=2 nchar=6; format datatype=dna interleave; matrix\n\
             Red_fox ACG\nWolf TTT\n\nWolf GGG\n'Red fox' CAT\n;",
        )
        .unwrap();
        assert_eq!(doc.sequence("Red_fox").unwrap().as_str(), "ACGCAT");
        assert_eq!(doc.sequence("Wolf").unwrap().as_str(), "TTTGGG");

        let err = parse("dimensions ntax=1 nchar=6; format datatype=dna interleave; matrix\nA ACG\nB TTT\n;").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::DimensionMismatch(_)));
    }

    #[test]
    fn test_illegal_character_names_taxon() {
        let err = parse("dimensions ntax=1 nchar=4; format datatype=dna; matrix\nFox ACJT\n;").unwrap_err();
        match err.kind() {
            ParsingErrorType::IllegalCharacter { taxon, character, .. } => {
                assert_eq!(taxon, "Fox");
                assert_eq!(*character, 'J');
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_format_options() {
        let doc = parse("format datatype=protein missing=X gap='~' symbols=\"a b\" respectcase interleave=no;").unwrap();
        assert_eq!(doc.datatype(), DataType::Protein);
        assert_eq!(doc.missing(), 'X');
        assert_eq!(doc.gap(), '~');
        assert_eq!(doc.symbols(), Some("ab"));
        assert!(doc.respectcase());
        assert!(!doc.interleave());

        assert!(parse("format datatype=standard;").is_err());
        assert!(parse("format transpose;").is_err());
    }

    #[test]
    fn test_charstatelabels_and_trailing_comma() {
        let doc = parse(
            "dimensions ntax=1 nchar=3; format datatype=dna; matrix\nA ACG\n;\n\
             charstatelabels 1 first / absent present, 3 'third one',;",
        )
        .unwrap();
        assert_eq!(doc.charlabels().get(&0).map(String::as_str), Some("first"));
        assert_eq!(doc.charlabels().get(&2).map(String::as_str), Some("third one"));
        assert_eq!(doc.statelabels().get(&0).unwrap(), &["absent", "present"]);
        assert!(parse("dimensions ntax=1 nchar=3; charlabels 1 a 2 b;").is_err());
    }

    #[test]
    fn test_dimensions_out_of_range() {
        let err = parse("dimensions ntax=-(0-9223372036854775807-1) nchar=1;").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidFormatting(_)));
        assert!(parse("dimensions ntax=2*(3+4) nchar=1;").is_ok());
    }

    #[test]
    fn test_translated_tree_with_directives() {
        let doc: Document = "#NEXUS\nbegin trees;\n translate 1 Human, 2 Chimp;\n \
                             tree * t1 = [&U] [&W 0.25] (1:0.1,2:0.2);\nend;"
            .parse()
            .unwrap();
        let tree = &doc.trees()[0];
        assert_eq!(tree.name(), "t1");
        assert!(!tree.is_rooted());
        assert_eq!(tree.weight(), 0.25);
        let mut labels = tree.leaf_labels();
        labels.sort();
        assert_eq!(labels, ["Chimp", "Human"]);

        let err = "begin trees; translate 1 Human; tree t = (1,3); end;".parse::<Document>().unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::UnresolvedIdentifier(_)));
    }

    #[test]
    fn test_unknown_command_in_known_block() {
        let err = parse("frobnicate now;").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::UnknownCommand(_)));
        assert!(parse("title 'my data'; link taxa=t;").is_ok());
    }
}
