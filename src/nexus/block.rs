//! Block assembly and command line splitting.
//!
//! Logical command lines are grouped into `BEGIN name; ... END;` blocks, and
//! each command line is split into a [Command] and its [Payload]: the raw text
//! for commands whose argument order matters, an [CommandOptions] map otherwise.

use crate::nexus::defs::{BLOCK_BEGIN, BLOCK_END, NexusBlock};
use crate::parser::ParsingError;

// =#========================================================================#=
// BLOCKS
// =#========================================================================#=
/// A block with its title (lower-cased) and raw command lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub title: String,
    pub lines: Vec<String>,
}

impl RawBlock {
    /// Block kind of this block's title
    pub fn kind(&self) -> NexusBlock {
        NexusBlock::from_name(&self.title)
    }
}

/// Groups command lines into blocks. Lines outside blocks are dropped.
///
/// # Errors
/// Returns an error for a `BEGIN` inside an open block, for `END` outside a block,
/// for a `BEGIN` without title, and for a block still open at the end.
pub fn assemble_blocks<S: AsRef<str>>(lines: &[S]) -> Result<Vec<RawBlock>, ParsingError> {
    let mut blocks = Vec::new();
    let mut open: Option<RawBlock> = None;

    for line in lines {
        let line = line.as_ref();
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or_default().to_ascii_lowercase();

        if first == BLOCK_BEGIN {
            if let Some(block) = &open {
                return Err(ParsingError::invalid_block_structure(format!(
                    "Illegal block nesting in block {}",
                    block.title
                ))
                .with_context(line));
            }
            let title = words
                .next()
                .ok_or_else(|| ParsingError::invalid_block_structure("Block without title").with_context(line))?;
            log::trace!("begin block {title}");
            open = Some(RawBlock { title: title.to_ascii_lowercase(), lines: Vec::new() });
        } else if BLOCK_END.contains(&first.as_str()) {
            let block = open
                .take()
                .ok_or_else(|| ParsingError::invalid_block_structure("Unmatched 'end'").with_context(line))?;
            log::trace!("end block {}", block.title);
            blocks.push(block);
        } else if let Some(block) = open.as_mut() {
            block.lines.push(line.to_string());
        } else {
            log::debug!("ignoring command outside of block: {line}");
        }
    }

    if let Some(block) = open {
        return Err(ParsingError::invalid_block_structure(format!("Block {} is not closed", block.title)));
    }

    Ok(blocks)
}

// =#========================================================================#=
// COMMANDS
// =#========================================================================#=
/// Commands recognized inside known blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dimensions,
    Format,
    Matrix,
    TaxLabels,
    CharLabels,
    CharStateLabels,
    StateLabels,
    Translate,
    Tree,
    UTree,
    CharSet,
    TaxSet,
    CharPartition,
    TaxPartition,
    CodonPosSet,
    Title,
    Link,
    Set,
    Options,
    Eliminate,
    CodeSet,
    StateSet,
    ChangeSet,
    TreeSet,
    TreePartition,
    Unknown(String),
}

impl Command {
    /// Parse a command name (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dimensions" => Command::Dimensions,
            "format" => Command::Format,
            "matrix" => Command::Matrix,
            "taxlabels" => Command::TaxLabels,
            "charlabels" => Command::CharLabels,
            "charstatelabels" => Command::CharStateLabels,
            "statelabels" => Command::StateLabels,
            "translate" => Command::Translate,
            "tree" => Command::Tree,
            "utree" => Command::UTree,
            "charset" => Command::CharSet,
            "taxset" => Command::TaxSet,
            "charpartition" => Command::CharPartition,
            "taxpartition" => Command::TaxPartition,
            "codonposset" => Command::CodonPosSet,
            "title" => Command::Title,
            "link" => Command::Link,
            "set" => Command::Set,
            "options" => Command::Options,
            "eliminate" => Command::Eliminate,
            "codeset" => Command::CodeSet,
            "stateset" => Command::StateSet,
            "changeset" => Command::ChangeSet,
            "treeset" => Command::TreeSet,
            "treepartition" => Command::TreePartition,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Whether the argument text is handed over raw instead of as option map.
    pub fn is_order_sensitive(&self) -> bool {
        matches!(
            self,
            Command::Matrix
                | Command::Tree
                | Command::UTree
                | Command::Translate
                | Command::TaxLabels
                | Command::CharLabels
                | Command::CharStateLabels
                | Command::CharSet
                | Command::TaxSet
                | Command::CharPartition
                | Command::TaxPartition
                | Command::CodonPosSet
                | Command::Title
        )
    }
}

/// Argument of a command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Raw(String),
    Options(CommandOptions),
}

/// A command line split into command and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine {
    pub command: Command,
    pub payload: Payload,
}

impl CommandLine {
    /// Splits a logical command line.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::block::{Command, CommandLine, Payload};
    ///
    /// let line = CommandLine::parse("FORMAT datatype=DNA interleave").unwrap();
    /// assert_eq!(line.command, Command::Format);
    /// let Payload::Options(options) = line.payload else { panic!() };
    /// assert_eq!(options.value("datatype"), Some("DNA"));
    /// assert!(options.contains("interleave"));
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParsingError> {
        let line = line.trim_start();
        let split = line.find(char::is_whitespace).unwrap_or(line.len());
        let (name, rest) = line.split_at(split);

        let command = Command::from_name(name);
        let payload = if command == Command::Matrix {
            Payload::Raw(rest.to_string())
        } else if command.is_order_sensitive() {
            Payload::Raw(rest.trim().to_string())
        } else {
            Payload::Options(CommandOptions::parse(rest).map_err(|e| e.with_context(line))?)
        };

        Ok(CommandLine { command, payload })
    }
}

// =#========================================================================#=
// COMMAND OPTIONS
// =#========================================================================#=
/// Ordered `key[=value]` options of an order-insensitive command.
///
/// Keys are lower-cased, values are kept verbatim (quotes included).
/// A key without `=` is a flag with value `None`. A later entry for the same
/// key takes precedence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandOptions {
    entries: Vec<(String, Option<String>)>,
}

impl CommandOptions {
    /// Parses whitespace separated options; `=` binds the words on either side.
    ///
    /// Quoted values may contain whitespace and `=`.
    pub fn parse(text: &str) -> Result<Self, ParsingError> {
        let tokens = tokenize(text);
        let mut entries = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            if tokens[i] == "=" {
                return Err(ParsingError::invalid_formatting("'=' without option name"));
            }
            if tokens.get(i + 1).is_some_and(|t| t == "=") {
                let value = tokens
                    .get(i + 2)
                    .filter(|t| *t != "=")
                    .ok_or_else(|| ParsingError::invalid_formatting(format!("Option {} without value", tokens[i])))?;
                entries.push((tokens[i].to_ascii_lowercase(), Some(value.clone())));
                i += 3;
            } else {
                entries.push((tokens[i].to_ascii_lowercase(), None));
                i += 1;
            }
        }

        Ok(CommandOptions { entries })
    }

    /// Returns the entry for `key`: `Some(None)` for a flag, `Some(Some(v))` for a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Returns the value for `key`, if present and not a flag.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// Returns whether `key` is present (as flag or with value).
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`, replacing a previous entry.
    pub fn insert(&mut self, key: &str, value: Option<String>) {
        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), value));
    }

    /// Adds all entries of `other`, which take precedence.
    pub fn merge(&mut self, other: &CommandOptions) {
        for (key, value) in &other.entries {
            self.insert(key, value.clone());
        }
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits at whitespace outside quotes; `=` outside quotes is a token of its own.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                current.push(c);
            }
            None if c.is_whitespace() || c == '=' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                if c == '=' {
                    tokens.push("=".to_string());
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_end_and_nesting() {
        assert!(assemble_blocks(&["end"]).is_err());
        assert!(assemble_blocks(&["begin data", "begin taxa", "end", "end"]).is_err());
        assert!(assemble_blocks(&["begin data"]).is_err());
    }

    #[test]
    fn test_lines_outside_blocks_are_ignored() {
        let blocks = assemble_blocks(&["dimensions ntax=1", "BEGIN Data", "format datatype=dna", "ENDBLOCK"]).unwrap();
        assert_eq!(blocks, vec![RawBlock { title: "data".to_string(), lines: vec!["format datatype=dna".to_string()] }]);
    }

    #[test]
    fn test_quoted_option_values() {
        let options = CommandOptions::parse("symbols=\"0 1 2\" Missing=? gap = -").unwrap();
        assert_eq!(options.value("symbols"), Some("\"0 1 2\""));
        assert_eq!(options.value("missing"), Some("?"));
        assert_eq!(options.value("gap"), Some("-"));
        assert!(CommandOptions::parse("gap =").is_err());
    }

    #[test]
    fn test_order_sensitive_commands_keep_raw_text() {
        let line = CommandLine::parse("charset  coding = 1-10\\3").unwrap();
        assert_eq!(line.command, Command::CharSet);
        assert_eq!(line.payload, Payload::Raw("coding = 1-10\\3".to_string()));

        let line = CommandLine::parse("wibble a=b").unwrap();
        assert_eq!(line.command, Command::Unknown("wibble".to_string()));
    }
}
