//! NEXUS writer for a [Document].
//!
//! Writes a `DATA` block (dimensions, format, character labels and the matrix
//! in plain, interleaved or by-partition layout) and, as configured, `SETS`,
//! `CODONS`, `TREES` and passthrough blocks. Character sets and partitions are
//! renumbered so that they keep pointing at the same sites after excluded
//! characters are left out.

use crate::nexus::defs::{
    BLOCK_BEGIN, DEFAULT_GAP, DEFAULT_INTERLEAVE_BLOCKSIZE, DEFAULT_MISSING, NEXUS_HEADER,
};
use crate::nexus::document::{CharPartition, Document};
use crate::nexus::sets::compact_for_nexus;
use crate::parser::ParsingError;
use crate::parser::utils::safe_name;
use std::collections::{HashMap, HashSet};
use std::io;
use std::io::{BufWriter, Write};

// =#========================================================================#=
// WRITE OPTIONS
// =#========================================================================#=
/// Configures what [NexusWriter] writes and how.
///
/// # Example
/// ```
/// use nexalign::nexus::WriteOptions;
///
/// let options = WriteOptions::default()
///     .with_interleave(true)
///     .with_blocksize(60)
///     .with_delete(vec!["Outgroup".to_string()])
///     .with_comment("cleaned alignment");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    interleave: bool,
    interleave_by_partition: Option<String>,
    blocksize: Option<usize>,
    exclude: Vec<usize>,
    delete: Vec<String>,
    comment: Option<String>,
    omit_nexus: bool,
    append_sets: bool,
    mrbayes: bool,
    codons_block: bool,
    trees: bool,
    unknown_blocks: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            interleave: false,
            interleave_by_partition: None,
            blocksize: None,
            exclude: Vec::new(),
            delete: Vec::new(),
            comment: None,
            omit_nexus: false,
            append_sets: true,
            mrbayes: false,
            codons_block: true,
            trees: false,
            unknown_blocks: false,
        }
    }
}

impl WriteOptions {
    /// Writes the matrix in blocks of [blocksize](WriteOptions::with_blocksize) columns (default 70).
    pub fn with_interleave(mut self, interleave: bool) -> Self {
        self.interleave = interleave;
        self
    }

    /// Writes the matrix in one block per member of the named character partition.
    pub fn with_interleave_by_partition<S: Into<String>>(mut self, partition: S) -> Self {
        self.interleave_by_partition = Some(partition.into());
        self
    }

    /// Number of columns per line; 0 restores the default.
    pub fn with_blocksize(mut self, blocksize: usize) -> Self {
        self.blocksize = (blocksize > 0).then_some(blocksize);
        self
    }

    /// 0-based characters to leave out.
    pub fn with_exclude(mut self, exclude: Vec<usize>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Taxa to leave out.
    pub fn with_delete(mut self, delete: Vec<String>) -> Self {
        self.delete = delete;
        self
    }

    /// Comment written in brackets before the data block.
    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_omit_nexus(mut self, omit_nexus: bool) -> Self {
        self.omit_nexus = omit_nexus;
        self
    }

    /// Whether to append a `SETS` block with sets and partitions (default `true`).
    pub fn with_append_sets(mut self, append_sets: bool) -> Self {
        self.append_sets = append_sets;
        self
    }

    /// Writes taxon names without quotes, whitespace or punctuation.
    pub fn with_mrbayes(mut self, mrbayes: bool) -> Self {
        self.mrbayes = mrbayes;
        self
    }

    /// Whether codon position partitions go to a separate `CODONS` block (default
    /// `true`) or into the `SETS` block.
    pub fn with_codons_block(mut self, codons_block: bool) -> Self {
        self.codons_block = codons_block;
        self
    }

    pub fn with_trees(mut self, trees: bool) -> Self {
        self.trees = trees;
        self
    }

    /// Whether to write blocks with unknown titles back unchanged.
    pub fn with_unknown_blocks(mut self, unknown_blocks: bool) -> Self {
        self.unknown_blocks = unknown_blocks;
        self
    }
}

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Buffered writer for [Document]s in NEXUS format.
///
/// # Example
/// ```
/// use nexalign::nexus::{Document, NexusWriter, WriteOptions};
///
/// let doc: Document = "begin data; dimensions ntax=2 nchar=4; format datatype=dna;
///     matrix\n Fox ACGT\n Wolf AC-T\n; end;".parse().unwrap();
///
/// let mut writer = NexusWriter::new(Vec::new());
/// writer.write_document(&doc, &WriteOptions::default()).unwrap();
/// let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(
///     text,
///     "#NEXUS\nbegin data;\n\tdimensions ntax=2 nchar=4;\n\tformat datatype=dna;\n\
///      matrix\nFox  ACGT\nWolf AC-T\n;\nend;\n"
/// );
/// ```
pub struct NexusWriter<W: Write> {
    bw: BufWriter<W>,
}

// ============================================================================
// API (public)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Creates a new NEXUS writer for the given output.
    pub fn new(inner: W) -> Self {
        NexusWriter { bw: BufWriter::new(inner) }
    }

    /// Writes the document as configured.
    ///
    /// Nothing is written if no taxa are left after deletion.
    ///
    /// # Errors
    /// Returns an error for unknown deleted taxa, for a partition to interleave
    /// by that is unknown or whose members are not consecutive character ranges,
    /// or if writing fails.
    pub fn write_document(&mut self, document: &Document, options: &WriteOptions) -> Result<(), ParsingError> {
        let deleted = document.canonical_taxa(&options.delete)?;
        let partition = match &options.interleave_by_partition {
            Some(name) => {
                let partition = document
                    .charpartitions
                    .get(name)
                    .ok_or_else(|| ParsingError::unresolved_identifier(format!("Unknown partition: {name}")))?;
                Some((name.as_str(), partition_blocks(name, partition, document.nchar, &options.exclude)?))
            }
            None => None,
        };

        let taxa: Vec<&String> = document.taxlabels.iter().filter(|t| !deleted.contains(*t)).collect();
        if taxa.is_empty() {
            log::warn!("no taxa left to write");
            return Ok(());
        }
        let cropped = document.crop_rows(&document.string_matrix(), &options.delete, &options.exclude)?;

        let data = DataBlock { document, options, taxa, cropped, partition };
        self.header(options)?.data_block(&data)?;

        if options.append_sets {
            if options.codons_block {
                self.write_all(sets_block(document, options, false, false).as_bytes())?;
                self.write_all(sets_block(document, options, true, true).as_bytes())?;
            } else {
                self.write_all(sets_block(document, options, true, false).as_bytes())?;
            }
        }
        if options.trees && !document.trees.is_empty() {
            self.trees_block(document)?;
        }
        if options.unknown_blocks {
            self.unknown_blocks(document)?;
        }

        self.bw.flush()?;
        Ok(())
    }

    /// Flushes the buffer and returns the underlying output.
    pub fn into_inner(self) -> io::Result<W> {
        self.bw.into_inner().map_err(|e| e.into_error())
    }
}

// ============================================================================
// Document-level convenience (public)
// ============================================================================
impl Document {
    /// Writes this document to `writer` as configured.
    pub fn write_nexus_data<W: Write>(&self, writer: W, options: &WriteOptions) -> Result<(), ParsingError> {
        NexusWriter::new(writer).write_document(self, options)
    }

    /// Returns this document as NEXUS text.
    pub fn to_nexus_string(&self, options: &WriteOptions) -> Result<String, ParsingError> {
        let mut writer = NexusWriter::new(Vec::new());
        writer.write_document(self, options)?;
        let bytes = writer.into_inner()?;
        String::from_utf8(bytes).map_err(|e| ParsingError::from(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// One NEXUS text (data block only) per member of the named character
    /// partition, holding only that member's characters.
    ///
    /// The comment of `options` is extended by `Partition: <member>`.
    pub fn write_partitions(&self, charpartition: &str, options: &WriteOptions) -> Result<Vec<(String, String)>, ParsingError> {
        let partition = self
            .charpartitions
            .get(charpartition)
            .ok_or_else(|| ParsingError::unresolved_identifier(format!("Unknown partition: {charpartition}")))?;

        let mut texts = Vec::with_capacity(partition.len());
        for (member, indices) in partition {
            let members: HashSet<usize> = indices.iter().copied().collect();
            let mut exclude = options.exclude.clone();
            exclude.extend((0..self.nchar).filter(|c| !members.contains(c)));
            exclude.sort_unstable();
            exclude.dedup();

            let comment = format!("{}\nPartition: {member}\n", options.comment.as_deref().unwrap_or_default());
            let member_options = options
                .clone()
                .with_exclude(exclude)
                .with_comment(comment)
                .with_append_sets(false)
                .with_interleave_by_partition_cleared();
            texts.push((member.clone(), self.to_nexus_string(&member_options)?));
        }
        Ok(texts)
    }
}

impl WriteOptions {
    fn with_interleave_by_partition_cleared(mut self) -> Self {
        self.interleave_by_partition = None;
        self
    }
}

// ============================================================================
// Nexus Block Writing (private)
// ============================================================================
/// What the data block of one write consists of.
struct DataBlock<'a> {
    document: &'a Document,
    options: &'a WriteOptions,
    /// Remaining taxa in matrix order
    taxa: Vec<&'a String>,
    /// Remaining rows without excluded characters
    cropped: HashMap<String, String>,
    /// Partition name and the remaining columns of each member, in writing order
    partition: Option<(&'a str, Vec<(&'a String, Vec<usize>)>)>,
}

impl<W: Write> NexusWriter<W> {
    /// Writes the "#NEXUS" header (unless omitted) and the comment, returning itself for chaining.
    fn header(&mut self, options: &WriteOptions) -> io::Result<&mut Self> {
        if !options.omit_nexus {
            self.write_all(NEXUS_HEADER.as_bytes())?.newline()?;
        }
        if let Some(comment) = options.comment.as_deref().filter(|c| !c.is_empty()) {
            self.write_all(b"[")?.write_all(comment.as_bytes())?.write_all(b"]")?.newline()?;
        }
        Ok(self)
    }

    /// Writes the DATA block, returning itself for chaining.
    fn data_block(&mut self, data: &DataBlock) -> io::Result<&mut Self> {
        let document = data.document;
        let options = data.options;
        let nchar = data.cropped[data.taxa[0]].chars().count();

        // "begin data;"
        self.write_all(BLOCK_BEGIN.as_bytes())?.write_all(b" data")?.semicolon_ln()?;

        // "\tdimensions ntax=n nchar=n;"
        self.tab()?
            .write_all(b"dimensions ntax")?
            .equals()?
            .write_all(data.taxa.len().to_string().as_bytes())?
            .write_all(b" nchar")?
            .equals()?
            .write_all(nchar.to_string().as_bytes())?
            .semicolon_ln()?;

        self.format_cmd(document, options)?;
        self.charlabels_cmd(document, options)?;

        // "matrix" followed by the rows
        self.write_all(b"matrix")?.newline()?;
        let names: Vec<String> = data.taxa.iter().map(|t| safe_name(t, options.mrbayes)).collect();
        let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) + 1;
        let rows: Vec<Vec<char>> = data.taxa.iter().map(|t| data.cropped[*t].chars().collect()).collect();

        let interleaved = options.interleave || data.partition.is_some();
        let blocksize = options
            .blocksize
            .unwrap_or(if interleaved { DEFAULT_INTERLEAVE_BLOCKSIZE } else { document.nchar.max(1) });

        if let Some((partition, blocks)) = &data.partition {
            for (member, columns) in blocks {
                self.write_all(format!("[{partition}: {member}]").as_bytes())?.newline()?;
                if columns.is_empty() {
                    self.write_all(b"[empty]")?.newline()?.newline()?;
                    continue;
                }
                for (name, row) in names.iter().zip(&rows) {
                    let block: Vec<char> = columns.iter().map(|&c| row[c]).collect();
                    self.padded(name, width)?.chars(&block)?.newline()?;
                }
                self.newline()?;
            }
        } else if options.interleave {
            for seek in (0..nchar).step_by(blocksize) {
                for (name, row) in names.iter().zip(&rows) {
                    self.padded(name, width)?.chars(&row[seek..(seek + blocksize).min(nchar)])?.newline()?;
                }
                self.newline()?;
            }
        } else {
            for (name, row) in names.iter().zip(&rows) {
                if blocksize < nchar {
                    self.write_all(name.as_bytes())?.newline()?;
                } else {
                    self.padded(name, width)?;
                }
                for chunk in row.chunks(blocksize) {
                    self.chars(chunk)?.newline()?;
                }
            }
        }

        // ";\nend;"
        self.semicolon_ln()?.write_all(b"end")?.semicolon_ln()?;
        Ok(self)
    }

    /// Writes the FORMAT command (non-default settings only), returning itself for chaining.
    fn format_cmd(&mut self, document: &Document, options: &WriteOptions) -> io::Result<&mut Self> {
        self.tab()?.write_all(b"format")?;
        if let Some(datatype) = document.datatype.name() {
            self.write_all(b" datatype=")?.write_all(datatype.as_bytes())?;
        }
        if document.respectcase {
            self.write_all(b" respectcase")?;
        }
        if document.missing != DEFAULT_MISSING {
            self.write_all(format!(" missing={}", document.missing).as_bytes())?;
        }
        if document.gap != DEFAULT_GAP {
            self.write_all(format!(" gap={}", document.gap).as_bytes())?;
        }
        if let Some(matchchar) = document.matchchar {
            self.write_all(format!(" matchchar={matchchar}").as_bytes())?;
        }
        if let Some(labels) = &document.labels {
            self.write_all(b" labels=")?.write_all(labels.as_bytes())?;
        }
        if let Some(equate) = &document.equate {
            self.write_all(b" equate=")?.write_all(equate.as_bytes())?;
        }
        if options.interleave || options.interleave_by_partition.is_some() {
            self.write_all(b" interleave")?;
        }
        self.semicolon_ln()
    }

    /// Writes the CHARLABELS command renumbered for excluded characters, returning itself for chaining.
    fn charlabels_cmd(&mut self, document: &Document, options: &WriteOptions) -> io::Result<&mut Self> {
        if document.charlabels.is_empty() {
            return Ok(self);
        }
        let offsets = offsets(document.nchar, &options.exclude);
        let labels: Vec<String> = document
            .charlabels
            .iter()
            .filter_map(|(i, label)| offsets.get(*i).copied().flatten().map(|k| format!("{} {}", k + 1, safe_name(label, false))))
            .collect();
        if labels.is_empty() {
            return Ok(self);
        }

        self.tab()?.write_all(b"charlabels ")?.write_all(labels.join(", ").as_bytes())?.semicolon_ln()
    }

    /// Writes the TREES block, returning itself for chaining.
    ///
    /// Tree weights other than 1 are written as `[&W weight]`.
    fn trees_block(&mut self, document: &Document) -> io::Result<&mut Self> {
        self.newline()?.write_all(BLOCK_BEGIN.as_bytes())?.write_all(b" trees")?.semicolon_ln()?;
        for (i, tree) in document.trees.iter().enumerate() {
            let name = if tree.name().is_empty() { format!("tree_{}", i + 1) } else { safe_name(tree.name(), false) };
            let rooted: &[u8] = if tree.is_rooted() { b"[&R]" } else { b"[&U]" };

            // "\ttree <name> = [&R] [&W w] <Newick;>"
            self.tab()?
                .write_all(b"tree ")?
                .write_all(name.as_bytes())?
                .space()?
                .equals()?
                .space()?
                .write_all(rooted)?
                .space()?;
            if tree.weight() != 1.0 {
                self.write_all(format!("[&W {}] ", tree.weight()).as_bytes())?;
            }
            self.write_all(tree.to_newick().as_bytes())?.newline()?;
        }
        self.write_all(b"end")?.semicolon_ln()
    }

    /// Writes every kept unknown block unchanged, returning itself for chaining.
    fn unknown_blocks(&mut self, document: &Document) -> io::Result<&mut Self> {
        for block in &document.unknown_blocks {
            self.newline()?
                .write_all(BLOCK_BEGIN.as_bytes())?
                .space()?
                .write_all(block.title.as_bytes())?
                .semicolon_ln()?;
            for line in &block.lines {
                self.tab()?.write_all(line.as_bytes())?.semicolon_ln()?;
            }
            self.write_all(b"end")?.semicolon_ln()?;
        }
        Ok(self)
    }
}

/// The SETS block (or, with `codons_only`, the CODONS block) for the remaining
/// characters and taxa; empty if there is nothing to write.
fn sets_block(document: &Document, options: &WriteOptions, include_codons: bool, codons_only: bool) -> String {
    let offsets = offsets(document.nchar, &options.exclude);
    let renumber = |indices: &[usize]| -> Vec<usize> { indices.iter().filter_map(|i| offsets.get(*i).copied().flatten()).collect() };
    let deleted: HashSet<&str> = options
        .delete
        .iter()
        .map(|t| document.check_taxlabels(t).unwrap_or(t.as_str()))
        .collect();
    let is_codon_partition = |name: &str| {
        document.codonposset.as_deref() == Some(name) || name.eq_ignore_ascii_case(crate::nexus::defs::CODON_POSITIONS)
    };

    let mut commands = vec![if codons_only { "\nbegin codons".to_string() } else { "\nbegin sets".to_string() }];

    if !codons_only {
        for (name, set) in &document.charsets {
            let set = renumber(set);
            if !set.is_empty() {
                commands.push(format!("charset {} = {}", safe_name(name, false), compact_for_nexus(&set)));
            }
        }
        for (name, set) in &document.taxsets {
            let taxa: Vec<String> =
                set.iter().filter(|t| !deleted.contains(t.as_str())).map(|t| safe_name(t, options.mrbayes)).collect();
            if !taxa.is_empty() {
                commands.push(format!("taxset {} = {}", safe_name(name, false), taxa.join(" ")));
            }
        }
    }

    for (name, partition) in &document.charpartitions {
        let is_codons = is_codon_partition(name);
        if (!include_codons && is_codons) || (codons_only && !is_codons) {
            continue;
        }
        let members: Vec<String> = sorted_by_values(partition)
            .into_iter()
            .map(|(member, indices)| (member, renumber(indices)))
            .filter(|(_, indices)| !indices.is_empty())
            .map(|(member, indices)| format!("{}: {}", safe_name(member, false), compact_for_nexus(&indices)))
            .collect();
        if !members.is_empty() {
            let command = if is_codons { "codonposset" } else { "charpartition" };
            commands.push(format!("{command} {} = {}", safe_name(name, false), members.join(", ")));
        }
    }

    if !codons_only {
        for (name, partition) in &document.taxpartitions {
            let mut members: Vec<(&String, &Vec<String>)> = partition.iter().filter(|(_, taxa)| !taxa.is_empty()).collect();
            members.sort_by(|a, b| a.1.cmp(b.1));
            let members: Vec<String> = members
                .into_iter()
                .filter_map(|(member, taxa)| {
                    let taxa: Vec<String> =
                        taxa.iter().filter(|t| !deleted.contains(t.as_str())).map(|t| safe_name(t, false)).collect();
                    (!taxa.is_empty()).then(|| format!("{}: {}", safe_name(member, false), taxa.join(" ")))
                })
                .collect();
            if !members.is_empty() {
                commands.push(format!("taxpartition {} = {}", safe_name(name, false), members.join(", ")));
            }
        }
    }

    if commands.len() == 1 {
        return String::new();
    }
    commands.push("end;\n".to_string());
    commands.join(";\n")
}

/// New position of every character after leaving out `exclude`, `None` if excluded.
fn offsets(nchar: usize, exclude: &[usize]) -> Vec<Option<usize>> {
    let excluded: HashSet<usize> = exclude.iter().copied().collect();
    let mut removed = 0;
    (0..nchar)
        .map(|c| {
            if excluded.contains(&c) {
                removed += 1;
                None
            } else {
                Some(c - removed)
            }
        })
        .collect()
}

/// Remaining columns of every member of `partition`, in writing order.
///
/// Written one after another, the member blocks must reproduce the remaining
/// characters in order; otherwise a block would hold columns of other members.
fn partition_blocks<'a>(
    name: &str,
    partition: &'a CharPartition,
    nchar: usize,
    exclude: &[usize],
) -> Result<Vec<(&'a String, Vec<usize>)>, ParsingError> {
    let offsets = offsets(nchar, exclude);
    let blocks: Vec<(&String, Vec<usize>)> = sorted_by_values(partition)
        .into_iter()
        .map(|(member, indices)| {
            let columns = indices.iter().filter_map(|&c| offsets.get(c).copied().flatten()).collect();
            (member, columns)
        })
        .collect();

    let remaining = offsets.iter().flatten().count();
    if !blocks.iter().flat_map(|(_, columns)| columns.iter().copied()).eq(0..remaining) {
        return Err(ParsingError::unsupported(format!(
            "Interleaving by partition {name}: its members are not consecutive character ranges"
        )));
    }
    Ok(blocks)
}

/// Non-empty members of a partition, ordered by their index lists.
fn sorted_by_values(partition: &CharPartition) -> Vec<(&String, &Vec<usize>)> {
    let mut members: Vec<(&String, &Vec<usize>)> = partition.iter().filter(|(_, set)| !set.is_empty()).collect();
    members.sort_by(|a, b| a.1.cmp(b.1));
    members
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice to the [BufWriter], returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.bw.write_all(buf)?;
        Ok(self)
    }

    /// Appends characters to the [BufWriter], returning itself for chaining.
    fn chars(&mut self, chars: &[char]) -> io::Result<&mut Self> {
        let text: String = chars.iter().collect();
        self.write_all(text.as_bytes())
    }

    /// Appends `name` left-justified in `width` columns, returning itself for chaining.
    fn padded(&mut self, name: &str, width: usize) -> io::Result<&mut Self> {
        self.write_all(format!("{name:<width$}").as_bytes())
    }

    /// Appends a space character (' ') to the [BufWriter], returning itself for chaining.
    fn space(&mut self) -> io::Result<&mut Self> {
        self.bw.write_all(b" ")?;
        Ok(self)
    }

    /// Appends a tab character ('\t') to the [BufWriter], returning itself for chaining.
    fn tab(&mut self) -> io::Result<&mut Self> {
        self.bw.write_all(b"\t")?;
        Ok(self)
    }

    /// Appends a newline character ('\n') to the [BufWriter], returning itself for chaining.
    fn newline(&mut self) -> io::Result<&mut Self> {
        self.bw.write_all(b"\n")?;
        Ok(self)
    }

    /// Appends a semicolon followed by a newline (';\n') to the [BufWriter], returning itself for chaining.
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.bw.write_all(b";\n")?;
        Ok(self)
    }

    /// Appends an equals sign ('=') to the [BufWriter], returning itself for chaining.
    fn equals(&mut self) -> io::Result<&mut Self> {
        self.bw.write_all(b"=")?;
        Ok(self)
    }
}
