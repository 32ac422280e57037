//! Structural edits of a [Document].
//!
//! Cropping and bootstrapping produce new matrices and leave the document
//! untouched. Gap insertion, adding sequences and terminal gap replacement
//! mutate it; they validate their arguments before changing anything, and
//! keep character sets, partitions and labels consistent with the matrix.

use crate::model::alphabet::DataType;
use crate::model::{Residues, Sequence};
use crate::nexus::defs::COMBINED;
use crate::nexus::document::Document;
use crate::parser::ParsingError;
use crate::parser::utils::unique_label;
use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// Cropping & Resampling (pub)
// ============================================================================
impl Document {
    /// Rows of the matrix without deleted taxa and excluded characters.
    ///
    /// # Errors
    /// Returns an error if a deleted taxon is not in the document.
    pub fn crop_matrix(&self, delete: &[String], exclude: &[usize]) -> Result<HashMap<String, Sequence>, ParsingError> {
        self.crop_rows(&self.matrix, delete, exclude)
    }

    /// Crops any taxon → row map whose taxa belong to this document.
    ///
    /// Taxa missing from `rows` are skipped, rows keep their representation.
    pub fn crop_rows<R: Residues>(
        &self,
        rows: &HashMap<String, R>,
        delete: &[String],
        exclude: &[usize],
    ) -> Result<HashMap<String, R>, ParsingError> {
        let deleted = self.canonical_taxa(delete)?;
        let excluded: HashSet<usize> = exclude.iter().copied().collect();

        let cropped = self
            .taxlabels
            .iter()
            .filter(|t| !deleted.contains(t.as_str()))
            .filter_map(|t| rows.get(t).map(|row| (t, row)))
            .map(|(taxon, row)| {
                let row = if excluded.is_empty() {
                    row.clone()
                } else {
                    let kept = row
                        .residues()
                        .chars()
                        .enumerate()
                        .filter(|(i, _)| !excluded.contains(i))
                        .map(|(_, c)| c)
                        .collect();
                    row.with_residues(kept)
                };
                (taxon.clone(), row)
            })
            .collect();

        Ok(cropped)
    }

    /// The matrix as plain strings.
    pub fn string_matrix(&self) -> HashMap<String, String> {
        self.matrix
            .iter()
            .map(|(taxon, sequence)| (taxon.clone(), sequence.as_str().to_string()))
            .collect()
    }

    /// Bootstrap replicate of the cropped `rows`: as many columns as there are,
    /// each drawn uniformly with replacement.
    pub fn bootstrap<R: Residues, G: Rng + ?Sized>(
        &self,
        rows: &HashMap<String, R>,
        delete: &[String],
        exclude: &[usize],
        rng: &mut G,
    ) -> Result<HashMap<String, R>, ParsingError> {
        let cropped = self.crop_rows(rows, delete, exclude)?;
        let taxa: Vec<&String> = self.taxlabels.iter().filter(|t| cropped.contains_key(*t)).collect();

        let Some(first) = taxa.first() else {
            return Ok(cropped);
        };
        let num_sites = cropped[*first].residues().chars().count();
        if num_sites == 0 {
            return Ok(cropped);
        }

        let columns: Vec<Vec<char>> = taxa.iter().map(|t| cropped[*t].residues().chars().collect()).collect();
        let picks: Vec<usize> = (0..num_sites).map(|_| rng.gen_range(0..num_sites)).collect();

        let resampled = taxa
            .iter()
            .zip(&columns)
            .map(|(taxon, chars)| {
                let residues: String = picks.iter().map(|&i| chars[i]).collect();
                ((*taxon).clone(), cropped[*taxon].with_residues(residues))
            })
            .collect();

        Ok(resampled)
    }
}

// ============================================================================
// Mutating Edits (pub)
// ============================================================================
impl Document {
    /// Inserts `n` gap columns before position `pos` (`0..=nchar`).
    ///
    /// Set and partition indices from `pos` on move right by `n`. An index equal
    /// to `pos` pulls the new columns into its set if `leftgreedy` is set or its
    /// predecessor `pos - 1` is in the set as well.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::Document;
    ///
    /// let mut doc: Document = "begin data; dimensions ntax=1 nchar=10;
    ///     format datatype=dna; matrix A ACGTACGTAC; charset s = 3 4 9 10; end;"
    ///     .parse()
    ///     .unwrap();
    /// doc.insert_gap(5, 3, false).unwrap();
    /// assert_eq!(doc.charsets()["s"], [2, 3, 11, 12]);
    /// assert_eq!(doc.sequence("A").unwrap().as_str(), "ACGTA---CGTAC");
    /// ```
    pub fn insert_gap(&mut self, pos: usize, n: usize, leftgreedy: bool) -> Result<(), ParsingError> {
        if pos > self.nchar {
            return Err(ParsingError::invalid_edit(format!("Illegal gap position: {pos}")));
        }
        if n == 0 {
            return Ok(());
        }

        let gaps: String = std::iter::repeat(self.gap).take(n).collect();
        for sequence in self.matrix.values_mut() {
            let mut residues: Vec<char> = sequence.as_str().chars().collect();
            residues.splice(pos..pos, gaps.chars());
            *sequence = Sequence::new(residues.into_iter().collect::<String>(), sequence.datatype());
        }
        self.nchar += n;

        for set in self.charsets.values_mut() {
            shift_for_insert(set, pos, n, leftgreedy);
        }
        for partition in self.charpartitions.values_mut() {
            for set in partition.values_mut() {
                shift_for_insert(set, pos, n, leftgreedy);
            }
        }
        self.charlabels = shift_keys(std::mem::take(&mut self.charlabels), pos, n);
        self.statelabels = shift_keys(std::mem::take(&mut self.statelabels), pos, n);

        log::debug!("inserted {n} gaps at position {pos}");
        Ok(())
    }

    /// Appends a sequence; returns the (possibly disambiguated) taxon label.
    ///
    /// A shorter sequence is padded with the missing symbol, a longer one
    /// extends all other sequences with gaps.
    pub fn add_sequence(&mut self, name: &str, sequence: &str) -> Result<String, ParsingError> {
        if name.is_empty() {
            return Err(ParsingError::invalid_edit("New sequence must have a name"));
        }
        let mut residues = Sequence::new(sequence, self.datatype);
        if let Some(c) = residues.invalid_residue(|c| self.is_valid_char(c)) {
            return Err(ParsingError::illegal_character(name, c, sequence));
        }

        let len = residues.len();
        if len > self.nchar {
            self.insert_gap(self.nchar, len - self.nchar, false)?;
        } else {
            let padding: String = std::iter::repeat(self.missing).take(self.nchar - len).collect();
            residues.push_str(&padding);
        }

        let taxon = unique_label(name, |l| self.taxlabels.iter().any(|t| t == l));
        assert!(!self.matrix.contains_key(&taxon), "taxon labels diverged from matrix keys");

        self.matrix.insert(taxon.clone(), residues);
        self.ntax += 1;
        self.taxlabels.push(taxon.clone());
        self.unaltered_taxlabels.push(name.to_string());
        Ok(taxon)
    }

    /// Replaces leading and trailing gaps and missing symbols (and `N`s unless
    /// `skip_n`) with `missing`, which defaults to the document's missing symbol.
    pub fn terminal_gap_to_missing(&mut self, missing: Option<char>, skip_n: bool) {
        let missing = missing.unwrap_or(self.missing);
        let mut replace = vec![self.missing, self.gap];
        if !skip_n {
            replace.extend(['n', 'N']);
        }

        for sequence in self.matrix.values_mut() {
            let residues: Vec<char> = sequence.as_str().chars().collect();
            let start = residues.iter().position(|c| !replace.contains(c));
            let end = residues.iter().rposition(|c| !replace.contains(c));

            let replaced: String = match (start, end) {
                (Some(start), Some(end)) => residues
                    .iter()
                    .enumerate()
                    .map(|(i, c)| if i < start || i > end { missing } else { *c })
                    .collect(),
                _ => std::iter::repeat(missing).take(residues.len()).collect(),
            };
            *sequence = Sequence::new(replaced, sequence.datatype());
        }
    }
}

// ============================================================================
// Site Queries (pub)
// ============================================================================
impl Document {
    /// All character indices not in `charlist`.
    pub fn invert(&self, charlist: &[usize]) -> Vec<usize> {
        let listed: HashSet<usize> = charlist.iter().copied().collect();
        (0..self.nchar).filter(|c| !listed.contains(c)).collect()
    }

    /// Sites holding nothing but gaps (or missing symbols, if `include_missing`).
    pub fn gaponly(&self, include_missing: bool) -> Vec<usize> {
        let rows: Vec<Vec<char>> = self.taxlabels.iter().map(|t| self.row(t).as_str().chars().collect()).collect();
        (0..self.nchar)
            .filter(|&i| {
                rows.iter().all(|row| {
                    let c = row[i];
                    c == self.gap || (include_missing && c == self.missing)
                })
            })
            .collect()
    }
}

// ============================================================================
// Crate internals
// ============================================================================
impl Document {
    /// Canonical labels of the given taxa.
    ///
    /// # Errors
    /// Returns an error naming the taxa that are not in this document.
    pub(crate) fn canonical_taxa(&self, taxa: &[String]) -> Result<HashSet<String>, ParsingError> {
        let mut canonical = HashSet::with_capacity(taxa.len());
        let mut unknown = Vec::new();
        for taxon in taxa {
            match self.check_taxlabels(taxon) {
                Some(label) => {
                    canonical.insert(label.to_string());
                }
                None => unknown.push(taxon.as_str()),
            }
        }

        if unknown.is_empty() {
            Ok(canonical)
        } else {
            Err(ParsingError::unresolved_identifier(format!("Unknown taxa: {}", unknown.join(", "))))
        }
    }
}

/// Moves indices `>= x` right by `d`; see [Document::insert_gap] for when the
/// new columns join the set.
fn shift_for_insert(set: &mut Vec<usize>, x: usize, d: usize, leftgreedy: bool) {
    set.sort_unstable();
    let mut addpos = None;
    for i in 0..set.len() {
        let c = set[i];
        if c >= x {
            set[i] = c + d;
        }
        if c == x && (leftgreedy || (i > 0 && set[i - 1] + 1 == c)) {
            addpos = Some(i);
        }
    }
    if let Some(i) = addpos {
        set.splice(i..i, x..x + d);
    }
}

fn shift_keys<V>(map: BTreeMap<usize, V>, x: usize, d: usize) -> BTreeMap<usize, V> {
    map.into_iter().map(|(k, v)| (if k >= x { k + d } else { k }, v)).collect()
}

// =#========================================================================#=
// COMBINING DOCUMENTS
// =#========================================================================#=
/// Concatenates the matrices of several documents.
///
/// The first document is the base. Taxa missing from one of the sources get
/// the missing symbol over that source's columns. Character and taxon sets
/// are prefixed with the source name (`name.set`), and a partition `combined`
/// (and a character set per source) records each source's columns. Mixed
/// datatypes give [DataType::Indeterminate].
///
/// # Errors
/// Returns an error if no documents are given.
pub fn combine(matrices: &[(&str, &Document)]) -> Result<Document, ParsingError> {
    let Some(((first_name, first), rest)) = matrices.split_first() else {
        return Err(ParsingError::invalid_edit("Nothing to combine"));
    };

    let mut combined = (*first).clone();
    let datatypes: HashSet<DataType> = matrices.iter().map(|(_, m)| m.datatype).collect();
    if datatypes.len() > 1 {
        log::warn!("combining matrices of different datatypes");
        combined.datatype = DataType::Indeterminate;
    }
    combined.statelabels.clear();
    combined.interleave = false;
    combined.translate = None;
    combined.codonposset = None;
    combined.charsets = prefixed(first_name, std::mem::take(&mut combined.charsets));
    combined.taxsets = prefixed(first_name, std::mem::take(&mut combined.taxsets));

    let mut parts = BTreeMap::new();
    parts.insert(first_name.to_string(), (0..combined.nchar).collect::<Vec<usize>>());

    for (name, m) in rest {
        let offset = combined.nchar;
        let known: HashSet<&String> = combined.taxlabels.iter().collect();
        let m_only: Vec<String> = m.taxlabels.iter().filter(|t| !known.contains(t)).cloned().collect();
        let unify = |taxon: &str| -> String {
            m.row(taxon)
                .as_str()
                .chars()
                .map(|c| if c == m.gap { combined.gap } else if c == m.missing { combined.missing } else { c })
                .collect()
        };

        let mut appended: HashMap<String, String> = HashMap::with_capacity(combined.taxlabels.len());
        for taxon in &combined.taxlabels {
            let residues = if m.matrix.contains_key(taxon) {
                unify(taxon)
            } else {
                std::iter::repeat(combined.missing).take(m.nchar).collect()
            };
            appended.insert(taxon.clone(), residues);
        }
        let padding: String = std::iter::repeat(combined.missing).take(offset).collect();
        let added: Vec<(String, String)> = m_only.iter().map(|t| (t.clone(), format!("{padding}{}", unify(t)))).collect();

        for (taxon, residues) in appended {
            if let Some(sequence) = combined.matrix.get_mut(&taxon) {
                sequence.push_str(&residues);
            }
        }
        let datatype = combined.datatype;
        for (taxon, residues) in added {
            combined.matrix.insert(taxon.clone(), Sequence::new(residues, datatype));
            combined.taxlabels.push(taxon.clone());
            combined.unaltered_taxlabels.push(taxon);
        }

        for (set, indices) in &m.charsets {
            combined.charsets.insert(format!("{name}.{set}"), indices.iter().map(|i| i + offset).collect());
        }
        for (set, taxa) in &m.taxsets {
            combined.taxsets.insert(format!("{name}.{set}"), taxa.clone());
        }
        for (i, label) in &m.charlabels {
            combined.charlabels.insert(offset + i, label.clone());
        }
        parts.insert(name.to_string(), (offset..offset + m.nchar).collect());

        combined.nchar += m.nchar;
        combined.ntax += m_only.len();
    }

    for (part, indices) in &parts {
        combined.charsets.insert(part.clone(), indices.clone());
    }
    combined.charpartitions = BTreeMap::from([(COMBINED.to_string(), parts)]);

    Ok(combined)
}

fn prefixed<V>(prefix: &str, sets: BTreeMap<String, V>) -> BTreeMap<String, V> {
    sets.into_iter().map(|(name, set)| (format!("{prefix}.{name}"), set)).collect()
}
