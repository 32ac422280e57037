//! Site analysis and step matrices for weighted parsimony.
//!
//! See Wheeler (1990), Cladistics 6:269-275 and Felsenstein (1981),
//! Biol. J. Linn. Soc. 16:183-196.

use crate::nexus::document::Document;
use crate::parser::ParsingError;
use std::collections::{BTreeMap, HashSet};

// =#========================================================================#=
// STEP MATRIX
// =#========================================================================#=
/// Symmetric symbol × symbol cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct StepMatrix {
    symbols: Vec<char>,
    /// Keyed by ordered pairs `(x, y)` with `x < y`
    data: BTreeMap<(char, char), f64>,
}

impl StepMatrix {
    /// Creates a zero matrix over the sorted `symbols`, with `gap` appended last.
    pub fn new(symbols: &str, gap: Option<char>) -> Self {
        let mut sorted: Vec<char> = symbols.chars().collect();
        sorted.sort_unstable();
        sorted.extend(gap);

        let mut matrix = StepMatrix { symbols: sorted, data: BTreeMap::new() };
        for (i, &x) in matrix.symbols.iter().enumerate() {
            for &y in &matrix.symbols[i + 1..] {
                matrix.data.insert(ordered(x, y), 0.0);
            }
        }
        matrix
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Value for the pair `x`, `y` (in either order).
    pub fn get(&self, x: char, y: char) -> Option<f64> {
        self.data.get(&ordered(x, y)).copied()
    }

    pub fn set(&mut self, x: char, y: char, value: f64) {
        self.data.insert(ordered(x, y), value);
    }

    pub fn add(&mut self, x: char, y: char, value: f64) {
        *self.data.entry(ordered(x, y)).or_insert(0.0) += value;
    }

    pub fn sum(&self) -> f64 {
        self.data.values().sum()
    }

    /// Scales all values to relative frequencies (unless all are zero).
    pub fn transformation(&mut self) -> &mut Self {
        let total = self.sum();
        if total != 0.0 {
            for value in self.data.values_mut() {
                *value /= total;
            }
        }
        self
    }

    /// Replaces every non-zero frequency `f` by its cost `-ln(f)`.
    pub fn weighting(&mut self) -> &mut Self {
        for value in self.data.values_mut().filter(|v| **v != 0.0) {
            *value = -value.ln();
        }
        self
    }

    /// Formats the matrix as PAUP `usertype` command.
    ///
    /// Diagonal cells are `.`, zero cells (pairs never observed) `inf.`.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::StepMatrix;
    ///
    /// let mut matrix = StepMatrix::new("BA", None);
    /// matrix.set('A', 'B', 0.5);
    /// assert_eq!(
    ///     matrix.smprint("w"),
    ///     "usertype w stepmatrix=2\n        A        B\n[A]     .       0.50     \n[B]    0.50      .       \n;\n"
    /// );
    /// ```
    pub fn smprint(&self, name: &str) -> String {
        let header: Vec<String> = self.symbols.iter().map(char::to_string).collect();
        let mut out = format!("usertype {name} stepmatrix={}\n", self.symbols.len());
        out.push_str(&format!("        {}\n", header.join("        ")));

        for &x in &self.symbols {
            out.push_str(&format!("[{x}]    "));
            for &y in &self.symbols {
                if x == y {
                    out.push_str(" .       ");
                } else {
                    match self.get(x, y).unwrap_or(0.0) {
                        v if v == 0.0 => out.push_str("inf.     "),
                        v => out.push_str(&format!("{v:.2}     ")),
                    }
                }
            }
            out.push('\n');
        }
        out.push_str(";\n");
        out
    }
}

fn ordered(x: char, y: char) -> (char, char) {
    if x > y { (y, x) } else { (x, y) }
}

// ============================================================================
// Site Analysis (pub)
// ============================================================================
impl Document {
    /// Constant sites among the non-deleted taxa, ignoring excluded sites.
    ///
    /// Missing data (and gaps, with `gapmode=missing`) are compatible with every
    /// state; ambiguity codes are compatible if their expansions intersect.
    pub fn constant(&self, delete: &[String], exclude: &[usize]) -> Result<Vec<usize>, ParsingError> {
        let deleted = self.canonical_taxa(delete)?;
        let excluded: HashSet<usize> = exclude.iter().copied().collect();
        let rows: Vec<Vec<char>> = self
            .taxlabels
            .iter()
            .filter(|t| !deleted.contains(*t))
            .map(|t| self.row(t).as_str().chars().collect())
            .collect();

        let Some((first, rest)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        let gap_is_missing = self.gap_is_missing();
        let missing = self.missing.to_string();
        let gap = self.gap.to_string();

        let mut constant: Vec<(usize, String)> = first
            .iter()
            .enumerate()
            .filter(|(i, _)| !excluded.contains(i))
            .map(|(i, c)| (i, self.alphabet.expand(*c)))
            .collect();

        for row in rest {
            constant = constant
                .into_iter()
                .filter_map(|(i, states)| {
                    let c = row[i].to_ascii_uppercase();
                    if c == self.missing || (gap_is_missing && c == self.gap) || states == c.to_string() {
                        Some((i, states))
                    } else if states.contains(c) || states == missing || (gap_is_missing && states == gap) {
                        Some((i, self.alphabet.expand(c)))
                    } else if self.alphabet.ambiguous_values().contains_key(&c) {
                        let shared: String = self.alphabet.expand(c).chars().filter(|s| states.contains(*s)).collect();
                        (!shared.is_empty()).then_some((i, shared))
                    } else {
                        None
                    }
                })
                .collect();
        }

        Ok(constant.into_iter().map(|(i, _)| i).collect())
    }

    /// Sorted states observed at `site` among the non-deleted taxa.
    ///
    /// With `narrow`, missing data only counts if nothing else is observed
    /// (`a c ?` gives `a c`, `? ? ?` gives `?`); otherwise it expands to every state.
    pub fn cstatus(&self, site: usize, delete: &[String], narrow: bool) -> Result<Vec<char>, ParsingError> {
        if site >= self.nchar {
            return Err(ParsingError::invalid_edit(format!("Site {site} out of range")));
        }
        let deleted = self.canonical_taxa(delete)?;
        let gap_is_missing = self.gap_is_missing();

        let mut states: Vec<char> = Vec::new();
        for taxon in self.taxlabels.iter().filter(|t| !deleted.contains(*t)) {
            let mut c = self.row(taxon).residue(site).unwrap_or(self.missing).to_ascii_uppercase();
            if gap_is_missing && c == self.gap {
                c = self.missing;
            }
            if narrow && c == self.missing {
                if !states.contains(&c) {
                    states.push(c);
                }
            } else {
                for s in self.alphabet.expand(c).chars() {
                    if !states.contains(&s) {
                        states.push(s);
                    }
                }
            }
        }

        if narrow && states.len() > 1 {
            states.retain(|c| *c != self.missing);
        }
        states.sort_unstable();
        Ok(states)
    }

    /// Step matrix of state co-occurrences over all non-excluded sites,
    /// transformed to frequencies and weighted, formatted as `usertype` command.
    pub fn weighted_stepmatrix(&self, name: &str, exclude: &[usize], delete: &[String]) -> Result<String, ParsingError> {
        let excluded: HashSet<usize> = exclude.iter().copied().collect();
        let mut matrix = StepMatrix::new(self.alphabet.unambiguous_letters(), Some(self.gap));

        for site in (0..self.nchar).filter(|s| !excluded.contains(s)) {
            let states = self.cstatus(site, delete, true)?;
            for (i, &x) in states.iter().enumerate() {
                for &y in &states[i + 1..] {
                    matrix.add(x.to_ascii_uppercase(), y.to_ascii_uppercase(), 1.0);
                }
            }
        }

        Ok(matrix.transformation().weighting().smprint(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        "begin data; dimensions ntax=3 nchar=6; format datatype=dna;
         matrix
           A ACGTRA
           B AC?TGC
           C AG-TAC
         ;
         end;"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_constant_sites_honour_missing_and_ambiguity() {
        let doc = document();
        assert_eq!(doc.constant(&[], &[]).unwrap(), [0, 2, 3]);
        assert_eq!(doc.constant(&["C".into()], &[0]).unwrap(), [1, 2, 3, 4]);
        assert!(doc.constant(&["D".into()], &[]).is_err());
    }

    #[test]
    fn test_cstatus_narrow_and_wide() {
        let doc = document();
        assert_eq!(doc.cstatus(1, &[], true).unwrap(), ['C', 'G']);
        assert_eq!(doc.cstatus(2, &["A".into()], true).unwrap(), ['?']);
        assert_eq!(doc.cstatus(2, &["A".into()], false).unwrap(), ['-', 'A', 'C', 'G', 'T']);
        assert!(doc.cstatus(6, &[], true).is_err());
    }

    #[test]
    fn test_weighted_stepmatrix() {
        let doc = document();
        let printed = doc.weighted_stepmatrix("w", &[], &[]).unwrap();
        assert!(printed.starts_with("usertype w stepmatrix=5\n        A        C        G        T        -\n"));
        assert!(printed.ends_with(";\n"));
        // A-C and C-G co-occur, A-T never does
        assert!(printed.contains("[A]     .       "));
        assert!(printed.lines().nth(2).unwrap().contains("inf."));
    }

    #[test]
    fn test_transformation_and_weighting() {
        let mut matrix = StepMatrix::new("AC", None);
        matrix.add('C', 'A', 2.0);
        assert_eq!(matrix.sum(), 2.0);
        matrix.transformation();
        assert_eq!(matrix.get('A', 'C'), Some(1.0));
        matrix.weighting();
        assert_eq!(matrix.get('C', 'A'), Some(0.0));
    }
}
