//! Plain-text exports of the matrix.

use crate::nexus::document::Document;
use crate::parser::utils::safe_name;

impl Document {
    /// The matrix in FASTA format, sequences wrapped after `width` characters.
    ///
    /// A `width` of 0 writes every sequence on a single line.
    ///
    /// # Example
    /// ```
    /// use nexalign::nexus::Document;
    ///
    /// let doc: Document = "begin data; dimensions ntax=1 nchar=5; format datatype=dna;
    ///     matrix 'Red fox' ACGTA; end;".parse().unwrap();
    /// assert_eq!(doc.export_fasta(3), ">'Red fox'\nACG\nTA\n");
    /// ```
    pub fn export_fasta(&self, width: usize) -> String {
        let mut out = String::new();
        for taxon in &self.taxlabels {
            out.push('>');
            out.push_str(&safe_name(taxon, false));
            out.push('\n');

            let residues: Vec<char> = self.row(taxon).as_str().chars().collect();
            let width = if width == 0 { residues.len().max(1) } else { width };
            for line in residues.chunks(width) {
                out.extend(line);
                out.push('\n');
            }
        }
        out
    }

    /// The matrix in relaxed PHYLIP format: `ntax nchar`, then one `name sequence`
    /// line per taxon. Names are neither truncated nor padded.
    pub fn export_phylip(&self) -> String {
        let mut out = format!("{} {}\n", self.ntax, self.nchar);
        for taxon in &self.taxlabels {
            out.push_str(&format!("{} {}\n", safe_name(taxon, false), self.row(taxon)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phylip_and_unwrapped_fasta() {
        let doc: Document = "begin data; dimensions ntax=2 nchar=4; format datatype=dna;
            matrix\n Fox ACGT\n Wolf AC-T\n; end;"
            .parse()
            .unwrap();
        assert_eq!(doc.export_phylip(), "2 4\nFox ACGT\nWolf AC-T\n");
        assert_eq!(doc.export_fasta(0), ">Fox\nACGT\n>Wolf\nAC-T\n");
    }
}
