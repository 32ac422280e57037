//! Newick output for [Tree]s.

use crate::model::Tree;
use std::io;
use std::io::Write;

/// Writes each tree as Newick string on its own line.
///
/// # Errors
/// Returns an I/O error if writing fails
pub fn write_newick<W: Write>(writer: &mut W, trees: &[Tree]) -> io::Result<()> {
    for tree in trees {
        writer.write_all(tree.to_newick().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
