//! Text report for one pileup query
//!
//! Layout: the three tview header lines, a caret under the queried column,
//! the selected read fragments and the per-strand tally table.

use super::block::AlignmentBlock;
use super::pileup::{BaseTally, Pileup};
use std::fmt;
use std::io::{self, Write};

/// Column labels of the tally table
pub const TALLY_HEADER: [&str; 5] = ["A", "C", "G", "T", "N/*"];

impl fmt::Display for BaseTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "      {}", TALLY_HEADER.join("     "))?;
        write_row(f, '+', self.forward_row())?;
        writeln!(f)?;
        write_row(f, '-', self.reverse_row())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, strand: char, counts: [usize; 5]) -> fmt::Result {
    write!(f, "{}", strand)?;
    for count in counts {
        write!(f, " {:5}", count)?;
    }
    Ok(())
}

/// Caret line pointing at `column`
pub fn marker_line(column: usize) -> String {
    format!("{}^", " ".repeat(column))
}

/// Header lines and the column marker
pub fn render_header<W: Write>(out: &mut W, block: &AlignmentBlock, column: usize) -> io::Result<()> {
    writeln!(out, "{}", block.ruler())?;
    writeln!(out, "{}", block.reference())?;
    writeln!(out, "{}", block.consensus())?;
    writeln!(out, "{}", marker_line(column))
}

/// Selected fragments, one per line; an empty selection still prints one blank line
pub fn render_fragments<W: Write>(out: &mut W, fragments: &[String]) -> io::Result<()> {
    writeln!(out, "{}", fragments.join("\n"))
}

/// Full report for `pileup`
pub fn render_pileup<W: Write>(out: &mut W, block: &AlignmentBlock, pileup: &Pileup) -> io::Result<()> {
    render_header(out, block, pileup.column)?;
    render_fragments(out, &pileup.fragments)?;
    writeln!(out, "{}", pileup.tally)
}
