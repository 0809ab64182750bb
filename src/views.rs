//! Query entry points
//!
//! Each view captures one tview screen around a locus and writes a report to
//! the given sink.

use crate::core::{inspect, render_pileup, AlignmentBlock, Pileup, Result};
use crate::tview::{run_tview, Locus, TviewConfig};
use std::io::Write;
use std::path::Path;

#[cfg(feature = "bam")]
use crate::tview::staging::{stage_region, ReadSelection, STAGING_PAD};

/// Base composition at a single position
///
/// Reads agreeing with the reference are counted but only shown when
/// `include_all` is set.
pub fn snv_view<W: Write>(
    config: &TviewConfig,
    bam: &Path,
    locus: &Locus,
    include_all: bool,
    out: &mut W,
) -> Result<Pileup> {
    let screen = run_tview(config, bam, locus)?;
    let block = AlignmentBlock::from_bytes(&screen)?;
    let pileup = inspect(&block, locus.pos, include_all)?;
    render_pileup(out, &block, &pileup)?;
    Ok(pileup)
}

/// tview screen printed unmodified
pub fn raw_view<W: Write>(
    config: &TviewConfig,
    bam: &Path,
    locus: &Locus,
    out: &mut W,
) -> Result<()> {
    let screen = run_tview(config, bam, locus)?;
    out.write_all(&screen)?;
    writeln!(out)?;
    Ok(())
}

/// tview screen restricted to reads selected by CIGAR
#[cfg(feature = "bam")]
pub fn cigar_view<W: Write>(
    config: &TviewConfig,
    bam: &Path,
    locus: &Locus,
    selection: ReadSelection,
    out: &mut W,
) -> Result<()> {
    let staged = stage_region(bam, locus, STAGING_PAD, selection)?;
    if staged.stats.kept == 0 {
        log::warn!("no {:?} reads around {}", selection, locus);
    }
    raw_view(config, staged.path(), locus, out)
}
