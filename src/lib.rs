//! pileup-inspect - per-strand base tallies from samtools tview screens
//!
//! Reads the fixed-width text pileup printed by `samtools tview -d T` and
//! reports, for one reference coordinate, which bases the overlapping reads
//! show on each strand.
//!
//! # Features
//!
//! - Ruler-anchored coordinate to screen column translation, insertion aware
//! - Expansion of the `.`/`,` match shorthand into explicit per-strand bases
//! - Covering-fragment extraction for a compact, column-aligned read display
//! - Indel and soft-clip views over CIGAR-filtered reads (`bam` feature)
//!
//! # Example
//!
//! ```
//! use pileup_inspect::core::{inspect, AlignmentBlock};
//!
//! let block = AlignmentBlock::parse(
//!     "        100\n    ACGTACGTAC\n    ACGTACGTAC\n        ...A\n        ,,,,\n",
//! ).unwrap();
//! let pileup = inspect(&block, 103, false).unwrap();
//! assert_eq!(pileup.column, 11);
//! assert_eq!(pileup.tally.count(b'A'), 1);
//! assert_eq!(pileup.tally.count(b't'), 1);
//! ```

pub mod core;
pub mod tview;
pub mod views;

// Re-export commonly used types
pub use core::{
    inspect, locate, tally, AlignmentBlock, BaseTally, InspectError, Pileup, PileupError,
    ToolError,
};
pub use tview::{Locus, TviewConfig};
