//! Core pileup text processing
//!
//! This module contains the tview block parser, the coordinate-to-column
//! locator, the per-strand tallier and the report renderer. Nothing here
//! performs I/O beyond writing to a caller-supplied sink.

pub mod block;
mod error;
pub mod locator;
pub mod pileup;
pub mod report;

pub use block::{AlignmentBlock, HEADER_LINES};
pub use error::{
    InspectError, PileupError, PileupResult, Result, StagingError, StagingResult, ToolError,
    ToolResult,
};
pub use locator::{is_reference_base, locate, ruler_anchor};
pub use pileup::{fragment_span, inspect, resolve_base, tally, BaseTally, Pileup, TALLY_SYMBOLS};
pub use report::{marker_line, render_fragments, render_header, render_pileup};
