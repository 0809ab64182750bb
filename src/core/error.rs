//! Error types for pileup-inspect
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Main error type for pileup-inspect operations
#[derive(Debug, Error)]
pub enum InspectError {
    /// Text pileup parsing and tallying errors
    #[error("Pileup error: {0}")]
    Pileup(#[from] PileupError),

    /// External tool configuration and invocation errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Region staging errors
    #[error("Staging error: {0}")]
    Staging(#[from] StagingError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a tview text block at one coordinate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PileupError {
    /// The ruler line carries no coordinate digits
    #[error("Malformed ruler line, no coordinate found: {ruler:?}")]
    MalformedRuler { ruler: String },

    /// The requested coordinate is not reachable from the ruler anchor
    #[error("Coordinate {coordinate} not found in reference line (scanned {first}..={last})")]
    CoordinateNotFound { coordinate: u64, first: u64, last: u64 },

    /// A read row shows a symbol outside the tview alphabet at the target column
    #[error("Unexpected symbol {symbol:?} in read row {line} at column {column}")]
    UnexpectedSymbol { symbol: char, line: usize, column: usize },

    /// The reference line has no base at the requested column
    #[error("No reference base at column {column} (reference {found:?})")]
    NoReferenceBase { column: usize, found: Option<char> },

    /// Fewer than the three header lines
    #[error("Truncated pileup block: expected at least 3 lines, found {lines}")]
    TruncatedBlock { lines: usize },

    /// A line is not valid UTF-8
    #[error("Invalid UTF-8 at line {line}")]
    InvalidUtf8 { line: usize },
}

/// Errors from resolving and running the external samtools binary
#[derive(Debug, Error)]
pub enum ToolError {
    /// samtools neither given nor found on PATH
    #[error("samtools not found: pass --samtools or add it to PATH")]
    SamtoolsNotFound,

    /// No reference genome given and the environment fallback is unset
    #[error("Reference genome not configured: pass --genome or set ${var}")]
    GenomeNotConfigured { var: &'static str },

    /// Locus argument is not `chrom:pos`
    #[error("Invalid locus '{locus}': {message}")]
    InvalidLocus { locus: String, message: String },

    /// The process could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

#[cfg(feature = "bam")]
type HtslibError = rust_htslib::errors::Error;
#[cfg(not(feature = "bam"))]
type HtslibError = std::convert::Infallible;

/// Errors while staging a CIGAR-filtered region BAM
#[derive(Debug, Error)]
pub enum StagingError {
    /// HTSlib reader/writer/index errors
    #[error("HTSlib error: {0}")]
    Htslib(#[from] HtslibError),

    /// Temporary directory I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pileup-inspect operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Result type alias for text pileup operations
pub type PileupResult<T> = std::result::Result<T, PileupError>;

/// Result type alias for external tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for staging operations
pub type StagingResult<T> = std::result::Result<T, StagingError>;
