//! tview text block
//!
//! `samtools tview -d T` prints a fixed-width screen: a ruler, the
//! reference, a consensus line and one row per read. Every line shares the
//! same column coordinates, so a column index means the same reference
//! position on every line.

use super::error::{PileupError, PileupResult};
use memchr::memchr;

/// Number of header lines preceding the read rows
pub const HEADER_LINES: usize = 3;

/// One captured tview screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    lines: Vec<String>,
}

impl AlignmentBlock {
    /// Parse raw tview stdout
    pub fn from_bytes(bytes: &[u8]) -> PileupResult<Self> {
        let bytes = trim_newlines(bytes);

        let mut lines = Vec::new();
        let mut pos = 0;
        loop {
            let end = memchr(b'\n', &bytes[pos..]).map(|i| pos + i);
            let raw = &bytes[pos..end.unwrap_or(bytes.len())];
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = std::str::from_utf8(raw)
                .map_err(|_| PileupError::InvalidUtf8 { line: lines.len() + 1 })?;
            lines.push(line.to_string());

            match end {
                Some(newline) => pos = newline + 1,
                None => break,
            }
        }

        Self::from_lines(lines)
    }

    /// Parse tview output already decoded as text
    pub fn parse(text: &str) -> PileupResult<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Build a block from pre-split lines
    pub fn from_lines<I, S>(lines: I) -> PileupResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.len() < HEADER_LINES {
            return Err(PileupError::TruncatedBlock { lines: lines.len() });
        }
        Ok(Self { lines })
    }

    pub fn ruler(&self) -> &str {
        &self.lines[0]
    }

    pub fn reference(&self) -> &str {
        &self.lines[1]
    }

    pub fn consensus(&self) -> &str {
        &self.lines[2]
    }

    /// Read rows, top to bottom
    pub fn reads(&self) -> &[String] {
        &self.lines[HEADER_LINES..]
    }

    /// Screen width: the longest line
    pub fn width(&self) -> usize {
        self.lines.iter().map(String::len).max().unwrap_or(0)
    }
}

fn trim_newlines(mut bytes: &[u8]) -> &[u8] {
    while let [b'\n', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b'\n'] = bytes {
        bytes = rest;
    }
    bytes
}
