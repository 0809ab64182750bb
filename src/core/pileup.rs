//! Pileup tallying at one screen column
//!
//! Read rows use tview's shorthand: `.` and `,` repeat the reference base on
//! the forward and reverse strand, explicit letters carry their own case
//! (uppercase forward, lowercase reverse) and `*` marks a deletion.

use super::block::AlignmentBlock;
use super::error::{PileupError, PileupResult};
use super::locator::{is_reference_base, locate};

/// Forward-strand match shorthand
pub const FORWARD_MATCH: u8 = b'.';
/// Reverse-strand match shorthand
pub const REVERSE_MATCH: u8 = b',';

/// Every symbol a tally slot exists for
pub const TALLY_SYMBOLS: [u8; 11] = *b"ACGTNacgtn*";

/// Per-base, per-strand read counts at one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTally {
    counts: [usize; TALLY_SYMBOLS.len()],
}

impl BaseTally {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn slot(symbol: u8) -> Option<usize> {
        TALLY_SYMBOLS.iter().position(|&s| s == symbol)
    }

    /// Count one read showing `symbol`
    ///
    /// Returns false, leaving the tally unchanged, for symbols without a slot.
    pub fn record(&mut self, symbol: u8) -> bool {
        match Self::slot(symbol) {
            Some(i) => {
                self.counts[i] += 1;
                true
            }
            None => false,
        }
    }

    pub fn count(&self, symbol: u8) -> usize {
        Self::slot(symbol).map_or(0, |i| self.counts[i])
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `A C G T` and `N`+`n` combined
    pub fn forward_row(&self) -> [usize; 5] {
        [
            self.count(b'A'),
            self.count(b'C'),
            self.count(b'G'),
            self.count(b'T'),
            self.count(b'N') + self.count(b'n'),
        ]
    }

    /// `a c g t` and deletions
    pub fn reverse_row(&self) -> [usize; 5] {
        [
            self.count(b'a'),
            self.count(b'c'),
            self.count(b'g'),
            self.count(b't'),
            self.count(b'*'),
        ]
    }
}

/// Result of one query against a tview block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pileup {
    /// Zero-based screen column of the queried coordinate
    pub column: usize,
    /// Reference character at that column
    pub reference_base: u8,
    pub tally: BaseTally,
    /// Display rows, each reduced to its covering fragment, in descending order
    pub fragments: Vec<String>,
}

/// Read symbol at `column`, `None` when the row has no coverage there
#[inline]
pub fn symbol_at(line: &str, column: usize) -> Option<u8> {
    line.as_bytes()
        .get(column)
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
}

/// Base a read symbol stands for, expanding the match shorthand
#[inline]
pub fn resolve_base(symbol: u8, reference_base: u8) -> u8 {
    match symbol {
        FORWARD_MATCH => reference_base.to_ascii_uppercase(),
        REVERSE_MATCH => reference_base.to_ascii_lowercase(),
        other => other,
    }
}

/// Whether a read symbol agrees with the reference
#[inline]
pub fn matches_reference(symbol: u8, reference_base: u8) -> bool {
    symbol == FORWARD_MATCH || symbol == REVERSE_MATCH || symbol == reference_base
}

/// Blank everything on `line` but the whitespace-delimited run covering `column`
///
/// The returned line has the same length as the input.
///
/// # Examples
/// ```
/// use pileup_inspect::core::pileup::fragment_span;
///
/// assert_eq!(fragment_span("..A,  .,G.  ,,", 7), "      .,G.    ");
/// ```
pub fn fragment_span(line: &str, column: usize) -> String {
    let bytes = line.as_bytes();
    let column = column.min(bytes.len());

    let start = bytes[..column]
        .iter()
        .rposition(u8::is_ascii_whitespace)
        .map_or(0, |ws| ws + 1);
    let end = bytes[column..]
        .iter()
        .position(u8::is_ascii_whitespace)
        .map_or(bytes.len(), |ws| column + ws);

    let mut out = String::with_capacity(bytes.len());
    out.extend(std::iter::repeat(' ').take(start));
    out.push_str(&line[start..end]);
    out.extend(std::iter::repeat(' ').take(bytes.len() - end));
    out
}

/// Tally the read rows of `block` at `column`
///
/// `column` must hold a reference base, as any column returned by `locate` does.
pub fn tally(
    block: &AlignmentBlock,
    column: usize,
    include_reference_matches: bool,
) -> PileupResult<(BaseTally, Vec<String>)> {
    let found = block.reference().as_bytes().get(column).copied();
    let reference_base = found
        .filter(|&b| is_reference_base(b))
        .ok_or_else(|| PileupError::NoReferenceBase {
            column,
            found: found.map(char::from),
        })?;
    tally_reads(block.reads(), column, reference_base, include_reference_matches)
}

fn tally_reads(
    reads: &[String],
    column: usize,
    reference_base: u8,
    include_reference_matches: bool,
) -> PileupResult<(BaseTally, Vec<String>)> {
    let mut counts = BaseTally::new();
    let mut fragments = Vec::new();

    for (row, line) in reads.iter().enumerate() {
        let Some(symbol) = symbol_at(line, column) else {
            continue;
        };

        let base = resolve_base(symbol, reference_base);
        if !counts.record(base) {
            return Err(PileupError::UnexpectedSymbol {
                symbol: char::from(symbol),
                line: row + 1,
                column,
            });
        }

        if !include_reference_matches && matches_reference(symbol, reference_base) {
            continue;
        }
        fragments.push(fragment_span(line, column));
    }

    fragments.sort_unstable_by(|a, b| b.cmp(a));
    Ok((counts, fragments))
}

/// Locate `coordinate` in `block` and tally the reads covering it
pub fn inspect(
    block: &AlignmentBlock,
    coordinate: u64,
    include_reference_matches: bool,
) -> PileupResult<Pileup> {
    let column = locate(block.ruler(), block.reference(), coordinate)?;
    let reference_base = block.reference().as_bytes()[column];
    let (tally, fragments) =
        tally_reads(block.reads(), column, reference_base, include_reference_matches)?;

    log::debug!(
        "coordinate {} -> column {} (ref {}): {} covering reads, {} shown",
        coordinate,
        column,
        char::from(reference_base),
        tally.total(),
        fragments.len()
    );

    Ok(Pileup {
        column,
        reference_base,
        tally,
        fragments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(reads: &[&str]) -> AlignmentBlock {
        let mut lines = vec!["1", "ACGTG", "ACGTG"];
        lines.extend_from_slice(reads);
        AlignmentBlock::from_lines(lines).unwrap()
    }

    #[test]
    fn test_tally_record_and_rows() {
        let mut t = BaseTally::new();
        for &s in b"AAcNn**g" {
            assert!(t.record(s));
        }
        assert!(!t.record(b'X'));
        assert_eq!(t.total(), 8);
        assert_eq!(t.forward_row(), [2, 0, 0, 0, 2]);
        assert_eq!(t.reverse_row(), [0, 1, 1, 0, 2]);
    }

    #[test]
    fn test_resolve_shorthand() {
        assert_eq!(resolve_base(b'.', b'G'), b'G');
        assert_eq!(resolve_base(b',', b'G'), b'g');
        assert_eq!(resolve_base(b'.', b'g'), b'G');
        assert_eq!(resolve_base(b't', b'G'), b't');
        assert_eq!(resolve_base(b'*', b'G'), b'*');
    }

    #[test]
    fn test_symbol_at_out_of_range_is_uncovered() {
        assert_eq!(symbol_at("..", 5), None);
        assert_eq!(symbol_at(". .", 1), None);
        assert_eq!(symbol_at(". .", 2), Some(b'.'));
    }

    #[test]
    fn test_fragment_span_edges() {
        assert_eq!(fragment_span("ACGT  ", 0), "ACGT  ");
        assert_eq!(fragment_span("  ACGT", 5), "  ACGT");
        assert_eq!(fragment_span("AC GT", 3), "   GT");
        assert_eq!(fragment_span("", 0), "");
    }

    #[test]
    fn test_tally_counts_and_filters() {
        // column 4 holds reference 'G'
        let b = block(&["....A", ",,,,t", "  ..G", "....,", "  AC ", "    *"]);
        let (t, shown) = tally(&b, 4, false).unwrap();
        assert_eq!(t.count(b'A'), 1);
        assert_eq!(t.count(b't'), 1);
        assert_eq!(t.count(b'G'), 1);
        assert_eq!(t.count(b'g'), 1);
        assert_eq!(t.count(b'*'), 1);
        assert_eq!(t.total(), 5);
        assert_eq!(shown, vec!["....A", ",,,,t", "    *"]);
    }

    #[test]
    fn test_tally_include_all() {
        let b = block(&["....,", "...."]);
        let (t, shown) = tally(&b, 4, true).unwrap();
        assert_eq!(t.total(), 1);
        assert_eq!(shown, vec!["....,"]);
    }

    #[test]
    fn test_tally_column_without_reference_base() {
        let b = block(&["......", "......"]);
        assert_eq!(
            tally(&b, 5, true).unwrap_err(),
            PileupError::NoReferenceBase { column: 5, found: None }
        );

        let gapped = AlignmentBlock::from_lines(["1", "AC*G", "AC*G", "....", ",,,,"]).unwrap();
        assert_eq!(
            tally(&gapped, 2, true).unwrap_err(),
            PileupError::NoReferenceBase { column: 2, found: Some('*') }
        );
    }

    #[test]
    fn test_tally_unexpected_symbol() {
        let b = block(&["....A", "....?"]);
        assert_eq!(
            tally(&b, 4, true).unwrap_err(),
            PileupError::UnexpectedSymbol { symbol: '?', line: 2, column: 4 }
        );
    }

    #[test]
    fn test_inspect_end_to_end() {
        let b = AlignmentBlock::from_lines([
            "        100       110",
            "    ACGTACGTAC",
            "    ACGTACGTAC",
            "        ....",
            "      ,,,,,",
            "         AAC  ..",
            "   ",
        ])
        .unwrap();
        let p = inspect(&b, 103, false).unwrap();
        assert_eq!(p.column, 11);
        assert_eq!(p.reference_base, b'T');
        assert_eq!(p.tally.count(b'T'), 1);
        assert_eq!(p.tally.count(b'C'), 1);
        assert_eq!(p.tally.total(), 2);
        assert_eq!(p.fragments, vec!["         AAC    "]);
    }

    #[test]
    fn test_inspect_propagates_locator_errors() {
        let b = block(&["....."]);
        assert!(matches!(
            inspect(&b, 99, false),
            Err(PileupError::CoordinateNotFound { .. })
        ));
    }
}
