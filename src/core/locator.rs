//! Column locator
//!
//! The tview ruler only annotates sparse tick coordinates. The column of any
//! other coordinate is recovered by walking the reference line from the first
//! tick and counting real bases; insertion columns (`*`) occupy a screen
//! column but no reference coordinate.

use super::error::{PileupError, PileupResult};

/// Reference characters that advance the coordinate
#[inline]
pub fn is_reference_base(b: u8) -> bool {
    matches!(
        b,
        b'A' | b'C' | b'G' | b'T' | b'N' | b'a' | b'c' | b'g' | b't' | b'n'
    )
}

/// First coordinate tick on the ruler: `(coordinate, column)`
pub fn ruler_anchor(ruler: &str) -> PileupResult<(u64, usize)> {
    let bytes = ruler.as_bytes();
    let malformed = || PileupError::MalformedRuler {
        ruler: ruler.to_string(),
    };

    let start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(malformed)?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |len| start + len);

    let coordinate = ruler[start..end].parse().map_err(|_| malformed())?;
    Ok((coordinate, start))
}

/// Zero-based column of the 1-based `coordinate`
///
/// # Examples
/// ```
/// use pileup_inspect::core::locator::locate;
///
/// let ruler     = "  10";
/// let reference = "  AC*GT";
/// assert_eq!(locate(ruler, reference, 10).unwrap(), 2);
/// assert_eq!(locate(ruler, reference, 12).unwrap(), 5);
/// ```
pub fn locate(ruler: &str, reference: &str, coordinate: u64) -> PileupResult<usize> {
    let (first, anchor) = ruler_anchor(ruler)?;
    let anchor_base = reference.as_bytes().get(anchor).copied();
    if coordinate == first && anchor_base.is_some_and(is_reference_base) {
        return Ok(anchor);
    }

    let tail = reference.as_bytes().get(anchor + 1..).unwrap_or_default();
    let mut current = first;
    for (offset, &b) in tail.iter().enumerate() {
        if !is_reference_base(b) {
            continue;
        }
        current = match current.checked_add(1) {
            Some(next) => next,
            None => break,
        };
        if current == coordinate {
            return Ok(anchor + 1 + offset);
        }
        if current > coordinate {
            break;
        }
    }

    Err(PileupError::CoordinateNotFound {
        coordinate,
        first,
        last: last_coordinate(first, tail),
    })
}

fn last_coordinate(first: u64, tail: &[u8]) -> u64 {
    let bases = tail.iter().filter(|&&b| is_reference_base(b)).count() as u64;
    first.saturating_add(bases)
}
