//! Range header resolution.
//!
//! Pure parsing of an HTTP `Range` value (`unit=range-set`) against a known
//! content length. No I/O happens here; the media delivery layer applies
//! the serving policy (unit must be `bytes`, first surviving range wins).
//!
//! Each entry of the range set takes one of three forms:
//!
//! ```text
//! first-last   → [first, last]
//! first-       → [first, size-1]         (open ended)
//! -suffix      → [size-suffix, size-1]   (last N bytes)
//! ```
//!
//! `last` is clamped to `size-1`. Entries that end up with `start > end` or
//! `start < 0` are dropped silently; only a structurally broken header
//! fails the whole parse.

use crate::error::GuideError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only range unit the service understands.
pub const BYTES_UNIT: &str = "bytes";

/// Inclusive byte span inside an object. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered.
    #[must_use]
    #[allow(clippy::len_without_is_empty)] // never empty by construction
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this span of an object of `size` bytes.
    #[must_use]
    pub fn content_range(&self, size: u64) -> String {
        format!("{BYTES_UNIT} {}-{}/{size}", self.start, self.end)
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    /// Unit named by the client, verbatim.
    pub unit: String,
    /// Surviving ranges in request order.
    pub ranges: Vec<ByteRange>,
}

impl RangeSet {
    /// Whether the unit is `bytes`.
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        self.unit == BYTES_UNIT
    }

    /// The range that gets served under the single-range policy.
    #[must_use]
    pub fn first(&self) -> Option<ByteRange> {
        self.ranges.first().copied()
    }
}

/// Structural errors that fail the whole header.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The value is not of the form `unit=range-set`.
    #[error("malformed range header: expected unit=range-set")]
    MalformedHeader,

    /// An entry of the range set has no `-`.
    #[error("malformed range entry: {0:?}")]
    MalformedEntry(String),
}

impl From<RangeError> for GuideError {
    fn from(err: RangeError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Parse `header` against an object of `size` bytes.
///
/// # Errors
///
/// Returns [`RangeError`] when the header is not `unit=range-set` (exactly
/// one `=`), or when an entry has no `-` separator.
///
/// # Examples
///
/// ```
/// use audio_guide_core::range::{resolve, ByteRange};
///
/// let set = resolve("bytes=-100", 1000).unwrap();
/// assert_eq!(set.ranges, vec![ByteRange { start: 900, end: 999 }]);
/// ```
pub fn resolve(header: &str, size: u64) -> Result<RangeSet, RangeError> {
    let mut parts = header.split('=');
    let (Some(unit), Some(range_set), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RangeError::MalformedHeader);
    };

    // Offsets are computed in i128 so suffix and clamping math cannot wrap.
    let size = i128::from(size);
    let mut ranges = Vec::new();

    for entry in range_set.split(',') {
        let mut bounds = entry.split('-');
        let (Some(first), Some(last)) = (bounds.next(), bounds.next()) else {
            return Err(RangeError::MalformedEntry(entry.to_string()));
        };

        let first = first.trim().parse::<i64>().ok().map(i128::from);
        let last = last.trim().parse::<i64>().ok().map(i128::from);

        let (start, end) = match (first, last) {
            // -suffix; an unparseable suffix counts as zero bytes
            (None, suffix) => (size - suffix.unwrap_or(0), size - 1),
            (Some(first), None) => (first, size - 1),
            (Some(first), Some(last)) => (first, last),
        };

        let end = end.min(size - 1);
        if start > end || start < 0 {
            continue;
        }

        // Both bounds lie in [0, size-1] here, so they fit in u64.
        if let (Ok(start), Ok(end)) = (u64::try_from(start), u64::try_from(end)) {
            ranges.push(ByteRange { start, end });
        }
    }

    Ok(RangeSet {
        unit: unit.to_string(),
        ranges,
    })
}
