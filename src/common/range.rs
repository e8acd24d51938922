//! Normalizes a parsed `Range` header before it is handed to `axum-range`.
//!
//! Only single ranges are served. An end offset past EOF is clamped to the
//! last byte; a start at or past EOF has nothing to serve.

use axum_extra::headers::Range;
use std::ops::Bound;

/// The single range in `requested` clamped to a file of `size` bytes, or
/// `None` when nothing can be served or several ranges were asked for.
pub fn clamp_to_size(requested: &Range, size: u64) -> Option<Range> {
    let last = size.checked_sub(1)?;
    let mut ranges = requested.satisfiable_ranges(size);
    let (start, end) = ranges.next()?;
    if ranges.next().is_some() {
        return None;
    }

    let start = match start {
        Bound::Included(s) => s,
        Bound::Excluded(s) => s.checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match end {
        Bound::Included(e) => e.min(last),
        Bound::Excluded(e) => e.checked_sub(1)?.min(last),
        Bound::Unbounded => last,
    };

    if start > end {
        return None;
    }
    Range::bytes(start..=end).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};
    use axum_extra::headers::{Header, HeaderMapExt};

    fn parse(raw: &str) -> Option<Range> {
        let mut headers = HeaderMap::new();
        headers.insert(Range::name(), HeaderValue::from_str(raw).unwrap());
        headers.typed_get::<Range>()
    }

    fn window(range: &Range, size: u64) -> (Bound<u64>, Bound<u64>) {
        range.satisfiable_ranges(size).next().unwrap()
    }

    #[test]
    fn closed_range_is_kept() {
        let range = clamp_to_size(&parse("bytes=0-99").unwrap(), 1000).unwrap();
        assert_eq!(window(&range, 1000), (Bound::Included(0), Bound::Included(99)));
    }

    #[test]
    fn open_end_runs_to_last_byte() {
        let range = clamp_to_size(&parse("bytes=500-").unwrap(), 1000).unwrap();
        assert_eq!(window(&range, 1000), (Bound::Included(500), Bound::Included(999)));
    }

    #[test]
    fn end_past_eof_is_clamped() {
        let range = clamp_to_size(&parse("bytes=900-5000").unwrap(), 1000).unwrap();
        assert_eq!(window(&range, 1000), (Bound::Included(900), Bound::Included(999)));
    }

    #[test]
    fn multiple_ranges_are_refused() {
        assert!(clamp_to_size(&parse("bytes=0-9,20-29").unwrap(), 1000).is_none());
    }

    #[test]
    fn unsatisfiable_ranges_yield_nothing() {
        let served = |raw: &str, size: u64| parse(raw).and_then(|r| clamp_to_size(&r, size));

        assert!(served("bytes=1000-", 1000).is_none());
        assert!(served("bytes=100-50", 1000).is_none());
        assert!(served("bytes=abc-def", 1000).is_none());
        assert!(served("bytes=0-10", 0).is_none());
    }
}
