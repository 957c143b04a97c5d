use chrono::{Duration, NaiveDateTime};

/// Half-open overlap test for `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Touching endpoints do not overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// A non-empty half-open span of local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Returns `None` unless `start < end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// The part of this interval inside `window`, if any
    pub fn clip(&self, window: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(window.start), self.end.min(window.end))
    }
}

/// Merge start-sorted intervals that overlap or touch into disjoint intervals
pub fn merge_overlapping(sorted: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for &interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

/// Parts of `window` not covered by the disjoint, sorted `busy` intervals
pub fn free_gaps(window: &Interval, busy: &[Interval]) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut cursor = window.start;

    for interval in busy {
        if let Some(gap) = Interval::new(cursor, interval.start.min(window.end)) {
            gaps.push(gap);
        }
        cursor = cursor.max(interval.end);
        if cursor >= window.end {
            return gaps;
        }
    }

    if let Some(gap) = Interval::new(cursor, window.end) {
        gaps.push(gap);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn span(from: (u32, u32), to: (u32, u32)) -> Interval {
        Interval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_and_inverted() {
        assert!(Interval::new(at(10, 0), at(10, 0)).is_none());
        assert!(Interval::new(at(11, 0), at(10, 0)).is_none());
        assert_eq!(span((10, 0), (11, 30)).duration(), Duration::minutes(90));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let morning = span((9, 0), (10, 0));

        assert!(morning.overlaps(&span((9, 30), (10, 30))));
        assert!(morning.overlaps(&span((8, 0), (12, 0))));
        assert!(!morning.overlaps(&span((10, 0), (11, 0))));
        assert!(!morning.overlaps(&span((8, 0), (9, 0))));
    }

    #[test]
    fn test_clip() {
        let window = span((9, 0), (17, 0));

        assert_eq!(span((8, 0), (10, 0)).clip(&window), Some(span((9, 0), (10, 0))));
        assert_eq!(span((16, 0), (18, 0)).clip(&window), Some(span((16, 0), (17, 0))));
        assert_eq!(span((7, 0), (9, 0)).clip(&window), None);
    }

    #[test]
    fn test_merge_overlapping_basic() {
        let merged = merge_overlapping(&[span((9, 0), (12, 0)), span((10, 0), (13, 0)), span((14, 0), (15, 0))]);
        assert_eq!(merged, vec![span((9, 0), (13, 0)), span((14, 0), (15, 0))]);
    }

    #[test]
    fn test_merge_overlapping_adjacent_and_contained() {
        let merged = merge_overlapping(&[span((9, 0), (10, 0)), span((10, 0), (11, 0))]);
        assert_eq!(merged, vec![span((9, 0), (11, 0))]);

        let merged = merge_overlapping(&[span((9, 0), (15, 0)), span((10, 0), (11, 0)), span((12, 0), (13, 0))]);
        assert_eq!(merged, vec![span((9, 0), (15, 0))]);
    }

    #[test]
    fn test_free_gaps() {
        let window = span((9, 0), (17, 0));

        assert_eq!(free_gaps(&window, &[]), vec![window]);
        assert_eq!(
            free_gaps(&window, &[span((10, 0), (11, 0)), span((13, 0), (14, 0))]),
            vec![span((9, 0), (10, 0)), span((11, 0), (13, 0)), span((14, 0), (17, 0))]
        );
        assert_eq!(free_gaps(&window, &[span((9, 0), (17, 0))]), vec![]);
        assert_eq!(free_gaps(&window, &[span((9, 0), (12, 0))]), vec![span((12, 0), (17, 0))]);
    }
}
