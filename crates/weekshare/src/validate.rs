//! Admission checks run before a range enters a schedule.

use crate::anchor::WEEK_MINUTES;
use crate::codec::TimeRange;
use crate::error::{Result, ScheduleError};

/// Whether half-open intervals `[a_start, a_end)` and `[b_start, b_end)` share
/// any point. Intervals that only touch at a boundary do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

impl TimeRange {
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// The same range one week earlier (`weeks = -1`) or later (`weeks = 1`).
    pub fn shifted_weeks(&self, weeks: i64) -> TimeRange {
        let minutes = weeks * WEEK_MINUTES;
        TimeRange::new(self.start.add_minutes(minutes), self.end.add_minutes(minutes))
    }

    /// Overlap of the weekly recurrences of both ranges.
    ///
    /// Stored ranges start inside `[anchor, anchor + 1 week]` and last at most
    /// a week, so comparing against the previous, same and next week is
    /// enough.
    pub fn overlaps_weekly(&self, other: &TimeRange) -> bool {
        [-1, 0, 1]
            .into_iter()
            .any(|weeks| self.shifted_weeks(weeks).overlaps(other))
    }
}

/// Anything occupying a span of absolute time.
pub trait Span {
    fn span(&self) -> TimeRange;
}

impl Span for TimeRange {
    fn span(&self) -> TimeRange {
        *self
    }
}

/// First item of `existing` whose span overlaps `candidate` in some week.
pub fn find_overlap<'a, T, I>(candidate: &TimeRange, existing: I) -> Option<&'a T>
where
    T: Span + 'a,
    I: IntoIterator<Item = &'a T>,
{
    existing
        .into_iter()
        .find(|item| item.span().overlaps_weekly(candidate))
}

/// Fails when a list of `len` ranges has no room for one more.
pub fn check_capacity(len: usize, max: usize) -> Result<()> {
    if len >= max {
        return Err(ScheduleError::CapacityReached { max });
    }
    Ok(())
}

/// Fails unless `range` is non-empty and no longer than a week.
pub fn check_ordered(range: &TimeRange) -> Result<()> {
    if range.start >= range.end {
        return Err(ScheduleError::InvalidSelection(format!(
            "range must end after it starts: {range}"
        )));
    }
    if range.duration_minutes() > WEEK_MINUTES {
        return Err(ScheduleError::InvalidSelection(format!(
            "range is longer than a week: {range}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::WEEK_ANCHOR;

    fn range(from: i64, to: i64) -> TimeRange {
        TimeRange::new(WEEK_ANCHOR.add_minutes(from), WEEK_ANCHOR.add_minutes(to))
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        assert!(!overlaps(0, 30, 30, 60));
        assert!(!overlaps(30, 60, 0, 30));
    }

    #[test]
    fn test_overlap_cases() {
        assert!(overlaps(0, 60, 30, 90)); // partial
        assert!(overlaps(0, 120, 30, 60)); // containment
        assert!(overlaps(30, 60, 30, 60)); // identical
        assert!(!overlaps(0, 30, 60, 90)); // disjoint
    }

    #[test]
    fn test_overlap_symmetry() {
        let cases = [(0, 30, 30, 60), (0, 60, 30, 90), (10, 20, 0, 100), (5, 6, 7, 8)];
        for (a, b, c, d) in cases {
            assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
        }
    }

    #[test]
    fn test_find_overlap_returns_first_conflict() {
        let existing = vec![range(0, 30), range(60, 120), range(90, 150)];
        let hit = find_overlap(&range(100, 110), &existing);
        assert_eq!(hit, Some(&existing[1]));
        assert_eq!(find_overlap(&range(30, 60), &existing), None);
    }

    #[test]
    fn test_find_overlap_wraps_around_the_week() {
        // The tail of the week and the head of the next week are the same
        // weekly slot as the head of this week.
        let existing = vec![range(WEEK_MINUTES - 60, WEEK_MINUTES + 60)];
        assert_eq!(find_overlap(&range(0, 30), &existing), Some(&existing[0]));
        assert_eq!(find_overlap(&range(30, 90), &existing), Some(&existing[0]));
        assert_eq!(find_overlap(&range(60, 90), &existing), None);
        assert_eq!(find_overlap(&range(WEEK_MINUTES - 90, WEEK_MINUTES - 60), &existing), None);
    }

    #[test]
    fn test_weekly_overlap_is_symmetric() {
        let a = range(WEEK_MINUTES - 60, WEEK_MINUTES + 60);
        let b = range(30, 90);
        assert!(a.overlaps_weekly(&b));
        assert!(b.overlaps_weekly(&a));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_capacity() {
        assert!(check_capacity(254, 255).is_ok());
        assert_eq!(
            check_capacity(255, 255),
            Err(ScheduleError::CapacityReached { max: 255 })
        );
    }

    #[test]
    fn test_ordered() {
        assert!(check_ordered(&range(0, 30)).is_ok());
        assert!(check_ordered(&range(30, 30)).is_err());
        assert!(check_ordered(&range(30, 0)).is_err());
    }

    #[test]
    fn test_ordered_caps_length_at_one_week() {
        assert!(check_ordered(&range(0, WEEK_MINUTES)).is_ok());
        assert!(matches!(
            check_ordered(&range(0, WEEK_MINUTES + 30)),
            Err(ScheduleError::InvalidSelection(_))
        ));
    }
}
