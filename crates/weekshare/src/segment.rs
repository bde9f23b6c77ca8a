//! Splitting an instant range into per-local-day pieces.
//!
//! A range of absolute instants renders as one block per local calendar day
//! it touches. Day boundaries are found by converting the next local midnight
//! back to an instant, so short and long DST days come out at their real
//! length instead of a naive 24 hours.

use serde::Serialize;
use tracing::trace;

use crate::anchor::day_index_of_civil;
use crate::civil::{to_civil, to_instant, Instant, MINUTES_PER_DAY, MS_PER_MINUTE};
use crate::error::{Result, ScheduleError};
use crate::zone::TimeZoneId;

/// Upper bound on emitted segments: a range inside one tracked week crosses at
/// most seven local midnights.
pub const MAX_SEGMENTS: usize = 8;

/// Forced step when a computed day end fails to move past the cursor.
const STALL_STEP_MINUTES: i64 = 60;

/// The part of a range that falls inside one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Day column, 0 = Monday (see [`crate::anchor`]).
    pub day_index: u8,
    pub start: Instant,
    /// Exclusive.
    pub end: Instant,
}

impl Segment {
    pub fn duration_minutes(&self) -> i64 {
        self.end.millis_since(self.start) / MS_PER_MINUTE
    }
}

/// Split `[start, end)` into consecutive pieces, one per local day in `zone`.
///
/// The pieces are in order and tile the range exactly. An empty or inverted
/// range yields no pieces.
///
/// # Errors
///
/// Returns [`ScheduleError::SegmentLimitExceeded`] for ranges that would need
/// more than [`MAX_SEGMENTS`] pieces, i.e. ranges longer than a week.
pub fn segment(start: Instant, end: Instant, zone: TimeZoneId) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cursor = start;

    while cursor < end {
        if segments.len() == MAX_SEGMENTS {
            return Err(ScheduleError::SegmentLimitExceeded { start, end });
        }

        let civil = to_civil(cursor, zone);
        let day_index = day_index_of_civil(&civil, zone);
        let day_end = to_instant(zone, &civil.start_of_next_day());

        let mut seg_end = end.min(day_end);
        if seg_end <= cursor {
            // Never step over the wall-clock midnight of the current day.
            let remaining = MINUTES_PER_DAY - i64::from(civil.minute_of_day());
            trace!(zone = zone.name(), %cursor, "day end did not advance, forcing step");
            seg_end = end.min(cursor.add_minutes(remaining.min(STALL_STEP_MINUTES)));
        }

        segments.push(Segment {
            day_index,
            start: cursor,
            end: seg_end,
        });
        cursor = seg_end;
    }

    Ok(segments)
}
