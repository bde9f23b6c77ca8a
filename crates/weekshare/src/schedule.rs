//! The live list of availability ranges and the zone it is edited in.
//!
//! A [`Schedule`] is owned by one caller (the UI) and hands out its own range
//! ids, so nothing depends on a process-wide counter. Every mutation either
//! fully applies or leaves the schedule untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anchor::day_index_of_civil;
use crate::civil::{to_civil, Instant};
use crate::codec::{self, TimeRange};
use crate::config::ScheduleOptions;
use crate::error::{Result, ScheduleError};
use crate::grid::{self, DayColumns, Selection};
use crate::labels::describe_range;
use crate::validate::{check_capacity, check_ordered, find_overlap, Span};
use crate::zone::TimeZoneId;

/// Identifier of a range within one [`Schedule`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RangeId(u64);

impl RangeId {
    pub const fn new(id: u64) -> Self {
        RangeId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An accepted range. Never edited in place: replace it by remove + add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRange {
    pub id: RangeId,
    pub start: Instant,
    pub end: Instant,
}

impl AvailabilityRange {
    pub const fn new(id: RangeId, range: TimeRange) -> Self {
        AvailabilityRange {
            id,
            start: range.start,
            end: range.end,
        }
    }
}

impl Span for AvailabilityRange {
    fn span(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct Schedule {
    timezone: TimeZoneId,
    ranges: Vec<AvailabilityRange>,
    next_id: u64,
    options: ScheduleOptions,
}

impl Schedule {
    pub fn new(timezone: &str, options: ScheduleOptions) -> Self {
        Schedule {
            timezone: TimeZoneId::resolve_or(timezone, &options.fallback_timezone),
            ranges: Vec::new(),
            next_id: 1,
            options,
        }
    }

    /// Rebuild a schedule from a share token.
    ///
    /// Ranges are admitted through the same checks as [`Schedule::add_range`],
    /// so a crafted token with overlapping ranges is rejected as a whole.
    /// Ids are assigned fresh, in token order.
    pub fn from_token(token: &str, options: ScheduleOptions) -> Result<Self> {
        let shared = codec::decode(token)?;
        let mut schedule = Schedule::new(&shared.timezone, options);
        for range in shared.ranges {
            schedule.add_range(range)?;
        }
        debug!(
            timezone = schedule.timezone.name(),
            ranges = schedule.ranges.len(),
            "loaded schedule from token"
        );
        Ok(schedule)
    }

    pub fn timezone(&self) -> TimeZoneId {
        self.timezone
    }

    /// Switch the viewing zone. Stored instants do not move.
    pub fn set_timezone(&mut self, name: &str) {
        self.timezone = TimeZoneId::resolve_or(name, &self.options.fallback_timezone);
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    pub fn ranges(&self) -> &[AvailabilityRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, id: RangeId) -> Option<&AvailabilityRange> {
        self.ranges.iter().find(|r| r.id == id)
    }

    /// Add the range covered by a grid selection in the schedule's zone.
    pub fn add_selection(&mut self, selection: &Selection) -> Result<RangeId> {
        check_capacity(self.ranges.len(), self.options.effective_max_ranges())?;
        let range = selection.to_range(self.timezone)?;
        self.add_range(range)
    }

    /// Admit `range` if there is room and it overlaps nothing already stored.
    pub fn add_range(&mut self, range: TimeRange) -> Result<RangeId> {
        check_capacity(self.ranges.len(), self.options.effective_max_ranges())?;
        check_ordered(&range)?;
        if let Some(existing) = find_overlap(&range, &self.ranges) {
            return Err(ScheduleError::Overlap {
                existing: existing.id,
            });
        }

        let id = RangeId(self.next_id);
        self.next_id += 1;
        self.ranges.push(AvailabilityRange::new(id, range));
        Ok(id)
    }

    /// Remove one range. Returns whether it existed.
    pub fn remove(&mut self, id: RangeId) -> bool {
        let before = self.ranges.len();
        self.ranges.retain(|r| r.id != id);
        self.ranges.len() != before
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Ranges in list order for the current zone: by day column, then by
    /// local start time.
    pub fn sorted_for_display(&self) -> Vec<&AvailabilityRange> {
        let zone = self.timezone;
        let mut sorted: Vec<_> = self.ranges.iter().collect();
        sorted.sort_by_cached_key(|r| {
            let start = to_civil(r.start, zone);
            (day_index_of_civil(&start, zone), start.minute_of_day())
        });
        sorted
    }

    /// One description line per range, in display order.
    pub fn describe(&self) -> Vec<String> {
        self.sorted_for_display()
            .into_iter()
            .map(|r| describe_range(&r.span(), self.timezone, self.options.time_format))
            .collect()
    }

    /// Grid cells occupied in the current zone.
    pub fn project(&self) -> Result<DayColumns> {
        grid::project(&self.ranges, self.timezone)
    }

    /// The share token for the current state.
    pub fn to_token(&self) -> String {
        let spans: Vec<TimeRange> = self.ranges.iter().map(Span::span).collect();
        codec::encode(self.timezone.name(), &spans)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::new(crate::zone::DEFAULT_ZONE, ScheduleOptions::default())
    }
}
