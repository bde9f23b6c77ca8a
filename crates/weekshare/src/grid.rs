//! The half-hour week grid: turning cell picks into ranges and ranges back
//! into cells.

use serde::{Deserialize, Serialize};

use crate::anchor::{anchor_civil, DAYS_PER_WEEK, WEEK_ANCHOR, WEEK_MINUTES};
use crate::civil::{to_civil, to_instant, CivilDateTime};
use crate::codec::{TimeRange, SLOT_MINUTES};
use crate::error::{Result, ScheduleError};
use crate::schedule::{AvailabilityRange, RangeId};
use crate::segment::segment;
use crate::validate::check_ordered;
use crate::zone::TimeZoneId;

pub const SLOTS_PER_DAY: u8 = 48;
pub const DAY_COLUMNS: usize = DAYS_PER_WEEK as usize;

// ── Selection ───────────────────────────────────────────────────────────────

/// Two cells picked in the same day column, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub day_index: u8,
    pub first_slot: u8,
    pub last_slot: u8,
}

impl Selection {
    pub const fn new(day_index: u8, first_slot: u8, last_slot: u8) -> Self {
        Selection {
            day_index,
            first_slot,
            last_slot,
        }
    }

    /// The absolute range covered by the picked cells in `zone`.
    ///
    /// Cells may be picked in either order. The range always starts inside the
    /// anchor week: a start that lands before the anchor (possible east of
    /// UTC, where the first column begins before Monday 00:00Z) is moved one
    /// week later, which is the same weekly slot.
    pub fn to_range(&self, zone: TimeZoneId) -> Result<TimeRange> {
        if usize::from(self.day_index) >= DAY_COLUMNS {
            return Err(ScheduleError::InvalidSelection(format!(
                "day index {} out of range 0..{DAY_COLUMNS}",
                self.day_index
            )));
        }
        if self.first_slot.max(self.last_slot) >= SLOTS_PER_DAY {
            return Err(ScheduleError::InvalidSelection(format!(
                "slot out of range 0..{SLOTS_PER_DAY}"
            )));
        }

        let low = u32::from(self.first_slot.min(self.last_slot));
        let high = u32::from(self.first_slot.max(self.last_slot));
        let slot = u32::from(SLOT_MINUTES);
        let day = u32::from(self.day_index);
        let column = anchor_civil(zone);

        let mut range = TimeRange::new(
            to_instant(zone, &column.at_day_minute(day, low * slot)),
            to_instant(zone, &column.at_day_minute(day, (high + 1) * slot)),
        );
        if range.start < WEEK_ANCHOR {
            range = TimeRange::new(
                range.start.add_minutes(WEEK_MINUTES),
                range.end.add_minutes(WEEK_MINUTES),
            );
        }
        check_ordered(&range)?;
        Ok(range)
    }
}

// ── Projection ──────────────────────────────────────────────────────────────

/// A run of occupied cells in one column. `end_slot` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridBlock {
    pub range_id: RangeId,
    pub day_index: u8,
    pub start_slot: u8,
    pub end_slot: u8,
}

impl GridBlock {
    pub fn contains(&self, slot: u8) -> bool {
        (self.start_slot..self.end_slot).contains(&slot)
    }
}

/// Blocks per day column, in the order their ranges were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayColumns {
    columns: [Vec<GridBlock>; DAY_COLUMNS],
}

impl DayColumns {
    pub fn column(&self, day_index: u8) -> &[GridBlock] {
        self.columns
            .get(usize::from(day_index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The block covering a cell, if any.
    pub fn hit_test(&self, day_index: u8, slot: u8) -> Option<&GridBlock> {
        self.column(day_index).iter().find(|b| b.contains(slot))
    }

    pub fn is_occupied(&self, day_index: u8, slot: u8) -> bool {
        self.hit_test(day_index, slot).is_some()
    }

    /// The block whose first cell is `slot`, for drawing one label per block.
    pub fn block_starting_at(&self, day_index: u8, slot: u8) -> Option<&GridBlock> {
        self.column(day_index).iter().find(|b| b.start_slot == slot)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &GridBlock> {
        self.columns.iter().flatten()
    }
}

/// Lay `ranges` out on the grid as seen from `zone`.
///
/// Partial cells round down: a piece from 09:15 to 10:15 covers cells
/// 09:00 and 09:30. A piece that runs to local midnight ends at slot 48.
pub fn project(ranges: &[AvailabilityRange], zone: TimeZoneId) -> Result<DayColumns> {
    let mut grid = DayColumns::default();
    for range in ranges {
        for piece in segment(range.start, range.end, zone)? {
            let start = to_civil(piece.start, zone);
            let end = to_civil(piece.end, zone);
            let start_slot = slot_of(&start);
            let end_slot = if end.epoch_day() > start.epoch_day() {
                SLOTS_PER_DAY
            } else {
                slot_of(&end)
            };
            if start_slot < end_slot {
                grid.columns[usize::from(piece.day_index)].push(GridBlock {
                    range_id: range.id,
                    day_index: piece.day_index,
                    start_slot,
                    end_slot,
                });
            }
        }
    }
    Ok(grid)
}

fn slot_of(civil: &CivilDateTime) -> u8 {
    (civil.minute_of_day() / u32::from(SLOT_MINUTES)) as u8
}
