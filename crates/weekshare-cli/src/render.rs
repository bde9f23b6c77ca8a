//! Plain-text week grid for `view --grid`.

use std::fmt::Write;

use weekshare::anchor::{day_name, DAYS_PER_WEEK};
use weekshare::grid::SLOTS_PER_DAY;
use weekshare::labels::slot_label;
use weekshare::Schedule;

const CELL_WIDTH: usize = 5;

/// One row per half-hour slot and one column per day. A block shows its
/// range id in its first cell and `|` below it.
pub fn week_grid(schedule: &Schedule) -> weekshare::error::Result<String> {
    let columns = schedule.project()?;
    let format = schedule.options().time_format;
    let days = 0..DAYS_PER_WEEK as u8;

    let mut out = format!("{:9}", "");
    for day in days.clone() {
        let _ = write!(out, "{:<CELL_WIDTH$}", &day_name(day)[..3]);
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    for slot in 0..SLOTS_PER_DAY {
        let _ = write!(out, "{:>8} ", slot_label(slot, format));
        for day in days.clone() {
            let cell = match columns.block_starting_at(day, slot) {
                Some(block) => format!("#{}", block.range_id),
                None if columns.is_occupied(day, slot) => "|".to_string(),
                None => ".".to_string(),
            };
            let _ = write!(out, "{cell:<CELL_WIDTH$}");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    Ok(out)
}
