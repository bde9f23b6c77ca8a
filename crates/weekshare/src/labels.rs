//! Human-readable time labels for grids and lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::anchor::{day_index_of_civil, day_name};
use crate::civil::to_civil;
use crate::codec::{TimeRange, SLOT_MINUTES};
use crate::grid::SLOTS_PER_DAY;
use crate::zone::TimeZoneId;

/// Clock style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `14:30`
    #[default]
    #[serde(rename = "24")]
    H24,
    /// `2:30 PM`
    #[serde(rename = "12")]
    H12,
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24" | "24h" => Ok(TimeFormat::H24),
            "12" | "12h" => Ok(TimeFormat::H12),
            other => Err(format!("unknown time format '{other}', expected 12 or 24")),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H24 => f.write_str("24"),
            TimeFormat::H12 => f.write_str("12"),
        }
    }
}

/// Format an hour and minute, e.g. `09:05` or `9:05 AM`.
pub fn format_hm(hour: u32, minute: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::H24 => format!("{hour:02}:{minute:02}"),
        TimeFormat::H12 => {
            let hour = hour % 24;
            let suffix = if hour >= 12 { "PM" } else { "AM" };
            format!("{}:{minute:02} {suffix}", (hour + 11) % 12 + 1)
        }
    }
}

/// Label for a slot boundary. Slot 48 is the midnight that ends the day.
pub fn slot_label(slot: u8, format: TimeFormat) -> String {
    let slot = u32::from(slot.min(SLOTS_PER_DAY));
    let minutes = (slot * u32::from(SLOT_MINUTES)) % (24 * 60);
    format_hm(minutes / 60, minutes % 60, format)
}

/// Row header for a grid row: the whole hour the slot belongs to.
pub fn hour_label(slot: u8, format: TimeFormat) -> String {
    format_hm(u32::from(slot / 2) % 24, 0, format)
}

/// One-line description of a range as seen from `zone`,
/// e.g. `Monday 09:00–10:00 CET`.
///
/// The day is the column of the range's start; the abbreviation is the one
/// in effect at the start.
pub fn describe_range(range: &TimeRange, zone: TimeZoneId, format: TimeFormat) -> String {
    let start = to_civil(range.start, zone);
    let end = to_civil(range.end, zone);
    format!(
        "{} {}–{} {}",
        day_name(day_index_of_civil(&start, zone)),
        format_hm(start.hour, start.minute, format),
        format_hm(end.hour, end.minute, format),
        zone.short_name(range.start),
    )
}
