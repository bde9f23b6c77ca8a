//! The weekly anchor: a fixed Monday used as the phase reference of the week.
//!
//! Day columns are counted from the anchor's *local* calendar date in the
//! viewing zone. West of UTC that date is the Sunday before, so the first
//! column there holds Sunday's wall-clock hours. This shift is what lets one
//! stored instant show up under different days for different viewers.

use crate::civil::{to_civil, CivilDateTime, Instant, MINUTES_PER_DAY};
use crate::zone::TimeZoneId;

/// 2025-01-06T00:00:00Z, a Monday.
pub const WEEK_ANCHOR: Instant = Instant::from_millis(1_736_121_600_000);

pub const DAYS_PER_WEEK: i64 = 7;
pub const WEEK_MINUTES: i64 = DAYS_PER_WEEK * MINUTES_PER_DAY;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Column name for a day index; indices wrap modulo 7.
pub fn day_name(day_index: u8) -> &'static str {
    DAY_NAMES[usize::from(day_index) % DAY_NAMES.len()]
}

/// Local midnight of the anchor's calendar date in `zone`.
pub fn anchor_civil(zone: TimeZoneId) -> CivilDateTime {
    let at = to_civil(WEEK_ANCHOR, zone);
    CivilDateTime::new(at.year, at.month, at.day, 0, 0)
}

/// Day column (0 = Monday) that `instant` falls in when viewed from `zone`.
///
/// Counts whole local calendar days between the anchor's date and the
/// instant's date, so DST shifts never move an instant into a neighbouring
/// column.
pub fn day_index_of(instant: Instant, zone: TimeZoneId) -> u8 {
    day_index_of_civil(&to_civil(instant, zone), zone)
}

/// [`day_index_of`] for fields that were already decomposed in `zone`.
pub fn day_index_of_civil(civil: &CivilDateTime, zone: TimeZoneId) -> u8 {
    let delta = civil.epoch_day() - anchor_civil(zone).epoch_day();
    // rem_euclid keeps the result in 0..7 for dates before the anchor.
    delta.rem_euclid(DAYS_PER_WEEK) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::to_instant;
    use chrono::Datelike;

    fn zone(name: &str) -> TimeZoneId {
        TimeZoneId::parse(name).unwrap()
    }

    #[test]
    fn test_anchor_is_monday_midnight_utc() {
        let civil = to_civil(WEEK_ANCHOR, TimeZoneId::UTC);
        assert_eq!(civil, CivilDateTime::new(2025, 1, 6, 0, 0));
        assert_eq!(civil.date().unwrap().weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn test_anchor_is_day_zero_everywhere() {
        for name in ["UTC", "Pacific/Kiritimati", "Pacific/Pago_Pago", "Asia/Kolkata"] {
            assert_eq!(day_index_of(WEEK_ANCHOR, zone(name)), 0, "{name}");
        }
    }

    #[test]
    fn test_anchor_local_date_west_of_utc() {
        let la = zone("America/Los_Angeles");
        assert_eq!(anchor_civil(la), CivilDateTime::new(2025, 1, 5, 0, 0));
    }

    #[test]
    fn test_same_instant_different_columns() {
        // Monday 02:00Z: Monday in Tokyo, still Sunday's date in New York,
        // which is that zone's first column.
        let instant = WEEK_ANCHOR.add_minutes(120);
        assert_eq!(day_index_of(instant, zone("Asia/Tokyo")), 0);
        assert_eq!(day_index_of(instant, zone("America/New_York")), 0);

        // Monday 10:00Z: Monday 19:00 in Tokyo, Monday 05:00 in New York,
        // which is New York's second column.
        let instant = WEEK_ANCHOR.add_minutes(600);
        assert_eq!(day_index_of(instant, zone("Asia/Tokyo")), 0);
        assert_eq!(day_index_of(instant, zone("America/New_York")), 1);
    }

    #[test]
    fn test_day_index_wraps_weekly() {
        let utc = TimeZoneId::UTC;
        assert_eq!(day_index_of(WEEK_ANCHOR.add_minutes(6 * MINUTES_PER_DAY), utc), 6);
        assert_eq!(day_index_of(WEEK_ANCHOR.add_minutes(WEEK_MINUTES), utc), 0);
        assert_eq!(day_index_of(WEEK_ANCHOR.add_minutes(-MINUTES_PER_DAY), utc), 6);
    }

    #[test]
    fn test_day_index_ignores_dst_length() {
        // A 23-hour day in Berlin: 23:30 local is still the same column.
        let berlin = zone("Europe/Berlin");
        let late = to_instant(berlin, &CivilDateTime::new(2026, 3, 29, 23, 30));
        let early = to_instant(berlin, &CivilDateTime::new(2026, 3, 29, 0, 30));
        assert_eq!(day_index_of(late, berlin), day_index_of(early, berlin));
        // 2026-03-29 is a Sunday.
        assert_eq!(day_index_of(late, berlin), 6);
    }

    #[test]
    fn test_day_name_wraps() {
        assert_eq!(day_name(0), "Monday");
        assert_eq!(day_name(6), "Sunday");
        assert_eq!(day_name(7), "Monday");
    }
}
