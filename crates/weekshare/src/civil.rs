//! Conversion between absolute instants and local wall-clock time.
//!
//! [`to_civil`] is a plain lookup through the timezone database. The inverse,
//! [`to_instant`], has to cope with wall-clock times that occur twice
//! (fall-back) or never (spring-forward). It runs a short fixed-point search:
//! treat the wall-clock fields as UTC, see which wall-clock time that instant
//! actually has in the zone, shift by the difference, repeat. Offsets change
//! by whole minutes at a handful of points per year, so three corrections are
//! enough for every real-world rule.
//!
//! # Policies
//!
//! - **Nonexistent** wall-clock times resolve past the gap, shifted forward by
//!   the gap length (02:30 in a 02:00→03:00 jump becomes 03:30). A local
//!   midnight that falls in a gap therefore resolves to the first instant of
//!   that day.
//! - **Ambiguous** wall-clock times always resolve to the earlier occurrence.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::zone::TimeZoneId;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Corrections applied by [`to_instant`] before giving up on an exact match.
const MAX_CORRECTIONS: usize = 3;

/// How far back [`to_instant`] looks for an earlier, larger UTC offset when
/// checking for a repeated wall-clock time. Covers every fall-back in the db.
const AMBIGUITY_LOOKBACK_MINUTES: i64 = 180;

// ── Instant ─────────────────────────────────────────────────────────────────

/// An absolute point in time: milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Instant(i64);

impl Instant {
    pub const fn from_millis(ms: i64) -> Self {
        Instant(ms)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Instant(dt.timestamp_millis())
    }

    /// The instant as a chrono datetime, saturating at chrono's supported range.
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or(if self.0 < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    pub const fn add_millis(self, ms: i64) -> Self {
        Instant(self.0.saturating_add(ms))
    }

    pub const fn add_minutes(self, minutes: i64) -> Self {
        self.add_millis(minutes.saturating_mul(MS_PER_MINUTE))
    }

    /// Signed milliseconds from `earlier` to `self`.
    pub const fn millis_since(self, earlier: Instant) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Instant::from_datetime(dt)
    }
}

// ── CivilDateTime ───────────────────────────────────────────────────────────

/// Wall-clock date and time fields as seen in some zone.
///
/// Values produced by [`to_civil`] are always in range. Values handed to
/// [`to_instant`] may overflow (hour 24, day 32, minute 90): they are
/// normalised the way calendar arithmetic would carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CivilDateTime {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        CivilDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second: 0,
        }
    }

    /// Midnight `days` after this date, then `minute_of_day` minutes into it.
    pub const fn at_day_minute(&self, days: u32, minute_of_day: u32) -> Self {
        CivilDateTime {
            year: self.year,
            month: self.month,
            day: self.day + days,
            hour: minute_of_day / 60,
            minute: minute_of_day % 60,
            second: 0,
        }
    }

    /// Local midnight starting the following calendar day.
    pub const fn start_of_next_day(&self) -> Self {
        self.at_day_minute(1, 0)
    }

    /// Minutes elapsed since local midnight, ignoring seconds.
    pub const fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Day number of this (normalised) date counted from 1970-01-01.
    ///
    /// Saturates at chrono's supported date range.
    pub fn epoch_day(&self) -> i64 {
        self.normalised_date()
            .unwrap_or(if self.year < 1970 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            })
            .signed_duration_since(DateTime::<Utc>::UNIX_EPOCH.date_naive())
            .num_days()
    }

    /// Carry overflowing months and days into a real calendar date.
    fn normalised_date(&self) -> Option<NaiveDate> {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = u32::try_from(months.rem_euclid(12)).ok()?;
        NaiveDate::from_ymd_opt(year, 1, 1)?
            .checked_add_months(Months::new(month))?
            .checked_add_days(Days::new(u64::from(self.day)))?
            .checked_sub_days(Days::new(1))
    }

    /// The wall-clock fields read as if they were UTC, in whole minutes.
    pub fn epoch_minutes(&self) -> i64 {
        self.epoch_day() * MINUTES_PER_DAY + i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    /// Calendar date, or `None` for fields that are not already normalised.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// ── Conversion ──────────────────────────────────────────────────────────────

/// Decompose `instant` into wall-clock fields in `zone`.
pub fn to_civil(instant: Instant, zone: TimeZoneId) -> CivilDateTime {
    let local = instant.to_datetime().with_timezone(&zone.tz());
    CivilDateTime {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
    }
}

/// Find the instant at which the clocks in `zone` read `civil`.
///
/// See the module docs for how skipped and repeated wall-clock times resolve.
pub fn to_instant(zone: TimeZoneId, civil: &CivilDateTime) -> Instant {
    let want = civil.epoch_minutes();
    let mut guess = Instant::from_millis(
        want * MS_PER_MINUTE + i64::from(civil.second) * MS_PER_SECOND,
    );
    let mut diff = minutes_off(guess, zone, want);

    for _ in 0..MAX_CORRECTIONS {
        if diff == 0 {
            break;
        }
        guess = guess.add_minutes(-diff);
        diff = minutes_off(guess, zone, want);
    }

    match diff {
        0 => earliest_occurrence(guess, zone, want),
        // Still short of the requested time: the guess sits just before a gap.
        d if d < 0 => {
            trace!(zone = zone.name(), %civil, gap_minutes = -d, "wall-clock time skipped");
            guess.add_minutes(-d)
        }
        d => {
            trace!(zone = zone.name(), %civil, gap_minutes = d, "wall-clock time skipped");
            guess
        }
    }
}

/// Signed minutes between the wall-clock time at `guess` and `want`.
fn minutes_off(guess: Instant, zone: TimeZoneId, want: i64) -> i64 {
    to_civil(guess, zone).epoch_minutes() - want
}

/// Prefer the earlier of two instants that share a wall-clock time.
fn earliest_occurrence(found: Instant, zone: TimeZoneId, want: i64) -> Instant {
    let offset_here = zone.utc_offset_minutes(found);
    let offset_before = zone.utc_offset_minutes(found.add_minutes(-AMBIGUITY_LOOKBACK_MINUTES));
    if offset_before > offset_here {
        let earlier = found.add_minutes(offset_here - offset_before);
        if minutes_off(earlier, zone, want) == 0 {
            return earlier;
        }
    }
    found
}

// ── Tests ───────────────────────────────────────────────────────────────────
