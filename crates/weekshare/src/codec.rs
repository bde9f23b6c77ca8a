//! Compact, URL-safe encoding of a shared week.
//!
//! # Layout (version 1)
//!
//! ```text
//! [version:1][count:1][(start_offset:2, duration:2) × count][tz_len:1][tz:tz_len]
//! ```
//!
//! Integers are big-endian. `start_offset` is minutes after
//! [`WEEK_ANCHOR`](crate::anchor::WEEK_ANCHOR), `duration` is minutes. The
//! buffer travels as unpadded URL-safe base64 in the `state` query parameter.
//!
//! Encoding never fails: out-of-range values are clamped and ranges past the
//! 255th are dropped. Decoding validates every field before use and rejects
//! the whole token on the first bad one.

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anchor::{WEEK_ANCHOR, WEEK_MINUTES};
use crate::civil::{Instant, MS_PER_MINUTE};
use crate::error::DecodeError;

/// The only layout this crate reads or writes.
pub const STATE_VERSION: u8 = 1;

/// Largest number of ranges the one-byte count field can carry.
pub const MAX_RANGES: usize = u8::MAX as usize;

/// Query parameter holding the token in a share URL.
pub const STATE_PARAM: &str = "state";

/// Every stored duration is a whole number of these.
pub const SLOT_MINUTES: u16 = 30;

const MAX_TIMEZONE_BYTES: usize = u8::MAX as usize;

/// Unpadded URL-safe base64 that also accepts padded input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ── Types ───────────────────────────────────────────────────────────────────

/// A half-open span of absolute time, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Instant,
    pub end: Instant,
}

impl TimeRange {
    pub const fn new(start: Instant, end: Instant) -> Self {
        TimeRange { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end.millis_since(self.start) / MS_PER_MINUTE
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One range as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedRange {
    pub start_offset_minutes: u16,
    pub duration_minutes: u16,
}

impl EncodedRange {
    /// Wire form of `range`, clamping both fields to `0..=u16::MAX`.
    pub fn from_range(range: &TimeRange) -> Self {
        let offset = range.start.millis_since(WEEK_ANCHOR);
        let duration = range.end.millis_since(range.start);
        EncodedRange {
            start_offset_minutes: clamp_u16(round_minutes(offset)),
            duration_minutes: clamp_u16(round_minutes(duration)),
        }
    }

    pub fn to_range(self) -> TimeRange {
        let start = WEEK_ANCHOR.add_minutes(i64::from(self.start_offset_minutes));
        TimeRange {
            start,
            end: start.add_minutes(i64::from(self.duration_minutes)),
        }
    }

    fn is_valid(&self) -> bool {
        i64::from(self.start_offset_minutes) <= WEEK_MINUTES
            && self.duration_minutes > 0
            && self.duration_minutes % SLOT_MINUTES == 0
    }
}

/// The decoded contents of a token, before any instant is reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedState {
    pub version: u8,
    pub ranges: Vec<EncodedRange>,
    pub timezone: String,
}

/// What a share token carries: a zone name and the ranges as instant pairs.
///
/// The zone name is returned exactly as it was encoded; resolving it against
/// the timezone database is the caller's step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    pub timezone: String,
    pub ranges: Vec<TimeRange>,
}

// ── Encode ──────────────────────────────────────────────────────────────────

impl EncodedState {
    /// Wire form of a zone and ranges. Ranges past [`MAX_RANGES`] are dropped.
    pub fn from_ranges(timezone: &str, ranges: &[TimeRange]) -> Self {
        EncodedState {
            version: STATE_VERSION,
            ranges: ranges
                .iter()
                .take(MAX_RANGES)
                .map(EncodedRange::from_range)
                .collect(),
            timezone: truncate_utf8(timezone, MAX_TIMEZONE_BYTES).to_string(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let count = self.ranges.len().min(MAX_RANGES);
        let tz = truncate_utf8(&self.timezone, MAX_TIMEZONE_BYTES).as_bytes();

        let mut buf = Vec::with_capacity(2 + count * 4 + 1 + tz.len());
        buf.push(self.version);
        buf.push(count as u8);
        for range in &self.ranges[..count] {
            buf.extend_from_slice(&range.start_offset_minutes.to_be_bytes());
            buf.extend_from_slice(&range.duration_minutes.to_be_bytes());
        }
        buf.push(tz.len() as u8);
        buf.extend_from_slice(tz);
        buf
    }

    pub fn into_shared(self) -> SharedState {
        SharedState {
            timezone: self.timezone,
            ranges: self.ranges.into_iter().map(EncodedRange::to_range).collect(),
        }
    }
}

/// Encode a zone name and ranges into a share token.
///
/// # Examples
///
/// ```
/// use weekshare::anchor::WEEK_ANCHOR;
/// use weekshare::codec::{decode, encode, TimeRange};
///
/// let monday_nine = WEEK_ANCHOR.add_minutes(9 * 60);
/// let range = TimeRange::new(monday_nine, monday_nine.add_minutes(60));
/// let token = encode("UTC", &[range]);
///
/// let state = decode(&token).unwrap();
/// assert_eq!(state.timezone, "UTC");
/// assert_eq!(state.ranges, vec![range]);
/// ```
pub fn encode(timezone: &str, ranges: &[TimeRange]) -> String {
    TOKEN_ENGINE.encode(EncodedState::from_ranges(timezone, ranges).to_bytes())
}

/// A full share URL: `base` with the token in the `state` parameter.
pub fn share_url(base: &str, token: &str) -> String {
    let base = base.split(['?', '#']).next().unwrap_or(base);
    format!("{base}?{STATE_PARAM}={token}")
}

/// The token inside a pasted share URL, or `input` unchanged when it carries
/// no `state` parameter.
pub fn token_from_url(input: &str) -> &str {
    let input = input.trim();
    let Some((_, query)) = input.split_once('?') else {
        return input;
    };
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == STATE_PARAM)
        .map_or(input, |(_, value)| value)
}

// ── Decode ──────────────────────────────────────────────────────────────────

impl EncodedState {
    /// Parse a raw buffer, checking fields in layout order.
    ///
    /// Bytes after the timezone are ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        let mut reader = ByteReader::new(buf);

        let version = reader.u8().ok_or(DecodeError::EmptyInput)?;
        if version != STATE_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        // A buffer that ends after the version byte has no timezone trailer either.
        let count = usize::from(reader.u8().ok_or(DecodeError::InvalidTimezoneBytes)?);
        // Cannot fire for a one-byte count; bounds a wider count field if the
        // layout ever grows one.
        if count > MAX_RANGES {
            return Err(DecodeError::TooManyRanges(count));
        }

        let mut ranges = Vec::with_capacity(count);
        for index in 0..count {
            let range = reader
                .u16()
                .zip(reader.u16())
                .map(|(start, duration)| EncodedRange {
                    start_offset_minutes: start,
                    duration_minutes: duration,
                })
                .filter(EncodedRange::is_valid)
                .ok_or(DecodeError::InvalidRangeValues { index })?;
            ranges.push(range);
        }

        let tz_len = usize::from(reader.u8().ok_or(DecodeError::InvalidTimezoneBytes)?);
        let tz_bytes = reader.take(tz_len).ok_or(DecodeError::InvalidTimezoneBytes)?;
        let timezone = std::str::from_utf8(tz_bytes)
            .map_err(|_| DecodeError::InvalidTimezoneBytes)?
            .to_string();

        Ok(EncodedState {
            version,
            ranges,
            timezone,
        })
    }
}

/// Decode a share token back into a zone name and ranges.
///
/// # Errors
///
/// One [`DecodeError`] per token: the first check that fails.
pub fn decode(token: &str) -> Result<SharedState, DecodeError> {
    decode_inner(token.trim())
        .inspect_err(|err| debug!(error = %err, token_len = token.len(), "rejected share token"))
}

fn decode_inner(token: &str) -> Result<SharedState, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    let buf = TOKEN_ENGINE
        .decode(token)
        .map_err(|_| DecodeError::MalformedToken)?;
    EncodedState::from_bytes(&buf).map(EncodedState::into_shared)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Bounds-checked cursor over a byte slice.
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }
}

/// Milliseconds to whole minutes, halves rounding up.
fn round_minutes(ms: i64) -> i64 {
    ms.saturating_add(MS_PER_MINUTE / 2).div_euclid(MS_PER_MINUTE)
}

fn clamp_u16(n: i64) -> u16 {
    n.clamp(0, i64::from(u16::MAX)) as u16
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ── Tests ───────────────────────────────────────────────────────────────────
