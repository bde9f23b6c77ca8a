//! WASM bindings for weekshare.
//!
//! Structured values cross the boundary as JSON strings. Instants are
//! JavaScript millisecond timestamps.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use weekshare::civil::Instant;
use weekshare::codec::{self, TimeRange};
use weekshare::error::{DecodeError, ScheduleError};
use weekshare::zone::{search_time_zones, supported_time_zones, TimeZoneId};
use weekshare::{day_index_of, Schedule, ScheduleOptions, TimeFormat};

#[derive(Debug, thiserror::Error)]
enum BindingError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid time format: {0}")]
    Format(String),
}

type BindingResult<T> = Result<T, BindingError>;

fn to_json<T: Serialize>(value: &T) -> BindingResult<String> {
    Ok(serde_json::to_string(value)?)
}

// JS numbers carry integral millisecond timestamps well inside f64 precision.
fn instant(ms: f64) -> Instant {
    Instant::from_millis(ms as i64)
}

/// Admit ranges in order through the schedule's overlap and capacity checks.
fn schedule_from_json(timezone: &str, ranges_json: &str) -> BindingResult<Schedule> {
    let ranges: Vec<TimeRange> = serde_json::from_str(ranges_json)?;
    let mut schedule = Schedule::new(timezone, ScheduleOptions::default());
    for range in ranges {
        schedule.add_range(range)?;
    }
    Ok(schedule)
}

// ── Codec ───────────────────────────────────────────────────────────────────

fn encode_state_inner(timezone: &str, ranges_json: &str) -> BindingResult<String> {
    Ok(schedule_from_json(timezone, ranges_json)?.to_token())
}

fn decode_state_inner(token: &str) -> BindingResult<String> {
    to_json(&codec::decode(codec::token_from_url(token))?)
}

/// Encode `[{"start": ms, "end": ms}, ...]` owned in `timezone` into a token.
///
/// Overlapping ranges are rejected.
#[wasm_bindgen(js_name = encodeState)]
pub fn encode_state(timezone: &str, ranges_json: &str) -> Result<String, JsError> {
    encode_state_inner(timezone, ranges_json).map_err(JsError::from)
}

/// Decode a token (or a share URL) into `{"timezone", "ranges"}` JSON.
#[wasm_bindgen(js_name = decodeState)]
pub fn decode_state(token: &str) -> Result<String, JsError> {
    decode_state_inner(token).map_err(JsError::from)
}

#[wasm_bindgen(js_name = shareUrl)]
pub fn share_url(base: &str, token: &str) -> String {
    codec::share_url(base, token)
}

// ── Time ────────────────────────────────────────────────────────────────────

fn split_range_inner(start_ms: f64, end_ms: f64, timezone: &str) -> BindingResult<String> {
    let zone = TimeZoneId::resolve(timezone);
    to_json(&weekshare::segment(instant(start_ms), instant(end_ms), zone)?)
}

/// Per-local-day pieces of `[start, end)` in `timezone`, as JSON
/// `[{"day_index", "start", "end"}, ...]`.
#[wasm_bindgen(js_name = splitRange)]
pub fn split_range(start_ms: f64, end_ms: f64, timezone: &str) -> Result<String, JsError> {
    split_range_inner(start_ms, end_ms, timezone).map_err(JsError::from)
}

/// Day column (0 = Monday) of an instant as seen from `timezone`.
#[wasm_bindgen(js_name = dayIndex)]
pub fn day_index(ms: f64, timezone: &str) -> u8 {
    day_index_of(instant(ms), TimeZoneId::resolve(timezone))
}

// ── Views ───────────────────────────────────────────────────────────────────

fn project_grid_inner(ranges_json: &str, timezone: &str) -> BindingResult<String> {
    to_json(&schedule_from_json(timezone, ranges_json)?.project()?)
}

fn describe_token_inner(token: &str, timezone: &str, format: &str) -> BindingResult<String> {
    let time_format: TimeFormat = format.parse().map_err(BindingError::Format)?;
    let options = ScheduleOptions {
        time_format,
        ..Default::default()
    };
    let mut schedule = Schedule::from_token(codec::token_from_url(token), options)?;
    schedule.set_timezone(timezone);
    to_json(&schedule.describe())
}

/// Grid blocks per day column for `ranges_json` viewed from `timezone`.
/// Range ids follow input order, starting at 1.
#[wasm_bindgen(js_name = projectGrid)]
pub fn project_grid(ranges_json: &str, timezone: &str) -> Result<String, JsError> {
    project_grid_inner(ranges_json, timezone).map_err(JsError::from)
}

/// Description lines for a shared token in the viewer's zone, as a JSON
/// array of strings. `format` is `"12"` or `"24"`.
#[wasm_bindgen(js_name = describeToken)]
pub fn describe_token(token: &str, timezone: &str, format: &str) -> Result<String, JsError> {
    describe_token_inner(token, timezone, format).map_err(JsError::from)
}

// ── Zones ───────────────────────────────────────────────────────────────────

#[wasm_bindgen(js_name = supportedZones)]
pub fn supported_zones() -> Vec<String> {
    supported_time_zones().into_iter().map(String::from).collect()
}

#[wasm_bindgen(js_name = searchZones)]
pub fn search_zones(query: &str) -> Vec<String> {
    search_time_zones(query).into_iter().map(String::from).collect()
}

/// The zone a name resolves to, `UTC` for unknown names.
#[wasm_bindgen(js_name = resolveZone)]
pub fn resolve_zone(name: &str) -> String {
    TimeZoneId::resolve(name).name().to_string()
}
