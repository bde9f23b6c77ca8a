//! # weekshare
//!
//! Timezone-aware weekly availability that travels in a URL.
//!
//! A schedule is a list of absolute instant ranges recurring every week. It
//! is encoded into a short URL-safe token; anyone opening the link sees the
//! same instants laid out on a Monday-to-Sunday grid in their own zone.
//!
//! ## Modules
//!
//! - [`civil`]: instant ↔ local wall-clock conversion, DST gaps and overlaps
//! - [`anchor`]: the fixed Monday reference and day-column bucketing
//! - [`segment`]: split an instant range into per-local-day pieces
//! - [`codec`]: versioned binary layout and its base64 token form
//! - [`validate`]: overlap and capacity checks
//! - [`grid`]: half-hour grid selections and projection
//! - [`schedule`]: the editable list of ranges with its own id counter
//! - [`labels`]: 12/24-hour labels and range descriptions
//! - [`zone`]: IANA zone lookup with fallback, search, abbreviations
//! - [`config`]: schedule options
//! - [`error`]: error types

pub mod anchor;
pub mod civil;
pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod labels;
pub mod schedule;
pub mod segment;
pub mod validate;
pub mod zone;

pub use anchor::{day_index_of, day_name, WEEK_ANCHOR};
pub use civil::{to_civil, to_instant, CivilDateTime, Instant};
pub use codec::{decode, encode, share_url, token_from_url, SharedState, TimeRange, STATE_PARAM};
pub use config::ScheduleOptions;
pub use error::{DecodeError, ScheduleError};
pub use grid::{project, DayColumns, GridBlock, Selection};
pub use labels::TimeFormat;
pub use schedule::{AvailabilityRange, RangeId, Schedule};
pub use segment::{segment, Segment};
pub use validate::overlaps;
pub use zone::TimeZoneId;
