//! Error types for weekshare operations.

use thiserror::Error;

use crate::civil::Instant;
use crate::schedule::RangeId;

/// Why a shared state token was rejected.
///
/// The decoder stops at the first violation, so exactly one of these is
/// reported per token and no partial state is ever returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty state")]
    EmptyInput,

    #[error("Malformed state token")]
    MalformedToken,

    #[error("Unsupported state version: {0}")]
    UnsupportedVersion(u8),

    /// Count above [`crate::codec::MAX_RANGES`]. Unreachable while the v1
    /// count field is a single byte.
    #[error("Too many ranges: {0}")]
    TooManyRanges(usize),

    #[error("Invalid range values at index {index}")]
    InvalidRangeValues { index: usize },

    #[error("Invalid timezone bytes")]
    InvalidTimezoneBytes,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Range overlaps an existing availability (id {existing})")]
    Overlap { existing: RangeId },

    #[error("Range count is capped at {max}")]
    CapacityReached { max: usize },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Range {start}..{end} needs more day segments than a week holds")]
    SegmentLimitExceeded { start: Instant, end: Instant },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
