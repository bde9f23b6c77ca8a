//! Schedule options.

use serde::{Deserialize, Serialize};

use crate::codec::MAX_RANGES;
use crate::labels::TimeFormat;
use crate::zone::DEFAULT_ZONE;

/// Options for a [`Schedule`](crate::schedule::Schedule).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use weekshare::config::ScheduleOptions;
///
/// let options: ScheduleOptions = serde_json::from_str(r#"{"max_ranges": 10}"#).unwrap();
/// assert_eq!(options.max_ranges, 10);
/// assert_eq!(options.fallback_timezone, "UTC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Most ranges a schedule admits. Never above what a token can carry.
    pub max_ranges: usize,
    /// Zone used in place of an unknown zone name.
    pub fallback_timezone: String,
    /// Clock style for rendered labels.
    pub time_format: TimeFormat,
}

impl ScheduleOptions {
    /// `max_ranges` capped at the token's limit.
    pub fn effective_max_ranges(&self) -> usize {
        self.max_ranges.min(MAX_RANGES)
    }
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        ScheduleOptions {
            max_ranges: MAX_RANGES,
            fallback_timezone: DEFAULT_ZONE.to_string(),
            time_format: TimeFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScheduleOptions::default();
        assert_eq!(options.max_ranges, 255);
        assert_eq!(options.fallback_timezone, "UTC");
        assert_eq!(options.time_format, TimeFormat::H24);
    }

    #[test]
    fn test_max_ranges_capped_at_token_limit() {
        let options = ScheduleOptions {
            max_ranges: 1000,
            ..Default::default()
        };
        assert_eq!(options.effective_max_ranges(), 255);
    }

    #[test]
    fn test_deserialize_time_format() {
        let options: ScheduleOptions = serde_json::from_str(r#"{"time_format": "12"}"#).unwrap();
        assert_eq!(options.time_format, TimeFormat::H12);
    }
}
