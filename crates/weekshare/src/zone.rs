//! IANA timezone identifiers.
//!
//! Zone names are resolved against the `chrono-tz` database compiled into the
//! crate. A name the database does not know is never used for arithmetic: it
//! is replaced by a fallback zone (UTC unless configured otherwise) and the
//! substitution is logged.

use std::fmt;
use std::str::FromStr;

use chrono::{Offset, TimeZone};
use chrono_tz::{OffsetName, Tz, TZ_VARIANTS};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::civil::Instant;

/// Name of the zone used when a requested zone cannot be resolved.
pub const DEFAULT_ZONE: &str = "UTC";

/// A resolved IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TimeZoneId(Tz);

impl TimeZoneId {
    pub const UTC: TimeZoneId = TimeZoneId(Tz::UTC);

    /// Strict lookup: `None` when the database has no such zone.
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(TimeZoneId)
    }

    /// Lookup that substitutes [`DEFAULT_ZONE`] for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::resolve_or(name, DEFAULT_ZONE)
    }

    /// Lookup that substitutes `fallback` (or UTC, if `fallback` is unknown too).
    pub fn resolve_or(name: &str, fallback: &str) -> Self {
        match Self::parse(name) {
            Some(zone) => zone,
            None => {
                let substitute = Self::parse(fallback).unwrap_or(Self::UTC);
                warn!(
                    requested = name,
                    substitute = substitute.name(),
                    "unknown timezone, substituting fallback"
                );
                substitute
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }

    /// Offset from UTC in minutes at `instant` (positive east of Greenwich).
    pub fn utc_offset_minutes(&self, instant: Instant) -> i64 {
        let utc = instant.to_datetime().naive_utc();
        let offset = self.0.offset_from_utc_datetime(&utc);
        i64::from(offset.fix().local_minus_utc()) / 60
    }

    /// Short display name at `instant`, e.g. `CEST` or `+09`.
    ///
    /// Falls back to the zone id when the database has no abbreviation.
    pub fn short_name(&self, instant: Instant) -> String {
        let utc = instant.to_datetime().naive_utc();
        let offset = self.0.offset_from_utc_datetime(&utc);
        match offset.abbreviation() {
            Some(abbr) if !abbr.is_empty() => abbr.to_string(),
            _ => self.name().to_string(),
        }
    }
}

impl Default for TimeZoneId {
    fn default() -> Self {
        Self::UTC
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown timezone '{s}'"))
    }
}

impl From<Tz> for TimeZoneId {
    fn from(tz: Tz) -> Self {
        TimeZoneId(tz)
    }
}

impl From<String> for TimeZoneId {
    fn from(name: String) -> Self {
        Self::resolve(&name)
    }
}

impl From<TimeZoneId> for String {
    fn from(zone: TimeZoneId) -> Self {
        zone.name().to_string()
    }
}

/// Every zone name known to the bundled database, in database order.
pub fn supported_time_zones() -> Vec<&'static str> {
    TZ_VARIANTS.iter().map(|tz| tz.name()).collect()
}

/// Case-insensitive substring search over [`supported_time_zones`].
///
/// A blank query returns every zone.
pub fn search_time_zones(query: &str) -> Vec<&'static str> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return supported_time_zones();
    }
    TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| name.to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::WEEK_ANCHOR;

    #[test]
    fn test_parse_known_zone() {
        let zone = TimeZoneId::parse("Europe/Warsaw").unwrap();
        assert_eq!(zone.name(), "Europe/Warsaw");
    }

    #[test]
    fn test_parse_unknown_zone_is_none() {
        assert!(TimeZoneId::parse("Mars/Olympus_Mons").is_none());
        assert!(TimeZoneId::parse("").is_none());
    }

    #[test]
    fn test_resolve_unknown_substitutes_utc() {
        assert_eq!(TimeZoneId::resolve("Invalid/Zone"), TimeZoneId::UTC);
    }

    #[test]
    fn test_resolve_or_uses_configured_fallback() {
        let zone = TimeZoneId::resolve_or("Invalid/Zone", "Asia/Tokyo");
        assert_eq!(zone.name(), "Asia/Tokyo");

        // An unknown fallback still ends at UTC.
        let zone = TimeZoneId::resolve_or("Invalid/Zone", "Also/Invalid");
        assert_eq!(zone, TimeZoneId::UTC);
    }

    #[test]
    fn test_utc_offset_minutes() {
        let tokyo = TimeZoneId::resolve("Asia/Tokyo");
        assert_eq!(tokyo.utc_offset_minutes(WEEK_ANCHOR), 540);

        let ny = TimeZoneId::resolve("America/New_York");
        // January: EST
        assert_eq!(ny.utc_offset_minutes(WEEK_ANCHOR), -300);
    }

    #[test]
    fn test_short_name() {
        let berlin = TimeZoneId::resolve("Europe/Berlin");
        assert_eq!(berlin.short_name(WEEK_ANCHOR), "CET");
        assert_eq!(TimeZoneId::UTC.short_name(WEEK_ANCHOR), "UTC");
    }

    #[test]
    fn test_supported_zones_contains_common_names() {
        let zones = supported_time_zones();
        for name in ["UTC", "Europe/London", "America/Los_Angeles", "Australia/Sydney"] {
            assert!(zones.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search_time_zones("  warsaw ");
        assert_eq!(hits, vec!["Europe/Warsaw"]);
    }

    #[test]
    fn test_search_blank_returns_all() {
        assert_eq!(search_time_zones("").len(), supported_time_zones().len());
    }

    #[test]
    fn test_serde_string_form() {
        let zone = TimeZoneId::resolve("America/Chicago");
        let json = serde_json::to_string(&zone).unwrap();
        assert_eq!(json, "\"America/Chicago\"");

        let back: TimeZoneId = serde_json::from_str("\"Nowhere/Special\"").unwrap();
        assert_eq!(back, TimeZoneId::UTC);
    }
}
