//! Date spans and the temporal overlap rule
//!
//! Membership periods and goal periods are both closed intervals whose ends
//! may be missing. A missing end means the interval is open on that side.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Date formats accepted from host data, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a date leniently, returning `None` for blank or unparseable input
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    // ISO timestamps such as 2024-07-01T00:00:00Z
    let date_part = s.split('T').next().unwrap_or(s);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Serde helper: read an optional date, treating malformed values as absent
pub fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// A closed date interval, open-ended on any side without a bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSpan {
    /// Create a span from optional bounds
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A span without any bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The whole calendar year
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1),
            end: Some(NaiveDate::from_ymd_opt(year, 12, 31)?),
        })
    }

    /// Check whether neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check if a date falls within this span
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }

    /// Check whether two spans share at least one day
    ///
    /// A span that ends before the other starts, or starts after the other
    /// ends, does not overlap. Missing bounds never exclude.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        if let (Some(end), Some(other_start)) = (self.end, other.start) {
            if end < other_start {
                return false;
            }
        }
        if let (Some(start), Some(other_end)) = (self.start, other.end) {
            if start > other_end {
                return false;
            }
        }
        true
    }

    /// Intersect two spans; `None` when they do not overlap
    pub fn intersect(&self, other: &DateSpan) -> Option<DateSpan> {
        if !self.overlaps(other) {
            return None;
        }
        let start = match (self.start, other.start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Some(DateSpan { start, end })
    }

    /// Number of calendar months touched by a bounded span within one year
    pub fn months_touched(&self) -> u32 {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => {
                let months = (end.year() - start.year()) * 12 + end.month() as i32
                    - start.month() as i32
                    + 1;
                months.max(0) as u32
            }
            _ => 0,
        }
    }

    /// Parse a span in `START..END` form; either side may be blank
    pub fn parse(s: &str) -> Result<Self, SpanParseError> {
        let s = s.trim();
        let (start_raw, end_raw) = s
            .split_once("..")
            .ok_or_else(|| SpanParseError::InvalidFormat(s.to_string()))?;

        let parse_side = |raw: &str| -> Result<Option<NaiveDate>, SpanParseError> {
            if raw.trim().is_empty() {
                Ok(None)
            } else {
                parse_date(raw)
                    .map(Some)
                    .ok_or_else(|| SpanParseError::InvalidDate(raw.trim().to_string()))
            }
        };

        Ok(Self {
            start: parse_side(start_raw)?,
            end: parse_side(end_raw)?,
        })
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        write!(
            f,
            "{}..{}",
            side(self.start).unwrap_or_default(),
            side(self.end).unwrap_or_default()
        )
    }
}

/// Error type for span parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanParseError {
    InvalidFormat(String),
    InvalidDate(String),
}

impl fmt::Display for SpanParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanParseError::InvalidFormat(s) => write!(f, "Invalid span format: {}", s),
            SpanParseError::InvalidDate(s) => write!(f, "Invalid date: {}", s),
        }
    }
}

impl std::error::Error for SpanParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-07-01"), Some(d(2024, 7, 1)));
        assert_eq!(parse_date("01.07.2024"), Some(d(2024, 7, 1)));
        assert_eq!(parse_date("2024-07-01T10:00:00Z"), Some(d(2024, 7, 1)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_member_joining_after_goal_does_not_overlap() {
        let membership = DateSpan::new(Some(d(2024, 7, 1)), None);
        let goal = DateSpan::new(Some(d(2024, 1, 1)), Some(d(2024, 3, 31)));
        assert!(!membership.overlaps(&goal));
    }

    #[test]
    fn test_member_leaving_before_goal_does_not_overlap() {
        let membership = DateSpan::new(None, Some(d(2023, 12, 31)));
        let goal = DateSpan::new(Some(d(2024, 1, 1)), None);
        assert!(!membership.overlaps(&goal));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let membership = DateSpan::new(Some(d(2024, 3, 31)), None);
        let goal = DateSpan::new(Some(d(2024, 1, 1)), Some(d(2024, 3, 31)));
        assert!(membership.overlaps(&goal));
    }

    #[test]
    fn test_unbounded_spans_always_overlap() {
        let goal = DateSpan::new(Some(d(2024, 1, 1)), Some(d(2024, 3, 31)));
        assert!(DateSpan::unbounded().overlaps(&goal));
        assert!(goal.overlaps(&DateSpan::unbounded()));
    }

    #[test]
    fn test_contains() {
        let span = DateSpan::new(Some(d(2024, 1, 1)), Some(d(2024, 1, 31)));
        assert!(span.contains(d(2024, 1, 15)));
        assert!(!span.contains(d(2024, 2, 1)));
        assert!(DateSpan::unbounded().contains(d(1999, 1, 1)));
    }

    #[test]
    fn test_intersect_and_months() {
        let year = DateSpan::year(2024).unwrap();
        let membership = DateSpan::new(Some(d(2024, 3, 15)), Some(d(2025, 2, 1)));
        let inside = membership.intersect(&year).unwrap();
        assert_eq!(inside.start, Some(d(2024, 3, 15)));
        assert_eq!(inside.end, Some(d(2024, 12, 31)));
        assert_eq!(inside.months_touched(), 10);
    }

    #[test]
    fn test_parse_and_display() {
        let span = DateSpan::parse("2024-01-01..2024-03-31").unwrap();
        assert_eq!(span.start, Some(d(2024, 1, 1)));
        assert_eq!(span.to_string(), "2024-01-01..2024-03-31");

        let open = DateSpan::parse("..2024-03-31").unwrap();
        assert_eq!(open.start, None);
        assert!(DateSpan::parse("2024-01-01").is_err());
        assert!(DateSpan::parse("x..2024-01-01").is_err());
    }
}
