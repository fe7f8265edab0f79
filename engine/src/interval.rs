//! Closed calendar-date intervals and the overlap rule.
//!
//! Rental periods are whole calendar days with both boundary days
//! occupied: a vehicle returned on a given day cannot be handed to the
//! next customer on that same day.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive rental period `[start, end]`.
///
/// The constructor enforces `start <= end`, so every value of this type
/// is well-formed. Deserialization goes through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "IntervalParts")]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

/// Raw wire form of an interval, validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalParts {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<IntervalParts> for DateInterval {
    type Error = Error;

    fn try_from(parts: IntervalParts) -> Result<Self> {
        DateInterval::new(parts.start, parts.end)
    }
}

impl DateInterval {
    /// Build an interval, rejecting `start > end` before any comparison
    /// is attempted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// First occupied day.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last occupied day.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both boundary days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Closed-interval overlap: true iff `self.start <= other.end` and
    /// `other.start <= self.end`. Sharing a single boundary day counts
    /// as an overlap.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether `day` falls inside the interval, boundaries included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl std::fmt::Display for DateInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateInterval {
        DateInterval::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2)).unwrap()
    }

    #[test]
    fn rejects_start_after_end() {
        let err = DateInterval::new(date(2024, 6, 20), date(2024, 6, 10)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInterval {
                start: date(2024, 6, 20),
                end: date(2024, 6, 10),
            }
        );
    }

    #[test]
    fn single_day_interval_is_valid() {
        let i = interval((2024, 6, 10), (2024, 6, 10));
        assert_eq!(i.days(), 1);
        assert!(i.contains(date(2024, 6, 10)));
    }

    #[test]
    fn days_counts_both_boundaries() {
        assert_eq!(interval((2024, 6, 10), (2024, 6, 15)).days(), 6);
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        let a = interval((2024, 6, 10), (2024, 6, 15));
        let b = interval((2024, 6, 16), (2024, 6, 20));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn shared_boundary_day_overlaps() {
        let a = interval((2024, 6, 10), (2024, 6, 15));
        let b = interval((2024, 6, 15), (2024, 6, 20));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_overlaps() {
        let outer = interval((2024, 6, 1), (2024, 6, 30));
        let inner = interval((2024, 6, 10), (2024, 6, 12));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn overlap_is_reflexive() {
        let a = interval((2024, 6, 10), (2024, 6, 15));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn deserialization_validates() {
        let ok: DateInterval =
            serde_json::from_str(r#"{"start":"2024-06-10","end":"2024-06-15"}"#).unwrap();
        assert_eq!(ok.days(), 6);

        let bad = serde_json::from_str::<DateInterval>(
            r#"{"start":"2024-06-20","end":"2024-06-10"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn serialization_roundtrip() {
        let a = interval((2024, 6, 10), (2024, 6, 15));
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"start":"2024-06-10","end":"2024-06-15"}"#);
        let parsed: DateInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(a, parsed);
    }
}
