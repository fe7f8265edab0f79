//! Property tests for the interval model.

use chrono::NaiveDate;
use motorpool_engine::DateInterval;
use proptest::prelude::*;

/// Days since 2020-01-01, kept small enough that every offset maps to a
/// real calendar date.
fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(offset)
}

fn arb_interval() -> impl Strategy<Value = DateInterval> {
    (0i64..3_000, 0i64..60)
        .prop_map(|(start, len)| DateInterval::new(day(start), day(start + len)).unwrap())
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_is_reflexive(a in arb_interval()) {
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn overlap_matches_closed_interval_definition(a in arb_interval(), b in arb_interval()) {
        let expected = a.start() <= b.end() && b.start() <= a.end();
        prop_assert_eq!(a.overlaps(&b), expected);
    }

    #[test]
    fn disjoint_iff_one_ends_before_the_other_starts(a in arb_interval(), b in arb_interval()) {
        let disjoint = a.end() < b.start() || b.end() < a.start();
        prop_assert_eq!(!a.overlaps(&b), disjoint);
    }

    #[test]
    fn shared_day_always_overlaps(start in 0i64..3_000, len_a in 0i64..60, len_b in 0i64..60) {
        // b starts exactly on a's last day
        let a = DateInterval::new(day(start), day(start + len_a)).unwrap();
        let b = DateInterval::new(day(start + len_a), day(start + len_a + len_b)).unwrap();
        prop_assert!(a.overlaps(&b));
    }

    #[test]
    fn construction_rejects_reversed_dates(start in 1i64..3_000, back in 1i64..60) {
        prop_assert!(DateInterval::new(day(start), day(start - back)).is_err());
    }

    #[test]
    fn days_is_positive_and_additive(a in arb_interval()) {
        prop_assert!(a.days() >= 1);
        prop_assert_eq!(a.days(), (a.end() - a.start()).num_days() + 1);
    }
}
