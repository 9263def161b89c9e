//! Property-based tests for accrual window segmentation.

use proptest::prelude::*;

use super::segment::year_segments;
use crate::calendar::BizDate;
use crate::ledger::LedgerError;

/// Strategy to generate dates between 1990 and 2060.
fn date() -> impl Strategy<Value = BizDate> {
    (0i64..25_000).prop_map(|offset| {
        BizDate::parse("19900101")
            .unwrap()
            .add_days(offset)
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Segments are contiguous, stay inside one year and cover the window
    /// `(last, to]` exactly.
    #[test]
    fn prop_segments_tile_window(last in date(), length in 1i64..4_000) {
        let to = last.add_days(length).unwrap();
        let segments = year_segments(last, to).unwrap();

        prop_assert_eq!(segments[0].from_date, last.add_days(1).unwrap());
        prop_assert_eq!(segments[segments.len() - 1].to_date, to);
        prop_assert_eq!(segments.len() as i32, to.year() - segments[0].from_date.year() + 1);

        for segment in &segments {
            prop_assert!(segment.from_date <= segment.to_date);
            prop_assert_eq!(segment.from_date.year(), segment.to_date.year());
        }
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].to_date, pair[0].to_date.year_end());
            prop_assert_eq!(pair[0].to_date.add_days(1).unwrap(), pair[1].from_date);
        }

        let total: i64 = segments.iter().map(|s| s.days()).sum();
        prop_assert_eq!(total, length);
    }

    /// Empty or inverted windows are rejected.
    #[test]
    fn prop_empty_window_rejected(last in date(), back in 0i64..1_000) {
        let to = last.add_days(-back).unwrap();
        let is_rejected = matches!(
            year_segments(last, to),
            Err(LedgerError::NoAccrualPeriod { .. })
        );
        prop_assert!(is_rejected);
    }
}
