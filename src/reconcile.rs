//! Left-outer join of two periods by district.

use crate::classify::StatusCategory;
use crate::types::{ComparisonRecord, RainfallRecord};
use log::debug;
use std::collections::HashMap;

/// Join `period_a` against `period_b` by district name.
///
/// Every district of `period_a` appears exactly once, sorted by name. A
/// district missing from `period_b` gets `actual2 = 0`, no departure and
/// `MISSING` status, with `matched = false`. Districts only in `period_b`
/// are dropped. Missing actuals count as 0 in `difference`.
pub fn reconcile(period_a: &[RainfallRecord], period_b: &[RainfallRecord]) -> Vec<ComparisonRecord> {
    // First record wins when a district repeats.
    let mut index: HashMap<&str, &RainfallRecord> = HashMap::with_capacity(period_b.len());
    for rec in period_b {
        index.entry(rec.district.as_str()).or_insert(rec);
    }

    let mut out: Vec<ComparisonRecord> = period_a
        .iter()
        .map(|a| {
            let actual1 = a.actual_mm.unwrap_or(0.0);
            let (actual2, departure2, status2, matched) = match index.get(a.district.as_str()) {
                Some(b) => (b.actual_mm.unwrap_or(0.0), b.departure_pct, b.status(), true),
                None => {
                    debug!("{} has no counterpart in second period", a.district);
                    (0.0, None, StatusCategory::Missing, false)
                }
            };
            ComparisonRecord {
                district: a.district.clone(),
                actual1,
                actual2,
                departure1: a.departure_pct,
                departure2,
                status1: a.status(),
                status2,
                difference: actual1 - actual2,
                matched,
            }
        })
        .collect();

    out.sort_by(|x, y| x.district.cmp(&y.district));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(district: &str, actual: Option<f64>, departure: Option<f64>) -> RainfallRecord {
        RainfallRecord {
            district: district.to_string(),
            actual_mm: actual,
            normal_mm: None,
            departure_pct: departure,
        }
    }

    #[test]
    fn test_patna_without_second_period() {
        let a = vec![rec("PATNA", Some(120.0), Some(-25.0))];
        let out = reconcile(&a, &[]);
        assert_eq!(out.len(), 1);
        let r = &out[0];
        assert_eq!(r.district, "PATNA");
        assert_eq!(r.actual1, 120.0);
        assert_eq!(r.actual2, 0.0);
        assert_eq!(r.difference, 120.0);
        assert_eq!(r.status1, StatusCategory::Deficient);
        assert_eq!(r.status2, StatusCategory::Missing);
        assert_eq!(r.departure2, None);
        assert!(!r.matched);
    }

    #[test]
    fn test_matched_districts_sorted() {
        let a = vec![
            rec("VAISHALI", Some(80.0), Some(10.0)),
            rec("ARARIA", Some(200.0), Some(70.0)),
            rec("GAYA", None, None),
        ];
        let b = vec![
            rec("GAYA", Some(50.0), Some(-30.0)),
            rec("ARARIA", Some(150.0), Some(25.0)),
            rec("KATIHAR", Some(1.0), Some(0.0)),
        ];
        let out = reconcile(&a, &b);
        let names: Vec<&str> = out.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(names, vec!["ARARIA", "GAYA", "VAISHALI"]);

        assert_eq!(out[0].difference, 50.0);
        assert_eq!(out[0].status1, StatusCategory::LargeExcess);
        assert_eq!(out[0].status2, StatusCategory::Excess);

        // Missing actual on the first side counts as zero.
        assert_eq!(out[1].actual1, 0.0);
        assert_eq!(out[1].difference, -50.0);
        assert_eq!(out[1].status1, StatusCategory::Missing);
        assert!(out[1].matched);

        assert!(!out[2].matched);
    }

    #[test]
    fn test_first_match_in_second_period() {
        let a = vec![rec("SIWAN", Some(10.0), None)];
        let b = vec![rec("SIWAN", Some(4.0), None), rec("SIWAN", Some(9.0), None)];
        let out = reconcile(&a, &b);
        assert_eq!(out[0].actual2, 4.0);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let a = vec![rec("PATNA", Some(10.0), None)];
        let b = vec![rec("Patna", Some(4.0), None)];
        assert!(!reconcile(&a, &b)[0].matched);
    }

    #[test]
    fn test_empty_first_period() {
        let b = vec![rec("PATNA", Some(4.0), None)];
        assert!(reconcile(&[], &b).is_empty());
    }

    fn arb_period() -> impl Strategy<Value = Vec<RainfallRecord>> {
        proptest::collection::btree_map(
            "[A-Z]{1,6}",
            (proptest::option::of(0.0f64..2000.0), proptest::option::of(-100.0f64..300.0)),
            0..12,
        )
        .prop_map(|m| {
            m.into_iter()
                .map(|(name, (actual, dep))| rec(&name, actual, dep))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
    }

    proptest! {
        #[test]
        fn reconcile_is_left_outer_complete(a in arb_period(), b in arb_period()) {
            let out = reconcile(&a, &b);
            prop_assert_eq!(out.len(), a.len());
            for rec_a in &a {
                prop_assert_eq!(out.iter().filter(|r| r.district == rec_a.district).count(), 1);
            }
        }

        #[test]
        fn reconcile_output_is_sorted(a in arb_period(), b in arb_period()) {
            let out = reconcile(&a, &b);
            prop_assert!(out.windows(2).all(|w| w[0].district <= w[1].district));
        }

        #[test]
        fn reconcile_is_idempotent(a in arb_period(), b in arb_period()) {
            prop_assert_eq!(reconcile(&a, &b), reconcile(&a, &b));
        }

        #[test]
        fn unmatched_districts_are_default_filled(a in arb_period(), b in arb_period()) {
            for r in reconcile(&a, &b) {
                if !b.iter().any(|x| x.district == r.district) {
                    prop_assert_eq!(r.actual2, 0.0);
                    prop_assert_eq!(r.status2, StatusCategory::Missing);
                    prop_assert_eq!(r.difference, r.actual1);
                }
            }
        }
    }
}
