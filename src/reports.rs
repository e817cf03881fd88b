use crate::classify::StatusCategory;
use crate::types::{
    ComparisonRecord, ComparisonRow, ComparisonSummary, DistrictRow, PeriodSummary,
    RainfallRecord,
};
use crate::util::{average, format_number, format_optional, format_signed, median};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Statistics for one period. Missing values are left out of every average.
pub fn summarize_period(data: &[RainfallRecord]) -> PeriodSummary {
    let actuals: Vec<f64> = data.iter().filter_map(|r| r.actual_mm).collect();
    let normals: Vec<f64> = data.iter().filter_map(|r| r.normal_mm).collect();
    let departures: Vec<f64> = data.iter().filter_map(|r| r.departure_pct).collect();

    let by_actual = |a: &&RainfallRecord, b: &&RainfallRecord| {
        a.actual_mm
            .partial_cmp(&b.actual_mm)
            .unwrap_or(Ordering::Equal)
    };
    let with_actual = || data.iter().filter(|r| r.actual_mm.is_some());
    let wettest = with_actual().max_by(by_actual).map(|r| r.district.clone());
    let driest = with_actual().min_by(by_actual).map(|r| r.district.clone());

    PeriodSummary {
        total_districts: data.len(),
        reporting_districts: actuals.len(),
        mean_actual_mm: average(&actuals),
        median_actual_mm: median(actuals),
        mean_normal_mm: average(&normals),
        mean_departure_pct: average(&departures),
        wettest_district: wettest,
        driest_district: driest,
        status_counts: status_counts(data.iter().map(|r| r.status())),
    }
}

/// Count per category, with every category present.
pub fn status_counts<I>(statuses: I) -> BTreeMap<StatusCategory, usize>
where
    I: IntoIterator<Item = StatusCategory>,
{
    let mut counts: BTreeMap<StatusCategory, usize> =
        StatusCategory::ALL.iter().map(|s| (*s, 0)).collect();
    for s in statuses {
        *counts.entry(s).or_default() += 1;
    }
    counts
}

pub fn summarize_comparison(data: &[ComparisonRecord]) -> ComparisonSummary {
    let diffs: Vec<f64> = data.iter().map(|r| r.difference).collect();
    let by_diff = |a: &&ComparisonRecord, b: &&ComparisonRecord| a.difference.total_cmp(&b.difference);
    let largest_increase = data
        .iter()
        .filter(|r| r.difference > 0.0)
        .max_by(by_diff)
        .map(|r| r.district.clone());
    let largest_decrease = data
        .iter()
        .filter(|r| r.difference < 0.0)
        .min_by(by_diff)
        .map(|r| r.district.clone());

    ComparisonSummary {
        total_districts: data.len(),
        matched_districts: data.iter().filter(|r| r.matched).count(),
        mean_difference_mm: average(&diffs),
        wetter_in_first: diffs.iter().filter(|d| **d > 0.0).count(),
        drier_in_first: diffs.iter().filter(|d| **d < 0.0).count(),
        unchanged: diffs.iter().filter(|d| **d == 0.0).count(),
        largest_increase,
        largest_decrease,
    }
}

fn status_cell(status: StatusCategory, departure: Option<f64>) -> String {
    match departure {
        // Halves round away from zero, like the dashboard's `toFixed(0)`.
        Some(d) => format!("{} ({}%)", status, format_number(d.round(), 0)),
        None => format!("{} (N/A)", status),
    }
}

pub fn comparison_rows(data: &[ComparisonRecord]) -> Vec<ComparisonRow> {
    data.iter()
        .map(|r| ComparisonRow {
            district: r.district.clone(),
            actual1: format_number(r.actual1, 1),
            actual2: format_number(r.actual2, 1),
            difference: format_signed(r.difference, 1),
            status1: status_cell(r.status1, r.departure1),
            status2: status_cell(r.status2, r.departure2),
        })
        .collect()
}

pub fn district_rows(data: &[RainfallRecord]) -> Vec<DistrictRow> {
    data.iter()
        .map(|r| DistrictRow {
            district: r.district.clone(),
            actual: format_optional(r.actual_mm, 1),
            normal: format_optional(r.normal_mm, 1),
            departure: format_optional(r.departure_pct.map(f64::round), 0),
            status: r.status().to_string(),
        })
        .collect()
}

/// Whether either period carries any departure value.
pub fn departure_available(data: &[ComparisonRecord]) -> bool {
    data.iter()
        .any(|r| r.departure1.is_some() || r.departure2.is_some())
}

/// Case-insensitive substring match on the district name. An empty query
/// keeps everything.
pub fn filter_districts<'a>(data: &'a [ComparisonRecord], query: &str) -> Vec<&'a ComparisonRecord> {
    let needle = query.trim().to_uppercase();
    data.iter()
        .filter(|r| r.district.to_uppercase().contains(&needle))
        .collect()
}
