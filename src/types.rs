use crate::classify::{classify, StatusCategory};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// One parsed CSV row, header name to cell, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RawRow {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallRecord {
    pub district: String,
    pub actual_mm: Option<f64>,
    pub normal_mm: Option<f64>,
    pub departure_pct: Option<f64>,
}

impl RainfallRecord {
    pub fn status(&self) -> StatusCategory {
        classify(self.departure_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub district: String,
    pub actual1: f64,
    pub actual2: f64,
    pub departure1: Option<f64>,
    pub departure2: Option<f64>,
    pub status1: StatusCategory,
    pub status2: StatusCategory,
    pub difference: f64,
    /// False when the second period had no record for this district, in
    /// which case `actual2 == 0` means "no data" rather than "no rain".
    pub matched: bool,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComparisonRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "Actual1")]
    #[tabled(rename = "Actual Y1 (mm)")]
    pub actual1: String,
    #[serde(rename = "Actual2")]
    #[tabled(rename = "Actual Y2 (mm)")]
    pub actual2: String,
    #[serde(rename = "Difference")]
    #[tabled(rename = "Difference")]
    pub difference: String,
    #[serde(rename = "Status1")]
    #[tabled(rename = "Status Y1 (Dev)")]
    pub status1: String,
    #[serde(rename = "Status2")]
    #[tabled(rename = "Status Y2 (Dev)")]
    pub status2: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DistrictRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual (mm)")]
    pub actual: String,
    #[serde(rename = "Normal")]
    #[tabled(rename = "Normal (mm)")]
    pub normal: String,
    #[serde(rename = "Departure")]
    #[tabled(rename = "Departure (%)")]
    pub departure: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PeriodSummary {
    pub total_districts: usize,
    pub reporting_districts: usize,
    pub mean_actual_mm: Option<f64>,
    pub median_actual_mm: Option<f64>,
    pub mean_normal_mm: Option<f64>,
    pub mean_departure_pct: Option<f64>,
    pub wettest_district: Option<String>,
    pub driest_district: Option<String>,
    pub status_counts: BTreeMap<StatusCategory, usize>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ComparisonSummary {
    pub total_districts: usize,
    pub matched_districts: usize,
    pub mean_difference_mm: Option<f64>,
    pub wetter_in_first: usize,
    pub drier_in_first: usize,
    pub unchanged: usize,
    pub largest_increase: Option<String>,
    pub largest_decrease: Option<String>,
}
