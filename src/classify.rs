//! IMD rainfall status classification.
//!
//! A departure percentage maps to one of seven categories. The band table
//! below is the only place thresholds are written down; both [`classify`]
//! and the printed [`legend`] read from it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCategory {
    LargeExcess,
    Excess,
    Normal,
    Deficient,
    LargeDeficient,
    NoRain,
    Missing,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 7] = [
        StatusCategory::LargeExcess,
        StatusCategory::Excess,
        StatusCategory::Normal,
        StatusCategory::Deficient,
        StatusCategory::LargeDeficient,
        StatusCategory::NoRain,
        StatusCategory::Missing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusCategory::LargeExcess => "LARGE EXCESS",
            StatusCategory::Excess => "EXCESS",
            StatusCategory::Normal => "NORMAL",
            StatusCategory::Deficient => "DEFICIENT",
            StatusCategory::LargeDeficient => "LARGE DEFICIENT",
            StatusCategory::NoRain => "NO RAIN",
            StatusCategory::Missing => "MISSING",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed-open band `[lower, upper)` of departure percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub status: StatusCategory,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Upper bound (inclusive) of the NO RAIN band.
pub const NO_RAIN_AT_OR_BELOW: f64 = -100.0;

/// Evaluated top down. `None` lower means unbounded.
pub const BANDS: [Band; 6] = [
    Band { status: StatusCategory::LargeExcess, lower: Some(60.0), upper: None },
    Band { status: StatusCategory::Excess, lower: Some(20.0), upper: Some(60.0) },
    Band { status: StatusCategory::Normal, lower: Some(-19.0), upper: Some(20.0) },
    Band { status: StatusCategory::Deficient, lower: Some(-59.0), upper: Some(-19.0) },
    // Open at -100: exactly -100 falls through to NO RAIN.
    Band { status: StatusCategory::LargeDeficient, lower: None, upper: Some(-59.0) },
    Band { status: StatusCategory::NoRain, lower: None, upper: None },
];

impl Band {
    fn contains(&self, d: f64) -> bool {
        let above = match self.lower {
            Some(lo) => d >= lo,
            None => true,
        };
        let below = match self.upper {
            Some(hi) => d < hi,
            None => true,
        };
        above && below
    }

    /// Human readable range, e.g. `20% to 59%`.
    pub fn describe(&self) -> String {
        match self.status {
            StatusCategory::LargeDeficient => {
                format!("{}% < d < {}%", NO_RAIN_AT_OR_BELOW, fmt_bound(self.upper))
            }
            StatusCategory::NoRain => format!("d <= {}%", NO_RAIN_AT_OR_BELOW),
            _ => match (self.lower, self.upper) {
                (Some(lo), Some(hi)) => format!("{}% <= d < {}%", lo, hi),
                (Some(lo), None) => format!("d >= {}%", lo),
                (None, Some(hi)) => format!("d < {}%", hi),
                (None, None) => "any".to_string(),
            },
        }
    }
}

fn fmt_bound(b: Option<f64>) -> String {
    b.map(|v| v.to_string()).unwrap_or_default()
}

/// Classify a departure percentage.
///
/// Absent, NaN and infinite departures are `MISSING`. Total over `f64`.
pub fn classify(departure: Option<f64>) -> StatusCategory {
    let Some(d) = departure.filter(|d| d.is_finite()) else {
        return StatusCategory::Missing;
    };
    if d <= NO_RAIN_AT_OR_BELOW {
        return StatusCategory::NoRain;
    }
    BANDS
        .iter()
        .find(|band| band.contains(d))
        .map(|band| band.status)
        .unwrap_or(StatusCategory::Missing)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub status: StatusCategory,
    pub range: String,
}

/// Legend rows in display order, derived from [`BANDS`].
pub fn legend() -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = BANDS
        .iter()
        .map(|band| LegendEntry {
            status: band.status,
            range: band.describe(),
        })
        .collect();
    entries.push(LegendEntry {
        status: StatusCategory::Missing,
        range: "no departure available".to_string(),
    });
    entries
}
