//! Header discovery for rainfall CSVs.
//!
//! Source files spell their headers differently (`DISTRICT NAME`,
//! `Dist.`, `Actual R/F (mm)`, `Departure %`), so the loader looks at the
//! first row and resolves which header carries which field. Resolution is a
//! [`ColumnStrategy`]: header sniffing by default, or an explicit mapping
//! from configuration.

use crate::types::RawRow;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    District,
    Actual,
    Normal,
    Departure,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::District, Field::Actual, Field::Normal, Field::Departure];

    /// Order in which fields pick headers. Departure headers often mention
    /// the normal too ("Departure from Normal (%)"), so departure goes first.
    const RESOLVE_ORDER: [Field; 4] = [Field::Departure, Field::District, Field::Actual, Field::Normal];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Field::District => &["district", "dist"],
            Field::Actual => &["actual"],
            Field::Normal => &["normal"],
            Field::Departure => &["departure", "dep", "%"],
        }
    }

    fn matches(self, normalized_header: &str) -> bool {
        self.keywords().iter().any(|kw| normalized_header.contains(kw))
    }

    /// Column index used when no header matches.
    fn fallback_index(self) -> usize {
        match self {
            Field::District => 1,
            Field::Actual => 2,
            Field::Normal => 3,
            Field::Departure => 4,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::District => "district",
            Field::Actual => "actual",
            Field::Normal => "normal",
            Field::Departure => "departure",
        };
        f.write_str(name)
    }
}

/// Literal header names for each semantic field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub district: Option<String>,
    pub actual: Option<String>,
    pub normal: Option<String>,
    pub departure: Option<String>,
    /// Fields assigned by position rather than by header keyword.
    pub guessed: Vec<Field>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::District => self.district.as_deref(),
            Field::Actual => self.actual.as_deref(),
            Field::Normal => self.normal.as_deref(),
            Field::Departure => self.departure.as_deref(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::District => &mut self.district,
            Field::Actual => &mut self.actual,
            Field::Normal => &mut self.normal,
            Field::Departure => &mut self.departure,
        }
    }

    pub fn unresolved(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    fn is_claimed(&self, header: &str) -> bool {
        Field::ALL.iter().any(|f| self.get(*f) == Some(header))
    }

    /// Cell value of `field` in `row`, if the column is known and present.
    pub fn value<'a>(&self, row: &'a RawRow, field: Field) -> Option<&'a str> {
        row.get(self.get(field)?)
    }
}

pub trait ColumnStrategy {
    fn resolve(&self, sample: &RawRow) -> ColumnMap;
}

/// Keyword sniffing with positional fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderHeuristic;

impl ColumnStrategy for HeaderHeuristic {
    fn resolve(&self, sample: &RawRow) -> ColumnMap {
        normalize_columns(sample)
    }
}

/// Caller-supplied header names. Fields left `None` are sniffed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplicitColumns {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub actual: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
}

impl ExplicitColumns {
    pub fn is_empty(&self) -> bool {
        self.district.is_none()
            && self.actual.is_none()
            && self.normal.is_none()
            && self.departure.is_none()
    }

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::District => self.district.as_deref(),
            Field::Actual => self.actual.as_deref(),
            Field::Normal => self.normal.as_deref(),
            Field::Departure => self.departure.as_deref(),
        }
    }
}

impl ColumnStrategy for ExplicitColumns {
    fn resolve(&self, sample: &RawRow) -> ColumnMap {
        let mut map = ColumnMap::default();
        for field in Field::ALL {
            if let Some(name) = self.get(field) {
                // Match configured names the same loose way headers are compared.
                let wanted = normalize_header(name);
                if let Some(key) = sample.keys().find(|k| normalize_header(k) == wanted) {
                    *map.slot(field) = Some(key.to_string());
                }
            }
        }
        if map.unresolved().is_empty() {
            return map;
        }
        let sniffed = normalize_columns(sample);
        for field in map.unresolved() {
            if let Some(key) = sniffed.get(field) {
                if !map.is_claimed(key) {
                    *map.slot(field) = Some(key.to_string());
                    if sniffed.guessed.contains(&field) {
                        map.guessed.push(field);
                    }
                }
            }
        }
        map
    }
}

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Resolve the column map from one sample row.
///
/// Each field takes the first header, in header order, containing one of
/// its keywords. A header is claimed by at most one field. Unmatched fields
/// fall back to columns 2 through 5. Never fails.
pub fn normalize_columns(sample: &RawRow) -> ColumnMap {
    let mut map = ColumnMap::default();
    let keys: Vec<&str> = sample.keys().collect();
    for field in Field::RESOLVE_ORDER {
        let hit = keys
            .iter()
            .find(|k| !map.is_claimed(k) && field.matches(&normalize_header(k)));
        if let Some(key) = hit {
            *map.slot(field) = Some(key.to_string());
        }
    }

    for field in map.unresolved() {
        if let Some(key) = keys.get(field.fallback_index()) {
            if !map.is_claimed(key) {
                *map.slot(field) = Some(key.to_string());
                map.guessed.push(field);
            }
        }
    }
    map
}
