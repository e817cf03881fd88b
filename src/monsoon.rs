//! Southwest monsoon onset and withdrawal dates over Bihar.

use crate::error::{MonsoonError, Result};
use crate::loader::read_rows_from_path;
use crate::types::RawRow;
use crate::util::{days_diff, parse_date_safe, parse_i32_safe};
use chrono::NaiveDate;
use log::warn;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsoonSpell {
    pub year: i32,
    pub onset: NaiveDate,
    pub withdrawal: NaiveDate,
}

impl MonsoonSpell {
    /// Days between onset and withdrawal.
    pub fn stay_days(&self) -> i64 {
        days_diff(self.onset, self.withdrawal)
    }
}

// Calendar headers come with irregular spacing ("Date  of   Withdrawal").
fn squash(h: &str) -> String {
    h.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn cell<'a>(row: &'a RawRow, wanted: &str) -> Option<&'a str> {
    row.fields
        .iter()
        .find(|(k, _)| squash(k.trim_start_matches('\u{feff}')) == wanted)
        .map(|(_, v)| v.as_str())
}

/// Parse one calendar row. Rows without a year are `Ok(None)`.
pub fn parse_spell(row: &RawRow) -> Result<Option<MonsoonSpell>> {
    let Some(year) = parse_i32_safe(cell(row, "year")) else {
        return Ok(None);
    };
    let date = |header: &str| {
        let raw = cell(row, header);
        parse_date_safe(raw).ok_or_else(|| MonsoonError::InvalidDate {
            value: raw.unwrap_or_default().to_string(),
        })
    };
    Ok(Some(MonsoonSpell {
        year,
        onset: date("date of onset")?,
        withdrawal: date("date of withdrawal")?,
    }))
}

pub fn spells_from_rows(rows: &[RawRow]) -> Vec<MonsoonSpell> {
    rows.iter()
        .filter_map(|row| match parse_spell(row) {
            Ok(spell) => spell,
            Err(e) => {
                warn!("Skipping monsoon calendar row: {}", e);
                None
            }
        })
        .collect()
}

pub fn load_spells(path: &Path) -> Result<Vec<MonsoonSpell>> {
    let csv_rows = read_rows_from_path(path)?;
    if csv_rows.bad_rows > 0 {
        warn!("{}: {} malformed rows skipped", path.display(), csv_rows.bad_rows);
    }
    Ok(spells_from_rows(&csv_rows.rows))
}

pub fn find_spell(spells: &[MonsoonSpell], year: i32) -> Option<&MonsoonSpell> {
    spells.iter().find(|s| s.year == year)
}
