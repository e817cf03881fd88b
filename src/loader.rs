use crate::columns::{ColumnMap, ColumnStrategy, Field};
use crate::error::Result;
use crate::types::{RainfallRecord, RawRow};
use crate::util::{format_int, measurement};
use csv::ReaderBuilder;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded: usize,
    pub missing_district: usize,
    pub duplicate_districts: usize,
    pub invalid_numbers: usize,
    pub derived_departures: usize,
    pub bad_rows: usize,
}

/// Rows read from one CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRows {
    pub rows: Vec<RawRow>,
    /// Records the CSV reader rejected; they are skipped.
    pub bad_rows: usize,
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Parse CSV text with a header row into raw rows.
///
/// Rows may be shorter or longer than the header; blank rows are skipped.
/// Cells that are not valid UTF-8 (Latin-1 exports) are decoded lossily
/// instead of failing the file, and malformed records are skipped and
/// counted. Only I/O errors abort the read.
pub fn read_rows<R: Read>(reader: R) -> Result<CsvRows> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode).collect();
    let mut out = CsvRows::default();
    for result in rdr.byte_records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Skipping malformed CSV record: {}", e);
                out.bad_rows += 1;
                continue;
            }
        };
        let row = RawRow::new(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), decode(v))),
        );
        if row.is_blank() {
            continue;
        }
        out.rows.push(row);
    }
    Ok(out)
}

pub fn read_rows_from_path(path: &Path) -> Result<CsvRows> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}

/// Turn raw rows into district records using a resolved column map.
///
/// Districts are upper-cased and trimmed; rows without one are skipped and
/// later duplicates of a district are dropped. Departure is derived from
/// actual and normal when both are present, otherwise read from the source.
pub fn build_records(rows: &[RawRow], columns: &ColumnMap) -> (Vec<RainfallRecord>, LoadReport) {
    let mut report = LoadReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let district = columns
            .value(row, Field::District)
            .map(|d| d.trim().to_uppercase())
            .unwrap_or_default();
        if district.is_empty() {
            report.missing_district += 1;
            continue;
        }
        if !seen.insert(district.clone()) {
            debug!("Duplicate district {} ignored", district);
            report.duplicate_districts += 1;
            continue;
        }

        let mut read = |field: Field| {
            let raw = columns.value(row, field);
            let v = measurement(raw);
            if v.is_none() && raw.is_some_and(|s| !s.trim().is_empty()) {
                report.invalid_numbers += 1;
            }
            v
        };
        let actual_mm = read(Field::Actual).filter(|v| *v >= 0.0);
        let normal_mm = read(Field::Normal).filter(|v| *v >= 0.0);
        let source_departure = read(Field::Departure);

        let departure_pct = match (actual_mm, normal_mm) {
            (Some(a), Some(n)) if n > 0.0 => {
                report.derived_departures += 1;
                Some((a - n) / n * 100.0)
            }
            _ => source_departure,
        };

        records.push(RainfallRecord {
            district,
            actual_mm,
            normal_mm,
            departure_pct,
        });
    }
    report.loaded = records.len();
    (records, report)
}

/// Load one period's file, resolving columns from its first row.
pub fn load_period(
    path: &Path,
    strategy: &dyn ColumnStrategy,
) -> Result<(Vec<RainfallRecord>, LoadReport)> {
    let CsvRows { rows, bad_rows } = read_rows_from_path(path)?;
    let Some(sample) = rows.first() else {
        let report = LoadReport {
            bad_rows,
            ..Default::default()
        };
        return Ok((Vec::new(), report));
    };
    let columns = strategy.resolve(sample);
    debug!("Column map for {}: {:?}", path.display(), columns);
    if !columns.guessed.is_empty() {
        warn!(
            "{}: guessed columns by position for {}",
            path.display(),
            join_fields(&columns.guessed)
        );
    }
    let unresolved = columns.unresolved();
    if !unresolved.is_empty() {
        warn!(
            "{}: no column found for {}",
            path.display(),
            join_fields(&unresolved)
        );
    }
    let (records, mut report) = build_records(&rows, &columns);
    report.bad_rows = bad_rows;
    Ok((records, report))
}

/// Like [`load_period`], but a missing or unreadable file is an empty period.
pub fn load_period_or_empty(path: &Path, strategy: &dyn ColumnStrategy) -> Vec<RainfallRecord> {
    match load_period(path, strategy) {
        Ok((records, report)) => {
            info!(
                "Loaded {} of {} rows from {} ({} departures derived from actual/normal)",
                format_int(report.loaded),
                format_int(report.total_rows),
                path.display(),
                format_int(report.derived_departures)
            );
            if report.duplicate_districts > 0 || report.missing_district > 0 || report.bad_rows > 0 {
                warn!(
                    "{}: {} rows without district, {} duplicate districts, {} malformed rows skipped",
                    path.display(),
                    format_int(report.missing_district),
                    format_int(report.duplicate_districts),
                    format_int(report.bad_rows)
                );
            }
            if report.invalid_numbers > 0 {
                warn!(
                    "{}: {} non-numeric values treated as missing",
                    path.display(),
                    format_int(report.invalid_numbers)
                );
            }
            records
        }
        Err(e) => {
            warn!("No data for {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
