// Utility helpers for parsing and basic statistics.
//
// All the "dirty" CSV number/date handling lives here so the rest of the
// code can assume typed values. Missing numbers surface as NaN or `None`,
// never as zero.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Coerce a raw CSV cell into a number.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`NA`, `nil`, `inf`).
/// - Strips thousands separators like `","` and a single trailing `%`.
/// - Returns `NaN` for anything absent or unparseable.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    let Some(s) = raw else {
        return f64::NAN;
    };
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_alphabetic()) {
        return f64::NAN;
    }
    let s = s.replace(',', "");
    let s = s.strip_suffix('%').unwrap_or(s.as_str()).trim_end();
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// `Option` view of [`coerce_number`]: `None` whenever the value is not a
/// finite number.
pub fn measurement(raw: Option<&str>) -> Option<f64> {
    let v = coerce_number(raw);
    v.is_finite().then_some(v)
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // IMD calendars write dates as `DD.MM.YYYY`.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d.%m.%Y").ok()
}

pub fn days_diff(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn median(mut v: Vec<f64>) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale thousands separators, e.g. `1,234,567.89`.
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond i64 range, print the digits without separators.
    let mut res = match int_part.parse::<i64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // Avoid rendering `-0.0` for tiny negatives.
    let is_zero = s.chars().all(|c| c == '0' || c == '.');
    if n.is_sign_negative() && !is_zero {
        format!("-{}", res)
    } else {
        res
    }
}

/// Like [`format_number`] but with an explicit `+` for positive values.
pub fn format_signed(n: f64, decimals: usize) -> String {
    let s = format_number(n, decimals);
    if n > 0.0 && !s.chars().all(|c| c == '0' || c == '.') {
        format!("+{}", s)
    } else {
        s
    }
}

pub fn format_optional(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
