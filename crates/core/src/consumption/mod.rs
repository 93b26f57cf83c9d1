//! Uploaded consumption data: CSV parsing and storage port

pub mod ports;

pub use ports::ConsumptionRepository;

use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sunquote_domain::types::ConsumptionPoint;
use sunquote_domain::{Result, SunquoteError};

/// Maximum rows accepted in one upload. A year of 5-minute intervals is
/// ~105k rows; anything past this is almost certainly the wrong file.
pub const MAX_UPLOAD_ROWS: usize = 200_000;

/// Parse an uploaded consumption CSV into interval readings.
///
/// Expects a header row naming a `timestamp` column and a `kw` column
/// (case-insensitive; `power_kw` and `demand_kw` are accepted aliases).
/// Timestamps may be RFC 3339 or naive `YYYY-MM-DD HH:MM[:SS]`, which is
/// taken as UTC. Malformed rows fail the whole upload with the offending
/// line number.
pub fn parse_csv(data: &[u8]) -> Result<Vec<ConsumptionPoint>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(Cursor::new(data));

    let headers = reader
        .headers()
        .map_err(|e| SunquoteError::InvalidInput(format!("unreadable CSV header: {e}")))?
        .clone();

    let ts_idx = find_column(&headers, &["timestamp", "time", "datetime", "date"])
        .ok_or_else(|| SunquoteError::InvalidInput("CSV is missing a timestamp column".into()))?;
    let kw_idx = find_column(&headers, &["kw", "power_kw", "demand_kw", "load_kw"])
        .ok_or_else(|| SunquoteError::InvalidInput("CSV is missing a kw column".into()))?;

    let mut points = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Header occupies line 1.
        let line = index + 2;
        let record = record
            .map_err(|e| SunquoteError::InvalidInput(format!("line {line}: unreadable row: {e}")))?;

        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let raw_kw = record.get(kw_idx).unwrap_or_default();

        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
            SunquoteError::InvalidInput(format!("line {line}: invalid timestamp {raw_ts:?}"))
        })?;
        let kw: f64 = raw_kw.parse().map_err(|_| {
            SunquoteError::InvalidInput(format!("line {line}: invalid kw value {raw_kw:?}"))
        })?;
        if !kw.is_finite() || kw < 0.0 {
            return Err(SunquoteError::InvalidInput(format!(
                "line {line}: kw must be a non-negative number, got {raw_kw}"
            )));
        }

        points.push(ConsumptionPoint { timestamp, kw });
        if points.len() > MAX_UPLOAD_ROWS {
            return Err(SunquoteError::InvalidInput(format!(
                "upload exceeds {MAX_UPLOAD_ROWS} rows"
            )));
        }
    }

    if points.is_empty() {
        return Err(SunquoteError::InvalidInput(
            "CSV contains no data rows".into(),
        ));
    }
    Ok(points)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}
