use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use super::model::{Dataset, Observation, Series, Station};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every station listed in `config`, in configuration order.
pub fn load_dataset(config: &Config) -> Result<Dataset> {
    let mut stations = Vec::with_capacity(config.stations.len());
    for name in &config.stations {
        let path = config.source_path(name);
        let station = load_file(&path, name, &config.timestamp_column)
            .with_context(|| format!("loading station '{name}' from {}", path.display()))?;
        log::info!(
            "loaded station '{}': {} rows, columns {:?}",
            station.name,
            station.row_count(),
            station.column_names()
        );
        stations.push(station);
    }
    Ok(Dataset::from_stations(stations))
}

/// Load one station table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row; `timestamp_column` plus one numeric column per pollutant
/// * `.json` – `[{ "year_month": "2013-03", "PM2.5": 79.1, ... }, ...]`
///
/// Rows come back sorted by timestamp with duplicates removed (last row wins).
pub fn load_file(path: &Path, station: &str, timestamp_column: &str) -> Result<Station> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv(path, timestamp_column)?,
        "json" => read_json(path, timestamp_column)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(table.into_station(station))
}

// ---------------------------------------------------------------------------
// Row table shared by both formats
// ---------------------------------------------------------------------------

/// Row-oriented intermediate form: `rows[i].1[j]` is the value of `columns[j]`.
struct RawTable {
    columns: Vec<String>,
    rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
}

impl RawTable {
    /// Sort, drop duplicate timestamps, and transpose into one series per column.
    fn into_station(mut self, name: &str) -> Station {
        // Stable sort keeps file order among equal timestamps, so the last
        // duplicate in the file is the last one in its run.
        self.rows.sort_by_key(|(ts, _)| *ts);

        let mut deduped: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            if let Some(last) = deduped.last_mut() {
                if last.0 == row.0 {
                    log::warn!("{name}: duplicate timestamp {}, keeping the later row", row.0);
                    *last = row;
                    continue;
                }
            }
            deduped.push(row);
        }

        let series = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, col)| {
                let points = deduped
                    .iter()
                    .map(|(ts, values)| Observation::new(*ts, values.get(j).copied().flatten()))
                    .collect();
                Series::new(col.clone(), points)
            })
            .collect();

        Station::new(name, series)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per period.
/// The timestamp column is parsed as a date; every other column is numeric
/// and may contain empty / `NaN` cells for missing measurements.
fn read_csv(path: &Path, timestamp_column: &str) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let ts_idx = headers
        .iter()
        .position(|h| h == timestamp_column)
        .with_context(|| format!("CSV missing '{timestamp_column}' column"))?;

    let value_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != ts_idx)
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let fallback_line = row_no as u64 + 2;
        let record = result.with_context(|| format!("CSV line {fallback_line}"))?;
        let line = record.position().map_or(fallback_line, |p| p.line());
        let at = format!("CSV line {line}");

        let ts_text = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(ts_text)
            .with_context(|| format!("{at}: '{ts_text}' is not a valid timestamp"))?;

        let values = value_cols
            .iter()
            .map(|(idx, col)| parse_cell(record.get(*idx).unwrap_or(""), &at, col))
            .collect::<Result<Vec<_>>>()?;

        rows.push((timestamp, values));
    }

    Ok(RawTable {
        columns: value_cols.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year_month": "2013-03", "PM2.5": 79.1, "CO": 1400.0 },
///   ...
/// ]
/// ```
///
/// Timestamps may also be epoch milliseconds, which is how pandas writes
/// datetime columns by default.
fn read_json(path: &Path, timestamp_column: &str) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if key != timestamp_column && !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let timestamp = obj
            .get(timestamp_column)
            .and_then(json_to_timestamp)
            .with_context(|| format!("Row {i}: missing or invalid '{timestamp_column}'"))?;

        let values = columns
            .iter()
            .map(|col| json_to_value(obj.get(col), &format!("Row {i}"), col))
            .collect::<Result<Vec<_>>>()?;

        rows.push((timestamp, values));
    }

    Ok(RawTable { columns, rows })
}

fn json_to_timestamp(val: &JsonValue) -> Option<NaiveDate> {
    match val {
        JsonValue::String(s) => parse_timestamp(s),
        JsonValue::Number(n) => {
            DateTime::<Utc>::from_timestamp_millis(n.as_i64()?).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

fn json_to_value(val: Option<&JsonValue>, at: &str, col: &str) -> Result<Option<f64>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64().filter(|v| v.is_finite())),
        Some(JsonValue::String(s)) => parse_cell(s, at, col),
        Some(other) => bail!("{at}, {col}: {other} is not a number"),
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a timestamp cell. Accepts `YYYY-MM` (first of the month),
/// `YYYY-MM-DD`, and date-times with a space or `T` separator.
pub fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

/// Parse a numeric cell; empty and NaN-like markers are missing values.
/// `at` locates the cell in error messages.
fn parse_cell(s: &str, at: &str, col: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || ["nan", "na", "null"].contains(&s.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .with_context(|| format!("{at}, {col}: '{s}' is not a number"))?;
    Ok(Some(v).filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ym(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2013-03"), Some(ym(2013, 3)));
        assert_eq!(parse_timestamp("2013-03-01"), Some(ym(2013, 3)));
        assert_eq!(parse_timestamp("2013-03-01 00:00:00"), Some(ym(2013, 3)));
        assert_eq!(parse_timestamp("2013-03-01T12:30:00"), Some(ym(2013, 3)));
        assert_eq!(parse_timestamp("March 2013"), None);
    }

    #[test]
    fn test_parse_cell_missing_markers() {
        assert_eq!(parse_cell("", "Row 0", "CO").unwrap(), None);
        assert_eq!(parse_cell("NaN", "Row 0", "CO").unwrap(), None);
        assert_eq!(parse_cell(" NA ", "Row 0", "CO").unwrap(), None);
        assert_eq!(parse_cell("12.5", "Row 0", "CO").unwrap(), Some(12.5));
        assert!(parse_cell("high", "Row 0", "CO").is_err());
    }

    #[test]
    fn test_csv_sorted_and_deduplicated() {
        let file = write_temp(
            ".csv",
            "year_month,PM2.5,CO\n\
             2013-05,30,1000\n\
             2013-03,10,\n\
             2013-04,20,900\n\
             2013-03,11,800\n",
        );
        let station = load_file(file.path(), "Dongsi", "year_month").unwrap();

        assert_eq!(station.name, "Dongsi");
        assert_eq!(station.column_names(), vec!["PM2.5", "CO"]);

        let pm = station.series("PM2.5").unwrap();
        let stamps: Vec<_> = pm.points.iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![ym(2013, 3), ym(2013, 4), ym(2013, 5)]);
        // Later duplicate row wins.
        assert_eq!(pm.points[0].value, Some(11.0));
        assert_eq!(station.series("CO").unwrap().points[0].value, Some(800.0));
    }

    #[test]
    fn test_csv_missing_timestamp_column() {
        let file = write_temp(".csv", "month,PM10\n2013-03,4\n");
        let err = load_file(file.path(), "Gucheng", "year_month").unwrap_err();
        assert!(err.to_string().contains("year_month"));
    }

    #[test]
    fn test_csv_bad_value_reports_file_line() {
        let file = write_temp(".csv", "year_month,PM10\n2013-03,4\n2013-04,lots\n");
        let err = load_file(file.path(), "Gucheng", "year_month").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("CSV line 3, PM10"), "{msg}");
    }

    #[test]
    fn test_csv_bad_timestamp_reports_file_line() {
        let file = write_temp(".csv", "year_month,PM10\nsoon,4\n");
        let err = load_file(file.path(), "Gucheng", "year_month").unwrap_err();
        assert!(format!("{err:#}").contains("CSV line 2"));
    }

    #[test]
    fn test_json_records_with_epoch_millis() {
        // 1362096000000 ms = 2013-03-01T00:00:00Z
        let file = write_temp(
            ".json",
            r#"[
                {"year_month": 1362096000000, "SO2": 4.0},
                {"year_month": "2013-02", "SO2": null}
            ]"#,
        );
        let station = load_file(file.path(), "Wanliu", "year_month").unwrap();
        let so2 = station.series("SO2").unwrap();
        assert_eq!(so2.points[0], Observation::new(ym(2013, 2), None));
        assert_eq!(so2.points[1], Observation::new(ym(2013, 3), Some(4.0)));
    }

    #[test]
    fn test_json_columns_follow_file_order() {
        let file = write_temp(
            ".json",
            r#"[
                {"year_month": "2013-03", "SO2": 4.0, "CO": 800.0, "NO2": 30.0},
                {"year_month": "2013-04", "SO2": 8.0, "CO": 1600.0, "NO2": 60.0}
            ]"#,
        );
        let station = load_file(file.path(), "Wanliu", "year_month").unwrap();
        assert_eq!(station.column_names(), vec!["SO2", "CO", "NO2"]);

        // Same table as CSV gives the same columns and the same tie-break.
        let csv = write_temp(
            ".csv",
            "year_month,SO2,CO,NO2\n2013-03,4,800,30\n2013-04,8,1600,60\n",
        );
        let from_csv = load_file(csv.path(), "Wanliu", "year_month").unwrap();
        assert_eq!(from_csv.column_names(), station.column_names());

        let overview = crate::analysis::report::StationReport::compute(&station)
            .monthly_overview
            .unwrap();
        assert_eq!(overview.max_at, "SO2");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".parquet", "");
        let err = load_file(file.path(), "Tiantan", "year_month").unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
