use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use super::model::{CellValue, Dataset, Record};
use crate::error::{DataError, Result};

/// Cell texts read as missing, matching Pandas' default `na_values`.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DataError::NotFound(path.to_path_buf()))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Rows with a different field count than the header are rejected.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    ensure_exists(path)?;
    let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let raw_headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::parse(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if raw_headers.is_empty() {
        return Err(DataError::parse(path, "no columns to parse"));
    }
    let columns = dedupe_columns(raw_headers);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        rows.push(result.map_err(|e| DataError::parse(path, format!("row {row_no}: {e}")))?);
    }

    // One type per column, decided from every cell of that column.
    let mut records = vec![Record::new(); rows.len()];
    for (idx, col) in columns.iter().enumerate() {
        let texts: Vec<&str> = rows.iter().map(|row| row.get(idx).unwrap_or("")).collect();
        for (record, cell) in records.iter_mut().zip(infer_column(&texts)) {
            record.insert(col.clone(), cell);
        }
    }

    log::debug!("parsed {} CSV rows from {}", records.len(), path.display());
    Ok(Dataset::new(columns, records))
}

/// Repeated header names get a `.1`, `.2`, ... suffix.
fn dedupe_columns(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .into_iter()
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let name = if *count == 0 {
                h
            } else {
                format!("{h}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Narrowest kind that every non-missing cell of a column fits.
fn column_kind(texts: &[&str]) -> ColumnKind {
    let present = || texts.iter().filter(|t| !NA_TOKENS.contains(*t));
    if present().all(|t| t.trim().parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present().all(|t| parse_finite(t).is_some()) {
        ColumnKind::Float
    } else if present().all(|t| parse_bool(t).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

/// Convert a column of raw CSV cells, Pandas style: NA tokens become
/// `Null`, and the rest share one type. A column with any non-numeric
/// cell is kept as text throughout.
fn infer_column(texts: &[&str]) -> Vec<CellValue> {
    let kind = column_kind(texts);
    texts
        .iter()
        .map(|&t| {
            if NA_TOKENS.contains(&t) {
                return CellValue::Null;
            }
            let parsed = match kind {
                ColumnKind::Integer => t.trim().parse().ok().map(CellValue::Integer),
                ColumnKind::Float => parse_finite(t).map(CellValue::Float),
                ColumnKind::Bool => parse_bool(t).map(CellValue::Bool),
                ColumnKind::Text => None,
            };
            parsed.unwrap_or_else(|| CellValue::String(t.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted JSON layouts:
///
/// ```json
/// [ { "SCORE": 92, "FACILITY CITY": "LA" }, ... ]
/// { "SCORE": { "0": 92, "1": 88 }, "FACILITY CITY": { "0": "LA", "1": "BURBANK" } }
/// { "SCORE": [92, 88], "FACILITY CITY": ["LA", "BURBANK"] }
/// ```
///
/// The second form is what Pandas' `DataFrame.to_json()` writes by default.
pub fn load_json(path: &Path) -> Result<Dataset> {
    ensure_exists(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DataError::parse(path, e))?;

    let dataset = match root {
        JsonValue::Array(rows) => records_from_rows(path, &rows)?,
        JsonValue::Object(cols) => records_from_columns(path, &cols)?,
        _ => {
            return Err(DataError::parse(
                path,
                "expected a top-level JSON array or object",
            ))
        }
    };
    log::debug!("parsed {} JSON records from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn records_from_rows(path: &Path, rows: &[JsonValue]) -> Result<Dataset> {
    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::parse(path, format!("row {i} is not a JSON object")))?;

        let mut record = Record::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            record.insert(key.clone(), json_to_cell(val));
        }
        records.push(record);
    }

    fill_absent(&columns, &mut records);
    promote_mixed_numeric(&columns, &mut records);
    Ok(Dataset::new(columns, records))
}

fn records_from_columns(path: &Path, cols: &Map<String, JsonValue>) -> Result<Dataset> {
    let columns: Vec<String> = cols.keys().cloned().collect();

    // Row labels in first-seen order, numeric order when all labels are integers.
    let mut labels: Vec<String> = Vec::new();
    let mut by_label: BTreeMap<String, Record> = BTreeMap::new();

    for (col, values) in cols {
        match values {
            JsonValue::Object(cells) => {
                for (label, val) in cells {
                    if !by_label.contains_key(label) {
                        labels.push(label.clone());
                    }
                    by_label
                        .entry(label.clone())
                        .or_default()
                        .insert(col.clone(), json_to_cell(val));
                }
            }
            JsonValue::Array(cells) => {
                for (i, val) in cells.iter().enumerate() {
                    let label = i.to_string();
                    if !by_label.contains_key(&label) {
                        labels.push(label.clone());
                    }
                    by_label
                        .entry(label)
                        .or_default()
                        .insert(col.clone(), json_to_cell(val));
                }
            }
            _ => {
                return Err(DataError::parse(
                    path,
                    format!("column '{col}' is not an object or array"),
                ))
            }
        }
    }

    let numeric: Option<Vec<i64>> = labels.iter().map(|l| l.parse::<i64>().ok()).collect();
    if let Some(keys) = numeric {
        let mut paired: Vec<(i64, String)> = keys.into_iter().zip(labels).collect();
        paired.sort_by_key(|(k, _)| *k);
        labels = paired.into_iter().map(|(_, l)| l).collect();
    }

    let mut records: Vec<Record> = labels
        .iter()
        .filter_map(|l| by_label.remove(l))
        .collect();
    fill_absent(&columns, &mut records);
    promote_mixed_numeric(&columns, &mut records);
    Ok(Dataset::new(columns, records))
}

/// A column holding only integers and floats becomes all floats, so equal
/// numbers compare equal however they were written.
fn promote_mixed_numeric(columns: &[String], records: &mut [Record]) {
    for col in columns {
        let cells = || records.iter().filter_map(|r| r.get(col));
        let numeric_only = cells().all(|v| {
            matches!(v, CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null)
        });
        let has_float = cells().any(|v| matches!(v, CellValue::Float(_)));
        if !(numeric_only && has_float) {
            continue;
        }
        for record in records.iter_mut() {
            if let Some(cell) = record.get_mut(col) {
                if let CellValue::Integer(i) = *cell {
                    *cell = CellValue::Float(i as f64);
                }
            }
        }
    }
}

/// Give every record an explicit `Null` for columns it does not carry.
fn fill_absent(columns: &[String], records: &mut [Record]) {
    for record in records {
        for col in columns {
            record.entry(col.clone()).or_insert(CellValue::Null);
        }
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

fn cell_to_json(val: &CellValue) -> JsonValue {
    match val {
        CellValue::String(s) => JsonValue::String(s.clone()),
        CellValue::Integer(i) => JsonValue::from(*i),
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        CellValue::Bool(b) => JsonValue::Bool(*b),
        CellValue::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

/// Append `.json` unless the path already ends with it.
pub fn with_json_suffix(path: &Path) -> PathBuf {
    let ends_with_json = path
        .to_str()
        .map(|s| s.ends_with(".json"))
        .unwrap_or(false);
    if ends_with_json {
        path.to_path_buf()
    } else {
        let mut os = path.as_os_str().to_owned();
        os.push(".json");
        PathBuf::from(os)
    }
}

/// Write the dataset as a records-oriented JSON array.  Returns the path
/// actually written, which may carry an appended `.json`.
pub fn save_json(dataset: &Dataset, path: &Path) -> Result<PathBuf> {
    let target = with_json_suffix(path);

    let rows: Vec<JsonValue> = dataset
        .records
        .iter()
        .map(|record| {
            let obj: Map<String, JsonValue> = dataset
                .columns
                .iter()
                .map(|col| {
                    let val = record.get(col).map_or(JsonValue::Null, cell_to_json);
                    (col.clone(), val)
                })
                .collect();
            JsonValue::Object(obj)
        })
        .collect();

    let text = serde_json::to_string_pretty(&rows).map_err(|e| DataError::parse(&target, e))?;
    std::fs::write(&target, text).map_err(|e| DataError::io(&target, e))?;
    log::info!("exported {} records to {}", dataset.len(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).expect("create fixture");
        f.write_all(contents.as_bytes()).expect("write fixture");
        path
    }

    #[test]
    fn test_load_csv_infers_types_and_na() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "Inspections.csv",
            "FACILITY CITY,SCORE,PROGRAM STATUS\nLA,92,ACTIVE\nBURBANK,88.5,NA\nLA,,INACTIVE\n",
        );

        let ds = load_csv(&path).expect("csv loads");
        assert_eq!(ds.columns, vec!["FACILITY CITY", "SCORE", "PROGRAM STATUS"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0]["SCORE"], CellValue::Float(92.0));
        assert_eq!(ds.records[1]["SCORE"], CellValue::Float(88.5));
        assert_eq!(ds.records[1]["PROGRAM STATUS"], CellValue::Null);
        assert_eq!(ds.records[2]["SCORE"], CellValue::Null);
        assert_eq!(ds.records[2]["FACILITY CITY"], CellValue::String("LA".into()));
    }

    #[test]
    fn test_load_csv_one_type_per_column() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "mixed.csv",
            "CODE,SERIAL,OPEN\n10,7,true\n2.5,F044,FALSE\n1,12,\n",
        );

        let ds = load_csv(&path).expect("csv loads");
        let column = |name: &str| -> Vec<CellValue> {
            ds.records.iter().map(|r| r[name].clone()).collect()
        };
        assert_eq!(
            column("CODE"),
            vec![
                CellValue::Float(10.0),
                CellValue::Float(2.5),
                CellValue::Float(1.0)
            ]
        );
        assert_eq!(
            column("SERIAL"),
            vec![
                CellValue::String("7".into()),
                CellValue::String("F044".into()),
                CellValue::String("12".into())
            ]
        );
        assert_eq!(
            column("OPEN"),
            vec![CellValue::Bool(true), CellValue::Bool(false), CellValue::Null]
        );
    }

    #[test]
    fn test_load_csv_non_finite_numbers_stay_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "inf.csv",
            "FACILITY CITY,SCORE\nINF,88\ninf,1e400\nInfinity,90\n",
        );

        let ds = load_csv(&path).expect("csv loads");
        assert_eq!(ds.records[0]["FACILITY CITY"], CellValue::String("INF".into()));
        assert_eq!(ds.records[2]["FACILITY CITY"], CellValue::String("Infinity".into()));
        assert_eq!(ds.records[1]["SCORE"], CellValue::String("1e400".into()));
        assert_eq!(ds.records[0]["SCORE"], CellValue::String("88".into()));
    }

    #[test]
    fn test_load_csv_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_load_csv_ragged_row_is_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(dir.path(), "bad.csv", "a,b\n1,2\n3,4,5\n");
        assert!(matches!(load_csv(&path), Err(DataError::Parse { .. })));
    }

    #[test]
    fn test_load_csv_empty_file_is_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(dir.path(), "empty.csv", "");
        assert!(matches!(load_csv(&path), Err(DataError::Parse { .. })));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let cols = dedupe_columns(vec!["A".into(), "B".into(), "A".into(), "A".into()]);
        assert_eq!(cols, vec!["A", "B", "A.1", "A.2"]);
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "data.json",
            r#"[{"SCORE": 90, "CITY": "LA"}, {"SCORE": 80.0}]"#,
        );
        let ds = load_json(&path).expect("json loads");
        assert_eq!(ds.columns, vec!["SCORE", "CITY"]);
        assert_eq!(ds.records[1]["SCORE"], CellValue::Float(80.0));
        assert_eq!(ds.records[1]["CITY"], CellValue::Null);
    }

    #[test]
    fn test_load_json_mixed_numeric_column_becomes_float() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "codes.json",
            r#"[{"CODE": 1, "ID": 3}, {"CODE": 1.0, "ID": 4}, {"CODE": null, "ID": 5}]"#,
        );
        let ds = load_json(&path).expect("json loads");
        assert_eq!(ds.records[0]["CODE"], CellValue::Float(1.0));
        assert_eq!(ds.records[0]["CODE"], ds.records[1]["CODE"]);
        assert_eq!(ds.records[2]["CODE"], CellValue::Null);
        assert_eq!(ds.records[1]["ID"], CellValue::Integer(4));
    }

    #[test]
    fn test_load_json_column_oriented_orders_labels_numerically() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            dir.path(),
            "pandas.json",
            r#"{"SCORE": {"10": 70, "2": 95}, "CITY": {"2": "LA", "10": "BURBANK"}}"#,
        );
        let ds = load_json(&path).expect("json loads");
        assert_eq!(ds.columns, vec!["SCORE", "CITY"]);
        assert_eq!(ds.records[0]["SCORE"], CellValue::Integer(95));
        assert_eq!(ds.records[1]["CITY"], CellValue::String("BURBANK".into()));
    }

    #[test]
    fn test_load_json_malformed_is_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(dir.path(), "broken.json", "[{\"a\": 1,");
        assert!(matches!(load_json(&path), Err(DataError::Parse { .. })));

        let scalar = write_file(dir.path(), "scalar.json", "42");
        assert!(matches!(load_json(&scalar), Err(DataError::Parse { .. })));
    }

    #[test]
    fn test_load_json_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_json(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_save_json_appends_suffix_and_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let src = write_file(
            dir.path(),
            "in.csv",
            "FACILITY CITY,SCORE,GRADE\nLA,92,A\nPASADENA,71.5,C\nLA,88,\n",
        );
        let ds = load_csv(&src).expect("csv loads");

        let written = save_json(&ds, &dir.path().join("export")).expect("saves");
        assert_eq!(written, dir.path().join("export.json"));

        let back = load_json(&written).expect("reloads");
        assert_eq!(back, ds);
    }

    #[test]
    fn test_with_json_suffix_keeps_existing_suffix() {
        assert_eq!(
            with_json_suffix(Path::new("out.json")),
            PathBuf::from("out.json")
        );
        assert_eq!(
            with_json_suffix(Path::new("out.csv")),
            PathBuf::from("out.csv.json")
        );
    }
}
