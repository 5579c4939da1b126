use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a `BTreeMap` key for grouping, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can group and sort by CellValue --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Only numeric cells qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// `Null` and NaN both count as a missing value.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Record / Dataset
// ---------------------------------------------------------------------------

/// One row of the table: column_name → value.
/// A column absent from the map is treated as missing.
pub type Record = BTreeMap<String, CellValue>;

/// The in-memory table. A record's position is its index in `records`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names in source-file order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { columns, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Whether any column of `record` is missing or null.
    pub fn has_missing(&self, record: &Record) -> bool {
        has_missing(&self.columns, record)
    }
}

/// Whether `record` lacks a value for any of `columns`.
pub fn has_missing(columns: &[String], record: &Record) -> bool {
    columns
        .iter()
        .any(|col| record.get(col).map_or(true, CellValue::is_missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_groups_by_kind_then_value() {
        let mut values = vec![
            CellValue::String("b".into()),
            CellValue::Float(2.5),
            CellValue::Integer(10),
            CellValue::Null,
            CellValue::String("a".into()),
            CellValue::Integer(3),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(3),
                CellValue::Integer(10),
                CellValue::Float(2.5),
                CellValue::String("a".into()),
                CellValue::String("b".into()),
            ]
        );
    }

    #[test]
    fn test_nan_is_missing_and_not_numeric() {
        let nan = CellValue::Float(f64::NAN);
        assert!(nan.is_missing());
        assert_eq!(nan.as_f64(), None);
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::String("7".into()).as_f64(), None);
    }

    #[test]
    fn test_absent_column_counts_as_missing() {
        let ds = Dataset::new(vec!["a".into(), "b".into()], Vec::new());
        let mut rec = Record::new();
        rec.insert("a".into(), CellValue::Integer(1));
        assert!(ds.has_missing(&rec));
        rec.insert("b".into(), CellValue::String("x".into()));
        assert!(!ds.has_missing(&rec));
    }
}
