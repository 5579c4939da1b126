use std::collections::BTreeMap;

use super::model::{CellValue, Dataset};
use crate::error::{DataError, Result};

/// Label used for the single row of [`overall_stats`].
pub const OVERALL_LABEL: &str = "Overall";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Mean / median / mode of one numeric column, for the whole table or for
/// one group. `None` when there are no numeric values to summarise.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub label: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
}

/// `(category, count)` pairs in ascending category order.
pub type FrequencyTable = Vec<(CellValue, usize)>;

// ---------------------------------------------------------------------------
// Public operations
// ---------------------------------------------------------------------------

/// Overall statistics of `numeric`. The mean is rounded to a whole number.
pub fn overall_stats(dataset: &Dataset, numeric: &str) -> Result<StatisticsRow> {
    require_column(dataset, numeric)?;
    let values = dataset
        .records
        .iter()
        .filter_map(|rec| rec.get(numeric).and_then(CellValue::as_f64))
        .collect();
    Ok(summarise(OVERALL_LABEL.to_string(), values, 0))
}

/// One row per distinct value of `group`, ascending by group key. Means are
/// rounded to two decimals. Records with a missing group key are ignored.
pub fn grouped_stats(
    dataset: &Dataset,
    numeric: &str,
    group: &str,
) -> Result<Vec<StatisticsRow>> {
    require_column(dataset, numeric)?;
    require_column(dataset, group)?;

    let mut groups: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();
    for rec in &dataset.records {
        let Some(key) = rec.get(group).filter(|k| !k.is_missing()) else {
            continue;
        };
        let values = groups.entry(key).or_default();
        if let Some(v) = rec.get(numeric).and_then(CellValue::as_f64) {
            values.push(v);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, values)| summarise(key.to_string(), values, 2))
        .collect())
}

/// Count of each distinct value of `column`, ascending by value. Missing
/// values are not counted.
pub fn frequency_counts(dataset: &Dataset, column: &str) -> Result<FrequencyTable> {
    require_column(dataset, column)?;

    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for value in dataset.records.iter().filter_map(|rec| rec.get(column)) {
        if !value.is_missing() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    Ok(counts.into_iter().map(|(v, n)| (v.clone(), n)).collect())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_column(dataset: &Dataset, column: &str) -> Result<()> {
    if dataset.has_column(column) {
        Ok(())
    } else {
        Err(DataError::ColumnNotFound(column.to_string()))
    }
}

fn summarise(label: String, mut values: Vec<f64>, mean_decimals: i32) -> StatisticsRow {
    values.sort_by(f64::total_cmp);
    StatisticsRow {
        label,
        mean: mean(&values).map(|m| round_half_even(m, mean_decimals)),
        median: median(&values),
        mode: mode(&values),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `sorted` must be ascending.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Most frequent value of an ascending slice. Ties go to the smallest value.
fn mode(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|&&v| v == value).count();
        if best.map_or(true, |(_, n)| run > n) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(v, _)| v)
}

/// Round half to even at `decimals` places, as NumPy's `round` does.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
