use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::model::{CellValue, Dataset, Record};
use crate::error::{DataError, Result};

const DATASET_FILE: &str = "session.dataset.snapshot";
const SOURCE_FILE: &str = "session.source.snapshot";

// ---------------------------------------------------------------------------
// On-disk layout
// ---------------------------------------------------------------------------

/// Cell encoding used only by the snapshot. Floats are stored as their
/// IEEE-754 bits so every value reads back exactly.
#[derive(Serialize, Deserialize)]
enum SnapshotCell {
    String(String),
    Integer(i64),
    Float(u64),
    Bool(bool),
    Null,
}

impl From<&CellValue> for SnapshotCell {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::String(s) => SnapshotCell::String(s.clone()),
            CellValue::Integer(i) => SnapshotCell::Integer(*i),
            CellValue::Float(f) => SnapshotCell::Float(f.to_bits()),
            CellValue::Bool(b) => SnapshotCell::Bool(*b),
            CellValue::Null => SnapshotCell::Null,
        }
    }
}

impl From<SnapshotCell> for CellValue {
    fn from(cell: SnapshotCell) -> Self {
        match cell {
            SnapshotCell::String(s) => CellValue::String(s),
            SnapshotCell::Integer(i) => CellValue::Integer(i),
            SnapshotCell::Float(bits) => CellValue::Float(f64::from_bits(bits)),
            SnapshotCell::Bool(b) => CellValue::Bool(b),
            SnapshotCell::Null => CellValue::Null,
        }
    }
}

/// Row-major copy of a [`Dataset`] together with the path it was loaded
/// from. The path is repeated in the source file; restore only accepts
/// the pair when both agree.
#[derive(Serialize, Deserialize)]
struct DatasetSnapshot {
    source: PathBuf,
    columns: Vec<String>,
    rows: Vec<Vec<SnapshotCell>>,
}

impl DatasetSnapshot {
    fn capture(dataset: &Dataset, source: &Path) -> Self {
        let rows = dataset
            .records
            .iter()
            .map(|record| {
                dataset
                    .columns
                    .iter()
                    .map(|col| match record.get(col) {
                        Some(v) if !v.is_missing() => SnapshotCell::from(v),
                        _ => SnapshotCell::Null,
                    })
                    .collect()
            })
            .collect();
        DatasetSnapshot {
            source: source.to_path_buf(),
            columns: dataset.columns.clone(),
            rows,
        }
    }

    fn into_dataset(self) -> Dataset {
        let columns = self.columns;
        let records = self
            .rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .cloned()
                    .zip(row.into_iter().map(CellValue::from))
                    .collect::<Record>()
            })
            .collect();
        Dataset::new(columns, records)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Persists the last loaded dataset and its source path in a fixed
/// directory so the next process start can pick up where this one left off.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    fn dataset_path(&self) -> PathBuf {
        self.dir.join(DATASET_FILE)
    }

    fn source_path(&self) -> PathBuf {
        self.dir.join(SOURCE_FILE)
    }

    /// Overwrite the snapshot. Both files are written to temporaries first
    /// and renamed into place only once both writes succeeded, so a failed
    /// snapshot leaves the previous pair untouched.
    pub fn snapshot(&self, dataset: &Dataset, source: &Path) -> Result<()> {
        let data_path = self.dataset_path();
        let src_path = self.source_path();
        let data_tmp = tmp_path(&data_path);
        let src_tmp = tmp_path(&src_path);

        let data = serde_json::to_vec(&DatasetSnapshot::capture(dataset, source))
            .map_err(|e| DataError::parse(&data_path, e))?;
        let src = serde_json::to_vec(source).map_err(|e| DataError::parse(&src_path, e))?;

        std::fs::write(&data_tmp, data).map_err(|e| DataError::io(&data_tmp, e))?;
        if let Err(e) = std::fs::write(&src_tmp, src) {
            let _ = std::fs::remove_file(&data_tmp);
            return Err(DataError::io(&src_tmp, e));
        }

        std::fs::rename(&data_tmp, &data_path).map_err(|e| DataError::io(&data_path, e))?;
        std::fs::rename(&src_tmp, &src_path).map_err(|e| DataError::io(&src_path, e))?;

        log::debug!(
            "snapshot of {} records from {} written to {}",
            dataset.len(),
            source.display(),
            self.dir.display()
        );
        Ok(())
    }

    /// Read the snapshot back. Absence of either file yields an empty
    /// dataset and no source; unreadable or mismatched files are logged
    /// and treated the same way.
    pub fn restore(&self) -> (Dataset, Option<PathBuf>) {
        match self.try_restore() {
            Ok(Some((dataset, source))) => {
                log::info!(
                    "restored {} records last loaded from {}",
                    dataset.len(),
                    source.display()
                );
                (dataset, Some(source))
            }
            Ok(None) => (Dataset::default(), None),
            Err(e) => {
                log::warn!("ignoring unreadable snapshot: {e}");
                (Dataset::default(), None)
            }
        }
    }

    fn try_restore(&self) -> Result<Option<(Dataset, PathBuf)>> {
        let data_path = self.dataset_path();
        let src_path = self.source_path();
        if !data_path.exists() || !src_path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&data_path).map_err(|e| DataError::io(&data_path, e))?;
        let snapshot: DatasetSnapshot =
            serde_json::from_slice(&data).map_err(|e| DataError::parse(&data_path, e))?;

        let src = std::fs::read(&src_path).map_err(|e| DataError::io(&src_path, e))?;
        let source: PathBuf =
            serde_json::from_slice(&src).map_err(|e| DataError::parse(&src_path, e))?;

        if snapshot.source != source {
            return Err(DataError::parse(
                &src_path,
                format!(
                    "dataset was taken from {}, source file names {}",
                    snapshot.source.display(),
                    source.display()
                ),
            ));
        }
        Ok(Some((snapshot.into_dataset(), source)))
    }
}
