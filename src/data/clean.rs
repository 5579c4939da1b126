use super::model::{has_missing, CellValue, Dataset};

/// Which records the cleaner discards on top of those with missing values.
#[derive(Debug, Clone)]
pub struct CleaningRules {
    /// Column holding the status marker. May be absent from a dataset.
    pub status_column: String,
    /// Records whose status equals this value are dropped.
    pub disqualifying_value: String,
}

/// What a [`clean`] pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_status: usize,
    pub removed_missing: usize,
    pub remaining: usize,
}

/// Clean `dataset` in place:
/// 1. drop records whose status column equals the disqualifying value
///    (skipped when the column does not exist),
/// 2. drop records with a missing value in any column.
///
/// Surviving records keep their relative order and occupy positions
/// `0..len` afterwards.
pub fn clean(dataset: &mut Dataset, rules: &CleaningRules) -> CleanReport {
    let before = dataset.len();

    if dataset.has_column(&rules.status_column) {
        let disqualifying = CellValue::String(rules.disqualifying_value.clone());
        dataset
            .records
            .retain(|rec| rec.get(&rules.status_column) != Some(&disqualifying));
    } else {
        log::debug!(
            "status column '{}' absent, skipping status filter",
            rules.status_column
        );
    }
    let after_status = dataset.len();

    let Dataset { columns, records } = &mut *dataset;
    records.retain(|rec| !has_missing(columns, rec));

    let report = CleanReport {
        removed_status: before - after_status,
        removed_missing: after_status - dataset.len(),
        remaining: dataset.len(),
    };
    log::info!(
        "cleaned dataset: {} inactive, {} incomplete removed, {} remaining",
        report.removed_status,
        report.removed_missing,
        report.remaining
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn row(status: CellValue, score: CellValue) -> Record {
        Record::from([
            ("PROGRAM STATUS".to_string(), status),
            ("SCORE".to_string(), score),
        ])
    }

    fn dataset(rows: Vec<Record>) -> Dataset {
        Dataset::new(vec!["PROGRAM STATUS".into(), "SCORE".into()], rows)
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn rules() -> CleaningRules {
        CleaningRules {
            status_column: "PROGRAM STATUS".into(),
            disqualifying_value: "INACTIVE".into(),
        }
    }

    #[test]
    fn test_removes_inactive_and_incomplete() {
        let mut ds = dataset(vec![
            row(s("ACTIVE"), CellValue::Integer(90)),
            row(s("INACTIVE"), CellValue::Integer(80)),
            row(s("ACTIVE"), CellValue::Null),
            row(s("INACTIVE"), CellValue::Null),
            row(s("ACTIVE"), CellValue::Float(f64::NAN)),
            row(s("ACTIVE"), CellValue::Integer(70)),
        ]);

        let report = clean(&mut ds, &rules());

        assert_eq!(
            report,
            CleanReport {
                removed_status: 2,
                removed_missing: 2,
                remaining: 2
            }
        );
        let scores: Vec<_> = ds.records.iter().map(|r| r["SCORE"].clone()).collect();
        assert_eq!(scores, vec![CellValue::Integer(90), CellValue::Integer(70)]);
        assert!(ds.records.iter().all(|r| !ds.has_missing(r)));
    }

    #[test]
    fn test_absent_status_column_only_drops_missing() {
        let mut ds = Dataset::new(
            vec!["VIOLATION CODE".into()],
            vec![
                Record::from([("VIOLATION CODE".to_string(), s("F044"))]),
                Record::from([("VIOLATION CODE".to_string(), CellValue::Null)]),
                Record::new(),
            ],
        );

        let report = clean(&mut ds, &rules());

        assert_eq!(report.removed_status, 0);
        assert_eq!(report.removed_missing, 2);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_status_match_is_exact() {
        let mut ds = dataset(vec![
            row(s("inactive"), CellValue::Integer(1)),
            row(s("INACTIVE "), CellValue::Integer(2)),
            row(CellValue::Integer(0), CellValue::Integer(3)),
        ]);
        let report = clean(&mut ds, &rules());
        assert_eq!(report.removed_status, 0);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_custom_rules() {
        let mut ds = Dataset::new(
            vec!["STATE".into()],
            vec![
                Record::from([("STATE".to_string(), s("CLOSED"))]),
                Record::from([("STATE".to_string(), s("OPEN"))]),
            ],
        );
        let rules = CleaningRules {
            status_column: "STATE".into(),
            disqualifying_value: "CLOSED".into(),
        };
        clean(&mut ds, &rules);
        assert_eq!(ds.records, vec![Record::from([("STATE".to_string(), s("OPEN"))])]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut ds = dataset(vec![
            row(s("INACTIVE"), CellValue::Integer(50)),
            row(s("ACTIVE"), CellValue::Integer(95)),
        ]);
        clean(&mut ds, &rules());
        let once = ds.clone();
        let report = clean(&mut ds, &rules());
        assert_eq!(ds, once);
        assert_eq!(report.removed_status + report.removed_missing, 0);
    }
}
