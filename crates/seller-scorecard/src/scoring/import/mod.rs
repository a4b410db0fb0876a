mod parser;

use crate::scoring::domain::{KpiPeriod, KpiSnapshot, MetricReading};
use std::collections::btree_map::Entry;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum KpiImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateMetric { key: String, line: u64 },
    EmptyMetricName { line: u64 },
    MissingActual { key: String, line: u64 },
}

impl std::fmt::Display for KpiImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KpiImportError::Io(err) => write!(f, "failed to read KPI export: {}", err),
            KpiImportError::Csv(err) => write!(f, "invalid KPI CSV data: {}", err),
            KpiImportError::DuplicateMetric { key, line } => {
                write!(f, "metric '{}' appears more than once (line {})", key, line)
            }
            KpiImportError::EmptyMetricName { line } => {
                write!(f, "metric name is empty on line {}", line)
            }
            KpiImportError::MissingActual { key, line } => {
                write!(f, "metric '{}' has no actual value (line {})", key, line)
            }
        }
    }
}

impl std::error::Error for KpiImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KpiImportError::Io(err) => Some(err),
            KpiImportError::Csv(err) => Some(err),
            KpiImportError::DuplicateMetric { .. }
            | KpiImportError::EmptyMetricName { .. }
            | KpiImportError::MissingActual { .. } => None,
        }
    }
}

impl From<std::io::Error> for KpiImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for KpiImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a `Metric,Target,Actual` export into a KPI snapshot.
///
/// Keys are normalized but not checked against a metric table; binding does that.
pub struct KpiCsvImporter;

impl KpiCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        period: KpiPeriod,
    ) -> Result<KpiSnapshot, KpiImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, period)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        period: KpiPeriod,
    ) -> Result<KpiSnapshot, KpiImportError> {
        let mut snapshot = KpiSnapshot::new(period);

        for row in parser::parse_rows(reader)? {
            if row.key.is_empty() {
                return Err(KpiImportError::EmptyMetricName { line: row.line });
            }

            let Some(actual) = row.actual else {
                return Err(KpiImportError::MissingActual {
                    key: row.key,
                    line: row.line,
                });
            };

            match snapshot.readings.entry(row.key) {
                Entry::Occupied(entry) => {
                    return Err(KpiImportError::DuplicateMetric {
                        key: entry.key().clone(),
                        line: row.line,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(MetricReading {
                        target: row.target,
                        actual,
                    });
                }
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn period() -> KpiPeriod {
        KpiPeriod::new(2025, 7).expect("valid period")
    }

    #[test]
    fn normalize_key_collapses_whitespace_and_case() {
        assert_eq!(parser::normalize_key("\u{feff} TPV  M1 "), "tpv_m1");
        assert_eq!(parser::normalize_key("hunter-migration"), "hunter_migration");
        assert_eq!(parser::normalize_key("New Actives"), "new_actives");
    }

    #[test]
    fn rows_become_readings() {
        let csv = "Metric,Target,Actual\nNew Actives,12,14\nChurn,5,3\n";
        let snapshot = KpiCsvImporter::from_reader(Cursor::new(csv), period()).expect("imports");

        assert_eq!(snapshot.period, period());
        let new_actives = snapshot.reading("new_actives").expect("new actives present");
        assert_eq!(new_actives.target, 12.0);
        assert_eq!(new_actives.actual, 14.0);
        assert_eq!(snapshot.reading("churn").expect("churn present").actual, 3.0);
    }

    #[test]
    fn blank_actual_is_rejected() {
        let csv = "Metric,Target,Actual\nChurn,5,3\ntpv_m1,100000,\n";
        let err = KpiCsvImporter::from_reader(Cursor::new(csv), period())
            .expect_err("blank actual rejected");
        match err {
            KpiImportError::MissingActual { key, line } => {
                assert_eq!(key, "tpv_m1");
                assert_eq!(line, 3);
            }
            other => panic!("expected missing actual, got {other:?}"),
        }
    }

    #[test]
    fn explicit_zero_actual_is_kept() {
        let csv = "Metric,Target,Actual\ntpv_m1,100000,0\n";
        let snapshot = KpiCsvImporter::from_reader(Cursor::new(csv), period()).expect("imports");
        assert_eq!(snapshot.reading("tpv_m1").expect("present").actual, 0.0);
    }

    #[test]
    fn duplicate_metrics_are_rejected() {
        let csv = "Metric,Target,Actual\nChurn,5,3\nchurn,5,4\n";
        let err = KpiCsvImporter::from_reader(Cursor::new(csv), period())
            .expect_err("duplicate rejected");
        match err {
            KpiImportError::DuplicateMetric { key, line } => {
                assert_eq!(key, "churn");
                assert_eq!(line, 3);
            }
            other => panic!("expected duplicate metric, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_target_is_a_csv_error() {
        let csv = "Metric,Target,Actual\nChurn,five,3\n";
        let err = KpiCsvImporter::from_reader(Cursor::new(csv), period())
            .expect_err("invalid number rejected");
        assert!(matches!(err, KpiImportError::Csv(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let err = KpiCsvImporter::from_path("./does-not-exist.csv", period())
            .expect_err("expected io error");
        assert!(matches!(err, KpiImportError::Io(_)));
    }
}
