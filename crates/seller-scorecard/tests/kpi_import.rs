use seller_scorecard::scoring::{
    Classification, KpiCsvImporter, KpiImportError, KpiPeriod, MetricTable, ScorecardEngine,
    ScoringError,
};

fn period() -> KpiPeriod {
    "2025-06".parse().expect("valid period")
}

#[test]
fn export_binds_against_standard_table() {
    let data = include_bytes!("fixtures/kpi_export.csv");
    let snapshot = KpiCsvImporter::from_reader(&data[..], period()).expect("export imports");

    assert_eq!(snapshot.readings.len(), 5);
    assert_eq!(
        snapshot.reading("hunter_migration").expect("hyphenated key normalized").actual,
        63.0
    );

    let inputs = MetricTable::standard()
        .bind(&snapshot)
        .expect("all standard metrics present");
    let keys: Vec<_> = inputs.iter().map(|input| input.key.as_str()).collect();
    assert_eq!(
        keys,
        ["new_actives", "churn", "tpv_m1", "actives_m1", "hunter_migration"]
    );
    assert!(inputs[1].inverse);
}

#[test]
fn imported_export_scores_in_warning_band() {
    let data = include_bytes!("fixtures/kpi_export.csv");
    let snapshot = KpiCsvImporter::from_reader(&data[..], period()).expect("export imports");

    let composite = ScorecardEngine::default()
        .composite(&snapshot)
        .expect("composite computes");

    assert!((composite.total_attainment_percent - 96.6).abs() < 1e-9);
    assert_eq!(composite.classification(), Classification::Warning);
    assert_eq!(
        composite
            .metric("hunter_migration")
            .expect("metric scored")
            .classification,
        Classification::Warning
    );
}

#[test]
fn unknown_metric_fails_binding() {
    let csv = "Metric,Target,Actual\nNPS,50,60\n";
    let snapshot = KpiCsvImporter::from_reader(csv.as_bytes(), period()).expect("csv parses");

    let err = MetricTable::standard()
        .bind(&snapshot)
        .expect_err("nps is not a standard metric");
    assert_eq!(err, ScoringError::UnknownMetric("nps".to_string()));
}

#[test]
fn missing_metric_fails_binding() {
    let csv = "Metric,Target,Actual\nNew Actives,12,12\n";
    let snapshot = KpiCsvImporter::from_reader(csv.as_bytes(), period()).expect("csv parses");

    let err = MetricTable::standard()
        .bind(&snapshot)
        .expect_err("other metrics missing");
    assert!(matches!(err, ScoringError::MissingMetric(_)));
}

#[test]
fn empty_metric_name_is_rejected() {
    let csv = "Metric,Target,Actual\n ,12,12\n";
    let err = KpiCsvImporter::from_reader(csv.as_bytes(), period()).expect_err("blank name");
    assert!(matches!(err, KpiImportError::EmptyMetricName { line: 2 }));
}

#[test]
fn blank_actual_in_export_is_rejected_not_zeroed() {
    let csv = "Metric,Target,Actual\nNew Actives,12,14\nTPV M1,100000,\n";
    let err = KpiCsvImporter::from_reader(csv.as_bytes(), period())
        .expect_err("missing actual rejected");
    assert!(matches!(
        err,
        KpiImportError::MissingActual { ref key, line: 3 } if key == "tpv_m1"
    ));
}
