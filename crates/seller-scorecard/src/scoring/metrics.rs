use super::domain::{KpiPeriod, KpiSnapshot, MetricInput};
use super::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Static configuration for one scored metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub key: String,
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub inverse: bool,
    #[serde(default)]
    pub default_target: f64,
}

impl MetricDefinition {
    pub fn new(key: &str, label: &str, weight: f64, inverse: bool, default_target: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            weight,
            inverse,
            default_target,
        }
    }
}

/// Ordered metric table supplied to the scorer at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricTable {
    definitions: Vec<MetricDefinition>,
}

impl MetricTable {
    pub fn new(definitions: Vec<MetricDefinition>) -> Self {
        Self { definitions }
    }

    /// The five-metric policy used by the sales dashboard out of the box.
    pub fn standard() -> Self {
        Self::new(vec![
            MetricDefinition::new("new_actives", "New Actives", 0.30, false, 12.0),
            MetricDefinition::new("churn", "Churn", 0.20, true, 5.0),
            MetricDefinition::new("tpv_m1", "TPV M1", 0.20, false, 100_000.0),
            MetricDefinition::new("actives_m1", "Actives M1", 0.15, false, 10.0),
            MetricDefinition::new("hunter_migration", "Hunter Migration +70%", 0.15, false, 70.0),
        ])
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    pub fn get(&self, key: &str) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|definition| definition.key == key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Joins a snapshot against the table, producing scorer inputs in table order.
    ///
    /// Readings for keys the table does not know, and table keys without a
    /// reading, are rejected instead of being defaulted.
    pub fn bind(&self, snapshot: &KpiSnapshot) -> Result<Vec<MetricInput>, ScoringError> {
        if let Some(unknown) = snapshot
            .readings
            .keys()
            .find(|key| self.get(key.as_str()).is_none())
        {
            return Err(ScoringError::UnknownMetric(unknown.clone()));
        }

        self.definitions
            .iter()
            .map(|definition| {
                let reading = snapshot
                    .reading(&definition.key)
                    .ok_or_else(|| ScoringError::MissingMetric(definition.key.clone()))?;
                Ok(MetricInput {
                    key: definition.key.clone(),
                    name: definition.label.clone(),
                    target: reading.target,
                    actual: reading.actual,
                    weight: definition.weight,
                    inverse: definition.inverse,
                })
            })
            .collect()
    }

    /// Fresh record for a new period: default targets, nothing realized yet.
    pub fn default_snapshot(&self, period: KpiPeriod) -> KpiSnapshot {
        self.definitions
            .iter()
            .fold(KpiSnapshot::new(period), |snapshot, definition| {
                snapshot.with_reading(definition.key.clone(), definition.default_target, 0.0)
            })
    }
}

impl Default for MetricTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightValidationError {
    #[error("metric table is empty")]
    Empty,
    #[error("metric '{0}' is defined more than once")]
    DuplicateKey(String),
    #[error("metric '{key}' has invalid weight {weight}")]
    InvalidWeight { key: String, weight: f64 },
    #[error("weights sum to {sum:.4}, expected 1.0 (tolerance {})", WEIGHT_SUM_TOLERANCE)]
    SumOutOfTolerance { sum: f64 },
}

/// Host-side check run before a table is persisted. Returns the weight sum.
///
/// The scorer does not call this and never renormalizes weights.
pub fn validate_weights(table: &MetricTable) -> Result<f64, WeightValidationError> {
    if table.is_empty() {
        return Err(WeightValidationError::Empty);
    }

    let mut seen = HashSet::new();
    let mut sum = 0.0;
    for definition in table.definitions() {
        if !seen.insert(definition.key.as_str()) {
            return Err(WeightValidationError::DuplicateKey(definition.key.clone()));
        }
        if !definition.weight.is_finite() || definition.weight < 0.0 {
            return Err(WeightValidationError::InvalidWeight {
                key: definition.key.clone(),
                weight: definition.weight,
            });
        }
        sum += definition.weight;
    }

    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(WeightValidationError::SumOutOfTolerance { sum });
    }

    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> KpiPeriod {
        KpiPeriod::new(2025, 6).expect("valid period")
    }

    #[test]
    fn standard_table_weights_are_valid() {
        let sum = validate_weights(&MetricTable::standard()).expect("standard weights valid");
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weight_sum_outside_tolerance_is_reported() {
        let table = MetricTable::new(vec![
            MetricDefinition::new("a", "A", 0.5, false, 1.0),
            MetricDefinition::new("b", "B", 0.48, false, 1.0),
        ]);
        match validate_weights(&table) {
            Err(WeightValidationError::SumOutOfTolerance { sum }) => {
                assert!((sum - 0.98).abs() < 1e-9)
            }
            other => panic!("expected sum error, got {other:?}"),
        }
    }

    #[test]
    fn weight_sum_within_tolerance_passes() {
        let table = MetricTable::new(vec![
            MetricDefinition::new("a", "A", 0.5, false, 1.0),
            MetricDefinition::new("b", "B", 0.495, false, 1.0),
        ]);
        assert!(validate_weights(&table).is_ok());
    }

    #[test]
    fn duplicate_and_negative_weights_are_rejected() {
        let duplicate = MetricTable::new(vec![
            MetricDefinition::new("a", "A", 0.5, false, 1.0),
            MetricDefinition::new("a", "A again", 0.5, false, 1.0),
        ]);
        assert_eq!(
            validate_weights(&duplicate),
            Err(WeightValidationError::DuplicateKey("a".to_string()))
        );

        let negative = MetricTable::new(vec![
            MetricDefinition::new("a", "A", 1.5, false, 1.0),
            MetricDefinition::new("b", "B", -0.5, false, 1.0),
        ]);
        assert!(matches!(
            validate_weights(&negative),
            Err(WeightValidationError::InvalidWeight { .. })
        ));

        assert_eq!(
            validate_weights(&MetricTable::new(Vec::new())),
            Err(WeightValidationError::Empty)
        );
    }

    #[test]
    fn bind_follows_table_order() {
        let table = MetricTable::standard();
        let snapshot = table.default_snapshot(period());

        let inputs = table.bind(&snapshot).expect("snapshot binds");

        let keys: Vec<_> = inputs.iter().map(|input| input.key.as_str()).collect();
        assert_eq!(
            keys,
            ["new_actives", "churn", "tpv_m1", "actives_m1", "hunter_migration"]
        );
        assert!(inputs[1].inverse);
        assert_eq!(inputs[2].target, 100_000.0);
        assert!(inputs.iter().all(|input| input.actual == 0.0));
    }

    #[test]
    fn bind_rejects_unknown_keys() {
        let table = MetricTable::standard();
        let snapshot = table
            .default_snapshot(period())
            .with_reading("nps", 50.0, 40.0);

        assert_eq!(
            table.bind(&snapshot),
            Err(ScoringError::UnknownMetric("nps".to_string()))
        );
    }

    #[test]
    fn bind_rejects_missing_keys() {
        let table = MetricTable::standard();
        let mut snapshot = table.default_snapshot(period());
        snapshot.readings.remove("tpv_m1");

        assert_eq!(
            table.bind(&snapshot),
            Err(ScoringError::MissingMetric("tpv_m1".to_string()))
        );
    }
}
