use super::classification::{classify, Classification};
use super::domain::MetricInput;
use super::error::ScoringError;
use super::normalizer::normalize;
use serde::{Deserialize, Serialize};

/// Normalized view of one metric, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttainmentMetric {
    pub key: String,
    pub name: String,
    pub target: f64,
    pub actual: f64,
    pub attainment_percent: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
    pub classification: Classification,
    pub inverse: bool,
}

/// Weighted composite of a seller's metrics for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub metrics: Vec<AttainmentMetric>,
    pub total_attainment_percent: f64,
}

impl CompositeScore {
    pub fn classification(&self) -> Classification {
        classify(self.total_attainment_percent)
    }

    pub fn metric(&self, key: &str) -> Option<&AttainmentMetric> {
        self.metrics.iter().find(|metric| metric.key == key)
    }
}

/// Scores metrics in input order. Weights are used as given, never renormalized.
///
/// The first invalid metric aborts the whole composite.
pub fn score(metrics: &[MetricInput]) -> Result<CompositeScore, ScoringError> {
    let scored = metrics
        .iter()
        .map(score_metric)
        .collect::<Result<Vec<_>, _>>()?;

    let total_attainment_percent: f64 = scored
        .iter()
        .map(|metric| metric.weighted_contribution * 100.0)
        .sum();

    Ok(CompositeScore {
        metrics: scored,
        total_attainment_percent,
    })
}

fn score_metric(input: &MetricInput) -> Result<AttainmentMetric, ScoringError> {
    let attainment_percent = normalize(input.target, input.actual, input.inverse).map_err(
        |source| ScoringError::InvalidMetricValue {
            metric: input.key.clone(),
            source,
        },
    )?;

    Ok(AttainmentMetric {
        key: input.key.clone(),
        name: input.name.clone(),
        target: input.target,
        actual: input.actual,
        attainment_percent,
        weight: input.weight,
        weighted_contribution: attainment_percent / 100.0 * input.weight,
        classification: classify(attainment_percent),
        inverse: input.inverse,
    })
}
