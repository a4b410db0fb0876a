/// Failure raised by the normalizer when an actual value cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("actual value {actual} must be a finite, non-negative number")]
pub struct InvalidMetricValue {
    pub actual: f64,
}

/// Error taxonomy of the scoring engine and its input boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("metric '{metric}' rejected: {source}")]
    InvalidMetricValue {
        metric: String,
        #[source]
        source: InvalidMetricValue,
    },
    #[error("bonus bracket '{bracket}' rejected: {reason}")]
    InvalidBonusInput { bracket: String, reason: String },
    #[error("base salary must be a positive amount (got {0})")]
    InvalidSalary(f64),
    #[error("metric '{0}' is not defined in the metric table")]
    UnknownMetric(String),
    #[error("metric '{0}' is missing from the KPI snapshot")]
    MissingMetric(String),
    #[error("career level '{0}' is not part of the career ladder")]
    UnknownCareerLevel(String),
    #[error("multiplier tier rejected: {0}")]
    InvalidMultiplierTier(String),
    #[error("competency '{name}' score {score} is outside 1..=5")]
    InvalidCompetencyScore { name: &'static str, score: u8 },
    #[error("DRE {field} must be a finite, non-negative amount (got {value})")]
    InvalidDreInput { field: &'static str, value: f64 },
    #[error("badge '{0}' is not part of the badge catalog")]
    UnknownBadge(String),
}
