//! KPI attainment scoring, bonus brackets and career progression for sellers.

pub mod bonus;
pub mod career;
pub mod classification;
pub mod competency;
pub mod composite;
pub mod domain;
pub mod dre;
pub mod error;
pub mod forecast;
pub mod gamification;
pub mod import;
pub mod metrics;
pub mod normalizer;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scorecard;
pub mod service;

pub use bonus::{
    compute_bonus, BonusBracket, BonusResult, BracketSubtotal, MultiplierSchedule, MultiplierTier,
};
pub use career::{evaluate, CareerLadder, CareerLevel, CareerProgression, LevelThreshold, ProgressionStatus};
pub use classification::{classify, Classification};
pub use competency::CompetencyScores;
pub use composite::{score, AttainmentMetric, CompositeScore};
pub use domain::{KpiPeriod, KpiSnapshot, MetricInput, MetricReading, SellerId};
pub use dre::{DreInput, DreStatement};
pub use error::ScoringError;
pub use forecast::{ForecastFunnel, FunnelConversion};
pub use gamification::{points_leaderboard, Badge, BadgeCatalog, BadgeTally, PointsEntry};
pub use import::{KpiCsvImporter, KpiImportError};
pub use metrics::{validate_weights, MetricDefinition, MetricTable, WeightValidationError};
pub use normalizer::normalize;
pub use ranking::{rank_sellers, Ranking, RankingEntry};
pub use repository::{RepositoryError, SnapshotRepository};
pub use router::scoring_router;
pub use scorecard::{CareerPosition, Scorecard, ScorecardEngine, SellerSnapshot, DEFAULT_BASE_SALARY};
pub use service::{ScorecardService, ScorecardServiceError};
