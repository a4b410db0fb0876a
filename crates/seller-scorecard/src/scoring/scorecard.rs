use super::bonus::{compute_bonus, BonusBracket, BonusResult, MultiplierSchedule};
use super::career::{CareerLadder, CareerProgression};
use super::classification::Classification;
use super::competency::CompetencyScores;
use super::composite::{score, CompositeScore};
use super::domain::{KpiPeriod, KpiSnapshot, SellerId};
use super::dre::{DreInput, DreStatement};
use super::error::ScoringError;
use super::forecast::{ForecastFunnel, FunnelConversion};
use super::gamification::{BadgeCatalog, BadgeTally};
use super::metrics::MetricTable;
use super::ranking::{rank_sellers, Ranking};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_SALARY: f64 = 1_570.0;

/// Where a seller stands on the career ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPosition {
    pub current_level: String,
    pub cumulative_volume: f64,
    pub tenure_months: f64,
}

/// Everything the engine reads about one seller for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSnapshot {
    /// Taken from the request path when recorded over HTTP.
    #[serde(default)]
    pub seller_id: SellerId,
    pub name: String,
    pub kpis: KpiSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<f64>,
    #[serde(default)]
    pub brackets: Vec<BonusBracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career: Option<CareerPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastFunnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competencies: Option<CompetencyScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dre: Option<DreInput>,
    /// Badge ids awarded to the seller; every occurrence scores.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
}

impl SellerSnapshot {
    pub fn new(seller_id: impl Into<String>, name: impl Into<String>, kpis: KpiSnapshot) -> Self {
        Self {
            seller_id: SellerId(seller_id.into()),
            name: name.into(),
            kpis,
            base_salary: None,
            brackets: Vec::new(),
            career: None,
            forecast: None,
            competencies: None,
            dre: None,
            badges: Vec::new(),
        }
    }

    pub fn period(&self) -> KpiPeriod {
        self.kpis.period
    }
}

/// Full evaluation of one seller for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub seller_id: SellerId,
    pub name: String,
    pub period: KpiPeriod,
    pub composite: CompositeScore,
    pub classification: Classification,
    pub base_salary: f64,
    pub bonus: BonusResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career: Option<CareerProgression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<FunnelConversion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competency_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dre: Option<DreStatement>,
    pub badges: BadgeTally,
}

/// Stateless evaluator bundling the metric table, multiplier schedule and ladder.
#[derive(Debug, Clone)]
pub struct ScorecardEngine {
    table: MetricTable,
    schedule: MultiplierSchedule,
    ladder: CareerLadder,
    badges: BadgeCatalog,
    default_base_salary: f64,
}

impl Default for ScorecardEngine {
    fn default() -> Self {
        Self::new(
            MetricTable::standard(),
            MultiplierSchedule::standard(),
            CareerLadder::standard(),
        )
    }
}

impl ScorecardEngine {
    pub fn new(table: MetricTable, schedule: MultiplierSchedule, ladder: CareerLadder) -> Self {
        Self {
            table,
            schedule,
            ladder,
            badges: BadgeCatalog::standard(),
            default_base_salary: DEFAULT_BASE_SALARY,
        }
    }

    pub fn with_badge_catalog(mut self, badges: BadgeCatalog) -> Self {
        self.badges = badges;
        self
    }

    pub fn with_default_base_salary(mut self, base_salary: f64) -> Self {
        self.default_base_salary = base_salary;
        self
    }

    pub fn table(&self) -> &MetricTable {
        &self.table
    }

    pub fn schedule(&self) -> &MultiplierSchedule {
        &self.schedule
    }

    pub fn ladder(&self) -> &CareerLadder {
        &self.ladder
    }

    pub fn badge_catalog(&self) -> &BadgeCatalog {
        &self.badges
    }

    pub fn composite(&self, kpis: &KpiSnapshot) -> Result<CompositeScore, ScoringError> {
        let inputs = self.table.bind(kpis)?;
        score(&inputs)
    }

    /// Binds, scores, classifies and pays out; any failure aborts the scorecard.
    pub fn evaluate(&self, seller: &SellerSnapshot) -> Result<Scorecard, ScoringError> {
        let composite = self.composite(&seller.kpis)?;
        let classification = composite.classification();

        let base_salary = seller.base_salary.unwrap_or(self.default_base_salary);
        let bonus = compute_bonus(
            &seller.brackets,
            composite.total_attainment_percent,
            base_salary,
            &self.schedule,
        )?;

        let career = seller
            .career
            .as_ref()
            .map(|position| {
                self.ladder.progression(
                    &position.current_level,
                    position.cumulative_volume,
                    position.tenure_months,
                )
            })
            .transpose()?;

        let competency_average = seller
            .competencies
            .as_ref()
            .map(CompetencyScores::average)
            .transpose()?;

        let dre = seller.dre.as_ref().map(DreInput::statement).transpose()?;
        let badges = self.badges.tally(&seller.badges)?;

        Ok(Scorecard {
            seller_id: seller.seller_id.clone(),
            name: seller.name.clone(),
            period: seller.period(),
            composite,
            classification,
            base_salary,
            bonus,
            career,
            forecast: seller.forecast.map(|funnel| funnel.conversion()),
            competency_average,
            dre,
            badges,
        })
    }

    pub fn rank(&self, sellers: &[SellerSnapshot]) -> Ranking {
        rank_sellers(sellers, &self.table)
    }
}
