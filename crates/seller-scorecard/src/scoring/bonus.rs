use super::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Payable bonus never exceeds this multiple of the base salary.
pub const SALARY_CAP_MULTIPLE: f64 = 2.0;

/// Volume tier paying a fixed amount per qualifying client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusBracket {
    pub label: String,
    #[serde(default)]
    pub minimum_volume: f64,
    pub bonus_per_client: f64,
    #[serde(default)]
    pub minimum_qualifying_clients: u32,
    #[serde(default)]
    pub current_client_count: i64,
}

impl BonusBracket {
    pub fn new(
        label: &str,
        minimum_volume: f64,
        bonus_per_client: f64,
        minimum_qualifying_clients: u32,
    ) -> Self {
        Self {
            label: label.to_string(),
            minimum_volume,
            bonus_per_client,
            minimum_qualifying_clients,
            current_client_count: 0,
        }
    }

    pub fn with_clients(mut self, current_client_count: i64) -> Self {
        self.current_client_count = current_client_count;
        self
    }

    /// Display-only: the qualifying threshold does not gate the subtotal.
    pub fn meets_minimum(&self) -> bool {
        self.current_client_count >= i64::from(self.minimum_qualifying_clients)
    }

    /// Standard brackets for a new period, with no clients counted yet.
    pub fn standard_set() -> Vec<BonusBracket> {
        vec![
            BonusBracket::new("15k+", 15_000.0, 50.0, 5),
            BonusBracket::new("30k+", 30_000.0, 100.0, 4),
            BonusBracket::new("50k+", 50_000.0, 200.0, 3),
            BonusBracket::new("100k+", 100_000.0, 400.0, 2),
            BonusBracket::new("200k+", 200_000.0, 800.0, 1),
        ]
    }

    fn validate(&self) -> Result<(), ScoringError> {
        if self.current_client_count < 0 {
            return Err(ScoringError::InvalidBonusInput {
                bracket: self.label.clone(),
                reason: format!(
                    "client count must not be negative (got {})",
                    self.current_client_count
                ),
            });
        }
        if !self.bonus_per_client.is_finite() || self.bonus_per_client < 0.0 {
            return Err(ScoringError::InvalidBonusInput {
                bracket: self.label.clone(),
                reason: format!(
                    "bonus per client must be a finite, non-negative amount (got {})",
                    self.bonus_per_client
                ),
            });
        }
        Ok(())
    }
}

/// A step in the multiplier schedule, active from `min_attainment_percent` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTier {
    pub min_attainment_percent: f64,
    pub multiplier: f64,
}

/// Step function from composite attainment to bonus multiplier.
///
/// Attainment below the lowest tier pays nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplierSchedule {
    tiers: Vec<MultiplierTier>,
}

impl MultiplierSchedule {
    pub fn new(mut tiers: Vec<MultiplierTier>) -> Result<Self, ScoringError> {
        for tier in &tiers {
            if !tier.min_attainment_percent.is_finite() {
                return Err(ScoringError::InvalidMultiplierTier(format!(
                    "threshold {} is not a finite percentage",
                    tier.min_attainment_percent
                )));
            }
            if !tier.multiplier.is_finite() || tier.multiplier < 0.0 {
                return Err(ScoringError::InvalidMultiplierTier(format!(
                    "multiplier {} must be a finite, non-negative factor",
                    tier.multiplier
                )));
            }
        }

        tiers.sort_by(|a, b| a.min_attainment_percent.total_cmp(&b.min_attainment_percent));
        if let Some(pair) = tiers
            .windows(2)
            .find(|pair| pair[0].min_attainment_percent == pair[1].min_attainment_percent)
        {
            return Err(ScoringError::InvalidMultiplierTier(format!(
                "threshold {} is declared twice",
                pair[0].min_attainment_percent
            )));
        }

        Ok(Self { tiers })
    }

    /// `<80% → 0`, `80–99% → 0.8`, `≥100% → 1.0`.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                MultiplierTier {
                    min_attainment_percent: 80.0,
                    multiplier: 0.8,
                },
                MultiplierTier {
                    min_attainment_percent: 100.0,
                    multiplier: 1.0,
                },
            ],
        }
    }

    pub fn tiers(&self) -> &[MultiplierTier] {
        &self.tiers
    }

    pub fn multiplier_for(&self, composite_attainment_percent: f64) -> f64 {
        self.tiers
            .iter()
            .rev()
            .find(|tier| composite_attainment_percent >= tier.min_attainment_percent)
            .map(|tier| tier.multiplier)
            .unwrap_or(0.0)
    }
}

impl Default for MultiplierSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for MultiplierSchedule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            tiers: Vec<MultiplierTier>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.tiers).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSubtotal {
    pub label: String,
    pub bonus_per_client: f64,
    pub client_count: i64,
    pub subtotal: f64,
    pub meets_minimum: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusResult {
    pub brackets: Vec<BracketSubtotal>,
    pub gross_bonus: f64,
    pub multiplier: f64,
    pub cap: f64,
    pub capped: bool,
    pub final_bonus: f64,
}

/// Sums every bracket, scales by the attainment multiplier, then caps at
/// twice the base salary.
pub fn compute_bonus(
    brackets: &[BonusBracket],
    composite_attainment_percent: f64,
    base_salary: f64,
    schedule: &MultiplierSchedule,
) -> Result<BonusResult, ScoringError> {
    if !base_salary.is_finite() || base_salary <= 0.0 {
        return Err(ScoringError::InvalidSalary(base_salary));
    }

    let mut subtotals = Vec::with_capacity(brackets.len());
    for bracket in brackets {
        bracket.validate()?;
        let subtotal = bracket.bonus_per_client * bracket.current_client_count as f64;
        if !subtotal.is_finite() {
            return Err(ScoringError::InvalidBonusInput {
                bracket: bracket.label.clone(),
                reason: "subtotal is not a finite amount".to_string(),
            });
        }
        subtotals.push(BracketSubtotal {
            label: bracket.label.clone(),
            bonus_per_client: bracket.bonus_per_client,
            client_count: bracket.current_client_count,
            subtotal,
            meets_minimum: bracket.meets_minimum(),
        });
    }

    let gross_bonus: f64 = subtotals.iter().map(|entry| entry.subtotal).sum();
    if !gross_bonus.is_finite() {
        return Err(ScoringError::InvalidBonusInput {
            bracket: "total".to_string(),
            reason: "gross bonus is not a finite amount".to_string(),
        });
    }
    let multiplier = schedule.multiplier_for(composite_attainment_percent);
    let cap = SALARY_CAP_MULTIPLE * base_salary;
    let scaled = gross_bonus * multiplier;

    Ok(BonusResult {
        brackets: subtotals,
        gross_bonus,
        multiplier,
        cap,
        capped: scaled > cap,
        final_bonus: scaled.min(cap),
    })
}
