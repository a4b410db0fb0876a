use super::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Monthly cost and revenue figures for one seller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DreInput {
    pub salary: f64,
    #[serde(default)]
    pub benefits: f64,
    pub revenue: f64,
}

/// Seller profit-and-loss summary derived from a [`DreInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DreStatement {
    pub salary: f64,
    pub benefits: f64,
    pub total_costs: f64,
    pub revenue: f64,
    /// Revenue needed to cover the seller's costs.
    pub breakeven: f64,
    pub roi_percent: f64,
    /// Whole months of revenue needed to pay back the costs.
    pub payback_months: u32,
}

impl DreInput {
    pub fn statement(&self) -> Result<DreStatement, ScoringError> {
        check("salary", self.salary)?;
        check("benefits", self.benefits)?;
        check("revenue", self.revenue)?;

        let total_costs = self.salary + self.benefits;
        let roi_percent = if total_costs > 0.0 {
            (self.revenue - total_costs) / total_costs * 100.0
        } else {
            0.0
        };
        let payback_months = if self.revenue > 0.0 {
            // Saturates for revenue that is tiny relative to costs.
            (total_costs / self.revenue).trunc() as u32
        } else {
            0
        };

        Ok(DreStatement {
            salary: self.salary,
            benefits: self.benefits,
            total_costs,
            revenue: self.revenue,
            breakeven: total_costs,
            roi_percent,
            payback_months,
        })
    }
}

fn check(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidDreInput { field, value })
    }
}
