use super::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Named rank with the volume and tenure required to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerLevel {
    pub name: String,
    pub order: u32,
    pub volume_threshold: f64,
    pub tenure_threshold_months: f64,
    #[serde(default)]
    pub bonus_percent: f64,
    #[serde(default)]
    pub benefits_description: String,
    #[serde(default)]
    pub color: String,
}

/// Thresholds gating promotion into a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub volume_threshold: f64,
    pub tenure_threshold_months: f64,
}

impl From<&CareerLevel> for LevelThreshold {
    fn from(level: &CareerLevel) -> Self {
        Self {
            volume_threshold: level.volume_threshold,
            tenure_threshold_months: level.tenure_threshold_months,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStatus {
    pub volume_progress_percent: f64,
    pub tenure_progress_percent: f64,
    pub eligible: bool,
    /// Seller already holds the highest rank; progression display is suppressed.
    pub terminal: bool,
}

/// Computes progress toward the next level. Never grants the promotion itself.
pub fn evaluate(
    current_volume: f64,
    current_tenure_months: f64,
    next_level: Option<&LevelThreshold>,
) -> ProgressionStatus {
    let Some(next) = next_level else {
        return ProgressionStatus {
            volume_progress_percent: 100.0,
            tenure_progress_percent: 100.0,
            eligible: true,
            terminal: true,
        };
    };

    let volume_progress_percent = progress(current_volume, next.volume_threshold);
    let tenure_progress_percent = progress(current_tenure_months, next.tenure_threshold_months);

    ProgressionStatus {
        volume_progress_percent,
        tenure_progress_percent,
        eligible: volume_progress_percent >= 100.0 && tenure_progress_percent >= 100.0,
        terminal: false,
    }
}

fn progress(current: f64, threshold: f64) -> f64 {
    // Unset thresholds count as satisfied.
    if threshold.is_nan() || threshold <= 0.0 {
        return 100.0;
    }
    if current.is_nan() {
        return 0.0;
    }
    (current / threshold * 100.0).clamp(0.0, 100.0)
}

/// Levels ordered by rank, as configured by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CareerLevel>", into = "Vec<CareerLevel>")]
pub struct CareerLadder {
    levels: Vec<CareerLevel>,
}

impl From<Vec<CareerLevel>> for CareerLadder {
    fn from(levels: Vec<CareerLevel>) -> Self {
        Self::new(levels)
    }
}

impl From<CareerLadder> for Vec<CareerLevel> {
    fn from(ladder: CareerLadder) -> Self {
        ladder.levels
    }
}

impl CareerLadder {
    pub fn new(mut levels: Vec<CareerLevel>) -> Self {
        levels.sort_by_key(|level| level.order);
        Self { levels }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            level(1, "Recruta", 0.0, 0.0, 0.0, "Base salary + commissions", "#6B7280"),
            level(2, "Aspirante", 50_000.0, 3.0, 10.0, "Base salary + commissions + 10% bonus", "#3B82F6"),
            level(3, "Consultor", 150_000.0, 6.0, 15.0, "Base salary + commissions + 15% bonus", "#10B981"),
            level(4, "Senior", 300_000.0, 12.0, 20.0, "Base salary + commissions + 20% bonus + profit sharing", "#F59E0B"),
            level(5, "Master", 500_000.0, 18.0, 25.0, "Base salary + commissions + 25% bonus + profit sharing + car", "#8B5CF6"),
        ])
    }

    pub fn levels(&self) -> &[CareerLevel] {
        &self.levels
    }

    pub fn find(&self, name: &str) -> Option<&CareerLevel> {
        self.levels
            .iter()
            .find(|level| level.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn next_level(&self, current: &str) -> Result<Option<&CareerLevel>, ScoringError> {
        let index = self
            .levels
            .iter()
            .position(|level| level.name.eq_ignore_ascii_case(current.trim()))
            .ok_or_else(|| ScoringError::UnknownCareerLevel(current.to_string()))?;
        Ok(self.levels.get(index + 1))
    }

    pub fn progression(
        &self,
        current: &str,
        current_volume: f64,
        current_tenure_months: f64,
    ) -> Result<CareerProgression, ScoringError> {
        let next = self.next_level(current)?;
        let threshold = next.map(LevelThreshold::from);
        let status = evaluate(current_volume, current_tenure_months, threshold.as_ref());

        Ok(CareerProgression {
            current_level: current.trim().to_string(),
            next_level: next.cloned(),
            status,
        })
    }
}

impl Default for CareerLadder {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerProgression {
    pub current_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level: Option<CareerLevel>,
    pub status: ProgressionStatus,
}

fn level(
    order: u32,
    name: &str,
    volume_threshold: f64,
    tenure_threshold_months: f64,
    bonus_percent: f64,
    benefits: &str,
    color: &str,
) -> CareerLevel {
    CareerLevel {
        name: name.to_string(),
        order,
        volume_threshold,
        tenure_threshold_months,
        bonus_percent,
        benefits_description: benefits.to_string(),
        color: color.to_string(),
    }
}
