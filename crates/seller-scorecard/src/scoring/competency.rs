use super::error::ScoringError;
use serde::{Deserialize, Serialize};

pub const MIN_COMPETENCY_SCORE: u8 = 1;
pub const MAX_COMPETENCY_SCORE: u8 = 5;

/// Self/manager assessment on a 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScores {
    pub persistence: u8,
    pub influence: u8,
    pub relationship: u8,
    pub organization: u8,
    pub creativity: u8,
}

impl Default for CompetencyScores {
    fn default() -> Self {
        Self {
            persistence: 3,
            influence: 3,
            relationship: 3,
            organization: 3,
            creativity: 3,
        }
    }
}

impl CompetencyScores {
    fn entries(&self) -> [(&'static str, u8); 5] {
        [
            ("persistence", self.persistence),
            ("influence", self.influence),
            ("relationship", self.relationship),
            ("organization", self.organization),
            ("creativity", self.creativity),
        ]
    }

    pub fn average(&self) -> Result<f64, ScoringError> {
        let entries = self.entries();
        let mut total = 0u32;
        for (name, score) in entries {
            if !(MIN_COMPETENCY_SCORE..=MAX_COMPETENCY_SCORE).contains(&score) {
                return Err(ScoringError::InvalidCompetencyScore { name, score });
            }
            total += u32::from(score);
        }
        Ok(f64::from(total) / entries.len() as f64)
    }
}
