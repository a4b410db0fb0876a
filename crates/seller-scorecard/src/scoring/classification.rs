use serde::{Deserialize, Serialize};

pub const ON_TARGET_THRESHOLD: f64 = 100.0;
pub const WARNING_THRESHOLD: f64 = 80.0;

/// Traffic-light status shared by metric, composite, and seller attainment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    OnTarget,
    Warning,
    Critical,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTarget => "On Target",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::OnTarget => "green",
            Self::Warning => "yellow",
            Self::Critical => "red",
        }
    }
}

pub fn classify(attainment_percent: f64) -> Classification {
    if attainment_percent >= ON_TARGET_THRESHOLD {
        Classification::OnTarget
    } else if attainment_percent >= WARNING_THRESHOLD {
        Classification::Warning
    } else {
        Classification::Critical
    }
}
