use serde::{Deserialize, Serialize};

/// Monthly sales funnel counts for one seller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastFunnel {
    pub qualified: u32,
    pub proposals: u32,
    pub new_clients: u32,
    pub new_actives: u32,
}

/// Stage-to-stage conversion percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunnelConversion {
    pub qualified_to_proposal_percent: f64,
    pub proposal_to_client_percent: f64,
    pub client_to_active_percent: f64,
}

impl ForecastFunnel {
    pub fn conversion(&self) -> FunnelConversion {
        FunnelConversion {
            qualified_to_proposal_percent: rate(self.proposals, self.qualified),
            proposal_to_client_percent: rate(self.new_clients, self.proposals),
            client_to_active_percent: rate(self.new_actives, self.new_clients),
        }
    }
}

fn rate(converted: u32, base: u32) -> f64 {
    if base == 0 {
        0.0
    } else {
        f64::from(converted) / f64::from(base) * 100.0
    }
}
