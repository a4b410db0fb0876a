use metrics_exporter_prometheus::PrometheusHandle;
use seller_scorecard::config::ScoringConfig;
use seller_scorecard::scoring::{
    BonusBracket, CareerLadder, KpiPeriod, MetricTable, RepositoryError, ScorecardEngine,
    SellerId, SellerSnapshot, SnapshotRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotRepository {
    records: Arc<Mutex<HashMap<(SellerId, KpiPeriod), SellerSnapshot>>>,
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn upsert(&self, snapshot: SellerSnapshot) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("snapshot store poisoned".to_string()))?;
        guard.insert((snapshot.seller_id.clone(), snapshot.period()), snapshot);
        Ok(())
    }

    fn fetch(
        &self,
        seller_id: &SellerId,
        period: KpiPeriod,
    ) -> Result<Option<SellerSnapshot>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("snapshot store poisoned".to_string()))?;
        Ok(guard.get(&(seller_id.clone(), period)).cloned())
    }

    fn for_period(&self, period: KpiPeriod) -> Result<Vec<SellerSnapshot>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("snapshot store poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|snapshot| snapshot.period() == period)
            .cloned()
            .collect())
    }
}

pub(crate) fn engine_from_config(config: &ScoringConfig) -> ScorecardEngine {
    ScorecardEngine::new(
        MetricTable::standard(),
        config.multiplier_schedule.clone(),
        CareerLadder::standard(),
    )
    .with_default_base_salary(config.default_base_salary)
}

pub(crate) fn parse_period(raw: &str) -> Result<KpiPeriod, String> {
    raw.trim()
        .parse::<KpiPeriod>()
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))
}

/// Parses `label:bonus_per_client:clients`, e.g. `15k+:50:6`.
pub(crate) fn parse_bracket(raw: &str) -> Result<BonusBracket, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [label, per_client, clients] = parts.as_slice() else {
        return Err(format!(
            "bracket '{raw}' must look like label:bonus_per_client:clients"
        ));
    };

    let per_client = per_client
        .parse::<f64>()
        .map_err(|err| format!("bonus per client '{per_client}' is not a number ({err})"))?;
    let clients = clients
        .parse::<i64>()
        .map_err(|err| format!("client count '{clients}' is not an integer ({err})"))?;

    Ok(BonusBracket::new(*label, 0.0, per_client, 0).with_clients(clients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seller_scorecard::scoring::KpiSnapshot;

    #[test]
    fn repository_replaces_snapshot_for_same_period() {
        let repository = InMemorySnapshotRepository::default();
        let period = parse_period("2025-03").expect("valid period");
        let first = SellerSnapshot::new("s-1", "Ana", KpiSnapshot::new(period));
        let mut second = first.clone();
        second.name = "Ana Souza".to_string();

        repository.upsert(first).expect("stored");
        repository.upsert(second).expect("stored");

        let stored = repository
            .fetch(&SellerId("s-1".to_string()), period)
            .expect("fetch succeeds")
            .expect("snapshot present");
        assert_eq!(stored.name, "Ana Souza");
        assert_eq!(repository.for_period(period).expect("lists").len(), 1);
    }

    #[test]
    fn parse_period_reports_input() {
        let err = parse_period("2025/03").expect_err("slash rejected");
        assert!(err.contains("2025/03"));
    }

    #[test]
    fn parse_bracket_reads_three_fields() {
        let bracket = parse_bracket("30k+:100:4").expect("bracket parses");
        assert_eq!(bracket.label, "30k+");
        assert_eq!(bracket.bonus_per_client, 100.0);
        assert_eq!(bracket.current_client_count, 4);

        assert!(parse_bracket("30k+:100").is_err());
        assert!(parse_bracket("30k+:lots:4").is_err());
    }

    #[test]
    fn engine_uses_configured_base_salary() {
        let config = ScoringConfig {
            default_base_salary: 3_000.0,
            ..ScoringConfig::default()
        };
        let engine = engine_from_config(&config);
        let period = parse_period("2025-03").expect("valid period");
        let kpis = engine.table().default_snapshot(period);
        let scorecard = engine
            .evaluate(&SellerSnapshot::new("s-1", "Ana", kpis))
            .expect("scorecard builds");
        assert_eq!(scorecard.base_salary, 3_000.0);
    }
}
