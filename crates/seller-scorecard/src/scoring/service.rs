use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{KpiPeriod, SellerId};
use super::error::ScoringError;
use super::ranking::Ranking;
use super::repository::{RepositoryError, SnapshotRepository};
use super::scorecard::{Scorecard, ScorecardEngine, SellerSnapshot};

/// Service composing the snapshot repository with the scorecard engine.
pub struct ScorecardService<R> {
    repository: Arc<R>,
    engine: Arc<ScorecardEngine>,
}

impl<R> ScorecardService<R>
where
    R: SnapshotRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: ScorecardEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ScorecardEngine {
        &self.engine
    }

    /// Store a snapshot after checking it binds against the metric table.
    pub fn record(&self, snapshot: SellerSnapshot) -> Result<(), ScorecardServiceError> {
        self.engine.table().bind(&snapshot.kpis)?;
        debug!(seller = %snapshot.seller_id, period = %snapshot.period(), "recording seller snapshot");
        self.repository.upsert(snapshot)?;
        Ok(())
    }

    pub fn scorecard(
        &self,
        seller_id: &SellerId,
        period: KpiPeriod,
    ) -> Result<Scorecard, ScorecardServiceError> {
        let snapshot = self
            .repository
            .fetch(seller_id, period)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(self.engine.evaluate(&snapshot)?)
    }

    pub fn ranking(&self, period: KpiPeriod) -> Result<Ranking, ScorecardServiceError> {
        let sellers = self.repository.for_period(period)?;
        let ranking = self.engine.rank(&sellers);

        if !ranking.rejected.is_empty() {
            warn!(
                %period,
                rejected = ranking.rejected.len(),
                "sellers excluded from ranking"
            );
        }

        Ok(ranking)
    }
}

/// Error raised by the scorecard service.
#[derive(Debug, thiserror::Error)]
pub enum ScorecardServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
