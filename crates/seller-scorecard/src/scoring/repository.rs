use super::domain::{KpiPeriod, SellerId};
use super::scorecard::SellerSnapshot;

/// Storage seam for seller snapshots owned by the persistence collaborator.
pub trait SnapshotRepository: Send + Sync {
    /// Inserts or replaces the snapshot for its seller and period.
    fn upsert(&self, snapshot: SellerSnapshot) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        seller_id: &SellerId,
        period: KpiPeriod,
    ) -> Result<Option<SellerSnapshot>, RepositoryError>;
    fn for_period(&self, period: KpiPeriod) -> Result<Vec<SellerSnapshot>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
