use super::classification::{classify, Classification};
use super::composite::score;
use super::domain::SellerId;
use super::metrics::MetricTable;
use super::scorecard::SellerSnapshot;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub position: usize,
    pub seller_id: SellerId,
    pub name: String,
    pub total_attainment_percent: f64,
    pub classification: Classification,
}

/// Seller whose composite could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSeller {
    pub seller_id: SellerId,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedSeller>,
}

/// Scores every seller independently and orders them by composite attainment.
///
/// Ties break on seller id so the result does not depend on input order.
pub fn rank_sellers(sellers: &[SellerSnapshot], table: &MetricTable) -> Ranking {
    let outcomes: Vec<_> = sellers
        .par_iter()
        .map(|seller| {
            table
                .bind(&seller.kpis)
                .and_then(|inputs| score(&inputs))
                .map(|composite| (seller, composite.total_attainment_percent))
                .map_err(|err| RejectedSeller {
                    seller_id: seller.seller_id.clone(),
                    error: err.to_string(),
                })
        })
        .collect();

    let mut scored = Vec::new();
    let mut rejected = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(entry) => scored.push(entry),
            Err(seller) => rejected.push(seller),
        }
    }

    scored.sort_by(|(a, a_total), (b, b_total)| {
        b_total
            .total_cmp(a_total)
            .then_with(|| a.seller_id.cmp(&b.seller_id))
    });
    rejected.sort_by(|a, b| a.seller_id.cmp(&b.seller_id));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(index, (seller, total))| RankingEntry {
            position: index + 1,
            seller_id: seller.seller_id.clone(),
            name: seller.name.clone(),
            total_attainment_percent: total,
            classification: classify(total),
        })
        .collect();

    Ranking { entries, rejected }
}
