use super::domain::SellerId;
use super::error::ScoringError;
use super::scorecard::SellerSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub points: u32,
}

/// Badges a seller can be awarded, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Badge>", into = "Vec<Badge>")]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl From<Vec<Badge>> for BadgeCatalog {
    fn from(badges: Vec<Badge>) -> Self {
        Self::new(badges)
    }
}

impl From<BadgeCatalog> for Vec<Badge> {
    fn from(catalog: BadgeCatalog) -> Self {
        catalog.badges
    }
}

/// Points earned from a list of awarded badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeTally {
    pub total_points: u32,
    pub badges_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsEntry {
    pub position: usize,
    pub seller_id: SellerId,
    pub name: String,
    pub total_points: u32,
    pub badges_count: usize,
}

impl BadgeCatalog {
    /// Later duplicates of an id are dropped.
    pub fn new(badges: Vec<Badge>) -> Self {
        let mut unique: Vec<Badge> = Vec::with_capacity(badges.len());
        for badge in badges {
            if !unique.iter().any(|existing| existing.id == badge.id) {
                unique.push(badge);
            }
        }
        Self { badges: unique }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            badge("first_sale", "First Sale", "Closed the first client", "🎯", 10),
            badge("goal_crusher", "Goal Crusher", "Composite attainment of 100% or more", "🏆", 50),
            badge("streak_3", "On Fire", "Three consecutive months on target", "🔥", 75),
            badge("streak_6", "Unstoppable", "Six consecutive months on target", "⚡", 150),
            badge("low_churn", "Retention Pro", "Churn below target for the month", "🛡️", 40),
            badge("top_tpv", "TPV Champion", "Highest TPV of the month", "💰", 80),
            badge("rising_star", "Rising Star", "Promoted to the next career level", "⭐", 100),
            badge("hunter", "Hunter", "Ten new actives in a single month", "🎣", 60),
            badge("perfect_month", "Perfect Month", "Every metric on target", "💎", 120),
            badge("mentor", "Mentor", "Onboarded a new seller", "🤝", 30),
        ])
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn get(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|badge| badge.id == id)
    }

    /// Fails on the first id the catalog does not know.
    pub fn tally<S: AsRef<str>>(&self, awarded: &[S]) -> Result<BadgeTally, ScoringError> {
        let mut total_points: u32 = 0;
        for id in awarded {
            let badge = self
                .get(id.as_ref())
                .ok_or_else(|| ScoringError::UnknownBadge(id.as_ref().to_string()))?;
            total_points = total_points.saturating_add(badge.points);
        }

        Ok(BadgeTally {
            total_points,
            badges_count: awarded.len(),
        })
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn badge(id: &str, name: &str, description: &str, icon: &str, points: u32) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        points,
    }
}

/// Orders sellers by badge points, ties broken by seller id.
pub fn points_leaderboard(
    sellers: &[SellerSnapshot],
    catalog: &BadgeCatalog,
) -> Result<Vec<PointsEntry>, ScoringError> {
    let mut entries = sellers
        .iter()
        .map(|seller| {
            catalog.tally(&seller.badges).map(|tally| PointsEntry {
                position: 0,
                seller_id: seller.seller_id.clone(),
                name: seller.name.clone(),
                total_points: tally.total_points,
                badges_count: tally.badges_count,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.seller_id.cmp(&b.seller_id))
    });
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.position = index + 1;
    }

    Ok(entries)
}
