use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankError {
    #[error("rank table cannot be empty")]
    Empty,

    #[error("first rank must start at 0 learned items")]
    MissingBaseTier,

    #[error("rank thresholds must be strictly increasing")]
    Unordered,

    #[error("rank title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub min_learned: u32,
    pub title: String,
}

/// Ordered thresholds mapping distinct learned items to a mastery title.
///
/// Deserializing goes through [`RankTable::new`], so a loaded table is
/// validated like a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankTier>", into = "Vec<RankTier>")]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    /// # Errors
    ///
    /// Returns `RankError` unless thresholds start at 0 and strictly increase.
    pub fn new<S: Into<String>>(
        tiers: impl IntoIterator<Item = (u32, S)>,
    ) -> Result<Self, RankError> {
        let tiers: Vec<RankTier> = tiers
            .into_iter()
            .map(|(min_learned, title)| RankTier {
                min_learned,
                title: title.into(),
            })
            .collect();

        let first = tiers.first().ok_or(RankError::Empty)?;
        if first.min_learned != 0 {
            return Err(RankError::MissingBaseTier);
        }
        if tiers.iter().any(|t| t.title.trim().is_empty()) {
            return Err(RankError::EmptyTitle);
        }
        if tiers.windows(2).any(|w| w[0].min_learned >= w[1].min_learned) {
            return Err(RankError::Unordered);
        }
        Ok(Self { tiers })
    }

    /// Largest tier whose threshold does not exceed `learned`.
    #[must_use]
    pub fn tier_for(&self, learned: u32) -> &RankTier {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.min_learned <= learned)
            .unwrap_or(&self.tiers[0])
    }

    #[must_use]
    pub fn next_tier(&self, learned: u32) -> Option<&RankTier> {
        self.tiers.iter().find(|t| t.min_learned > learned)
    }

    #[must_use]
    pub fn state(&self, learned: u32) -> RankState {
        RankState {
            learned,
            tier: self.tier_for(learned).clone(),
            next: self.next_tier(learned).cloned(),
        }
    }

    #[must_use]
    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }
}

impl TryFrom<Vec<RankTier>> for RankTable {
    type Error = RankError;

    fn try_from(tiers: Vec<RankTier>) -> Result<Self, Self::Error> {
        Self::new(tiers.into_iter().map(|t| (t.min_learned, t.title)))
    }
}

impl From<RankTable> for Vec<RankTier> {
    fn from(table: RankTable) -> Self {
        table.tiers
    }
}

/// Current mastery rank plus the next tier to aim for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankState {
    pub learned: u32,
    pub tier: RankTier,
    pub next: Option<RankTier>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RankTable {
        RankTable::new([(0, "Novice"), (10, "Apprentice"), (25, "Scholar")]).unwrap()
    }

    #[test]
    fn deserializing_validates_the_table() {
        assert!(serde_json::from_str::<RankTable>("[]").is_err());
        assert!(
            serde_json::from_str::<RankTable>(r#"[{"min_learned":5,"title":"Late"}]"#).is_err()
        );

        let json = serde_json::to_string(&table()).unwrap();
        let loaded: RankTable = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, table());
    }

    #[test]
    fn picks_largest_threshold_not_exceeding_count() {
        let table = table();
        assert_eq!(table.tier_for(0).title, "Novice");
        assert_eq!(table.tier_for(9).title, "Novice");
        assert_eq!(table.tier_for(10).title, "Apprentice");
        assert_eq!(table.tier_for(500).title, "Scholar");
    }

    #[test]
    fn state_reports_next_tier() {
        let state = table().state(12);
        assert_eq!(state.tier.title, "Apprentice");
        assert_eq!(state.next.map(|t| t.min_learned), Some(25));
        assert!(table().state(30).next.is_none());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            RankTable::new(Vec::<(u32, &str)>::new()).unwrap_err(),
            RankError::Empty
        );
        assert_eq!(
            RankTable::new([(5, "Novice")]).unwrap_err(),
            RankError::MissingBaseTier
        );
        assert_eq!(
            RankTable::new([(0, "A"), (10, "B"), (10, "C")]).unwrap_err(),
            RankError::Unordered
        );
    }
}
