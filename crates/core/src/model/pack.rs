use thiserror::Error;

use crate::combo::{ComboError, ComboLadder, ComboTracker};
use crate::model::domain::{Domain, GameMode};
use crate::model::level::LevelCatalog;
use crate::model::rank::RankTable;
use crate::scoring::ScoringConfig;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PackError {
    #[error("a game needs at least one mode")]
    NoModes,

    #[error("catalog is for {catalog}, pack is for {pack}")]
    CatalogDomainMismatch { pack: Domain, catalog: Domain },

    #[error("catalog has no levels")]
    EmptyCatalog,

    #[error(transparent)]
    Combo(#[from] ComboError),
}

/// Everything that makes one of the quiz games different from the others,
/// apart from its content pool.
#[derive(Debug, Clone, PartialEq)]
pub struct GamePack {
    domain: Domain,
    modes: Vec<GameMode>,
    catalog: LevelCatalog,
    combo: ComboTracker,
    scoring: ScoringConfig,
    ranks: RankTable,
}

impl GamePack {
    /// # Errors
    ///
    /// Returns `PackError` if there are no modes, the catalog is empty or
    /// belongs to another domain, or `on_fire_at` is zero.
    pub fn new(
        domain: Domain,
        modes: Vec<GameMode>,
        catalog: LevelCatalog,
        combo_ladder: ComboLadder,
        on_fire_at: u32,
        scoring: ScoringConfig,
        ranks: RankTable,
    ) -> Result<Self, PackError> {
        if modes.is_empty() {
            return Err(PackError::NoModes);
        }
        if catalog.domain() != domain {
            return Err(PackError::CatalogDomainMismatch {
                pack: domain,
                catalog: catalog.domain(),
            });
        }
        if catalog.levels().is_empty() {
            return Err(PackError::EmptyCatalog);
        }
        let combo = ComboTracker::new(combo_ladder, on_fire_at)?;

        let mut unique = Vec::with_capacity(modes.len());
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }

        Ok(Self {
            domain,
            modes: unique,
            catalog,
            combo,
            scoring,
            ranks,
        })
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn modes(&self) -> &[GameMode] {
        &self.modes
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    #[must_use]
    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Fresh tracker for a new round.
    #[must_use]
    pub fn combo_tracker(&self) -> ComboTracker {
        let mut combo = self.combo.clone();
        combo.reset();
        combo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::domain::{Category, Difficulty, Era};
    use crate::model::ids::LevelId;
    use crate::model::level::Level;

    fn history_catalog() -> LevelCatalog {
        let level = Level::new(
            LevelId::new(1),
            "Ancient",
            Category::Era(Era::Ancient),
            Difficulty::Easy,
            5,
            20,
            None,
        )
        .unwrap();
        LevelCatalog::new(Domain::History, vec![level]).unwrap()
    }

    fn ranks() -> RankTable {
        RankTable::new([(0, "Novice")]).unwrap()
    }

    #[test]
    fn rejects_mismatched_catalog() {
        let err = GamePack::new(
            Domain::Science,
            vec![GameMode::Classic],
            history_catalog(),
            ComboLadder::standard(),
            8,
            ScoringConfig::default(),
            ranks(),
        )
        .unwrap_err();
        assert!(matches!(err, PackError::CatalogDomainMismatch { .. }));
    }

    #[test]
    fn deduplicates_modes() {
        let pack = GamePack::new(
            Domain::History,
            vec![GameMode::Classic, GameMode::Practice, GameMode::Classic],
            history_catalog(),
            ComboLadder::standard(),
            8,
            ScoringConfig::default(),
            ranks(),
        )
        .unwrap();
        assert_eq!(pack.modes(), &[GameMode::Classic, GameMode::Practice]);
    }

    #[test]
    fn rejects_zero_on_fire_threshold() {
        let err = GamePack::new(
            Domain::History,
            vec![GameMode::Classic],
            history_catalog(),
            ComboLadder::standard(),
            0,
            ScoringConfig::default(),
            ranks(),
        )
        .unwrap_err();
        assert_eq!(err, PackError::Combo(ComboError::InvalidOnFireThreshold));
    }
}
