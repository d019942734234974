use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::domain::{Category, Difficulty, Domain};
use crate::model::ids::LevelId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level name cannot be empty")]
    EmptyName,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("level {0} is declared more than once")]
    DuplicateLevel(LevelId),

    #[error("level {level} belongs to {found}, catalog is {expected}")]
    ForeignCategory {
        level: LevelId,
        expected: Domain,
        found: Domain,
    },

    #[error("level {0} cannot require itself")]
    SelfRequirement(LevelId),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Score gate on a prior level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    pub level_id: LevelId,
    pub min_score: u32,
}

/// Static level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    id: LevelId,
    name: String,
    category: Category,
    difficulty: Difficulty,
    question_count: u32,
    time_limit_secs: u32,
    unlock_requirement: Option<UnlockRequirement>,
}

impl Level {
    /// Creates a level.
    ///
    /// `time_limit_secs` is per question; `0` means untimed.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::EmptyName`, `LevelError::InvalidQuestionCount` or
    /// `LevelError::SelfRequirement` when the configuration is unusable.
    pub fn new(
        id: LevelId,
        name: impl Into<String>,
        category: Category,
        difficulty: Difficulty,
        question_count: u32,
        time_limit_secs: u32,
        unlock_requirement: Option<UnlockRequirement>,
    ) -> Result<Self, LevelError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(LevelError::EmptyName);
        }
        if question_count == 0 {
            return Err(LevelError::InvalidQuestionCount);
        }
        if unlock_requirement.is_some_and(|req| req.level_id == id) {
            return Err(LevelError::SelfRequirement(id));
        }

        Ok(Self {
            id,
            name,
            category,
            difficulty,
            question_count,
            time_limit_secs,
            unlock_requirement,
        })
    }

    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.category.domain()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_limit_secs > 0
    }

    #[must_use]
    pub fn unlock_requirement(&self) -> Option<UnlockRequirement> {
        self.unlock_requirement
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, immutable list of levels for one domain, including unlock edges.
///
/// Unlock edges that point at unknown level ids are kept; they simply never
/// fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    domain: Domain,
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Builds a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::DuplicateLevel` for repeated ids and
    /// `LevelError::ForeignCategory` when a level belongs to another domain.
    pub fn new(domain: Domain, levels: Vec<Level>) -> Result<Self, LevelError> {
        let mut seen = HashSet::with_capacity(levels.len());
        for level in &levels {
            if !seen.insert(level.id()) {
                return Err(LevelError::DuplicateLevel(level.id()));
            }
            if level.domain() != domain {
                return Err(LevelError::ForeignCategory {
                    level: level.id(),
                    expected: domain,
                    found: level.domain(),
                });
            }
        }
        Ok(Self { domain, levels })
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|level| level.id() == id)
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::new();
        for level in &self.levels {
            if !out.contains(&level.category()) {
                out.push(level.category());
            }
        }
        out
    }

    pub fn levels_in(&self, category: Category) -> impl Iterator<Item = &Level> {
        self.levels
            .iter()
            .filter(move |level| level.category() == category)
    }

    /// The level after `id` in catalog order that shares its category.
    #[must_use]
    pub fn next_in_category(&self, id: LevelId) -> Option<&Level> {
        let pos = self.levels.iter().position(|level| level.id() == id)?;
        let category = self.levels[pos].category();
        self.levels[pos + 1..]
            .iter()
            .find(|level| level.category() == category)
    }

    /// Levels with no unlock requirement; these are always playable.
    pub fn starter_levels(&self) -> impl Iterator<Item = &Level> {
        self.levels
            .iter()
            .filter(|level| level.unlock_requirement().is_none())
    }

    /// Levels gated on `id`.
    pub fn dependents_of(&self, id: LevelId) -> impl Iterator<Item = &Level> {
        self.levels.iter().filter(move |level| {
            level
                .unlock_requirement()
                .is_some_and(|req| req.level_id == id)
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
