use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── DOMAIN ────────────────────────────────────────────────────────────────────
//

/// Content domain of a quiz game.
///
/// Each domain is its own game with its own catalog, content pool and
/// persisted progress namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Geography,
    History,
    Science,
    Vocabulary,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Geography,
        Domain::History,
        Domain::Science,
        Domain::Vocabulary,
    ];

    /// Stable key used to namespace persisted records.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Domain::Geography => "geography",
            Domain::History => "history",
            Domain::Science => "science",
            Domain::Vocabulary => "vocabulary",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Number of options presented per challenge at this tier.
    #[must_use]
    pub fn option_count(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium | Difficulty::Hard => 4,
            Difficulty::Expert => 5,
        }
    }

    /// Multiplier applied to every correct item's score.
    #[must_use]
    pub fn score_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.25,
            Difficulty::Hard => 1.5,
            Difficulty::Expert => 2.0,
        }
    }
}

//
// ─── CATEGORIES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    Ancient,
    Medieval,
    EarlyModern,
    Modern,
    Contemporary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScienceField {
    Physics,
    Chemistry,
    Biology,
    Astronomy,
    EarthScience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordSet {
    Everyday,
    Academic,
    Advanced,
}

/// Sub-selection within a domain: region, era, field or word set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Category {
    Region(Region),
    Era(Era),
    Field(ScienceField),
    WordSet(WordSet),
}

impl Category {
    /// The domain a category belongs to.
    #[must_use]
    pub fn domain(self) -> Domain {
        match self {
            Category::Region(_) => Domain::Geography,
            Category::Era(_) => Domain::History,
            Category::Field(_) => Domain::Science,
            Category::WordSet(_) => Domain::Vocabulary,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Region(r) => write!(f, "{r:?}"),
            Category::Era(e) => write!(f, "{e:?}"),
            Category::Field(s) => write!(f, "{s:?}"),
            Category::WordSet(w) => write!(f, "{w:?}"),
        }
    }
}

//
// ─── GAME MODE ─────────────────────────────────────────────────────────────────
//

/// How a round presents its challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Timed, the item's prompt is asked and answers are offered.
    #[default]
    Classic,
    /// Timed, the answer text is asked and prompts are offered.
    Reverse,
    /// Like `Classic` but never timed.
    Practice,
}

impl GameMode {
    #[must_use]
    pub fn is_timed(self) -> bool {
        match self {
            GameMode::Classic | GameMode::Reverse => true,
            GameMode::Practice => false,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
