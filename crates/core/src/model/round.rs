use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::challenge::{AnswerOutcome, ChallengeResult};
use crate::model::domain::GameMode;
use crate::model::ids::{ItemId, LevelId};

//
// ─── STARS ─────────────────────────────────────────────────────────────────────
//

/// Zero to three stars awarded from round accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Stars(u8);

impl Stars {
    pub const MAX: Stars = Stars(3);

    /// 3 at >= 95%, 2 at >= 80%, 1 at >= 60%, otherwise 0.
    #[must_use]
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Stars(3)
        } else if accuracy >= 80.0 {
            Stars(2)
        } else if accuracy >= 60.0 {
            Stars(1)
        } else {
            Stars(0)
        }
    }

    /// Clamps persisted values into range.
    #[must_use]
    pub fn from_persisted(value: u8) -> Self {
        Stars(value.min(3))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

//
// ─── ROUND RESULT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BonusBreakdown {
    pub streak: u32,
    pub speed: u32,
    pub perfect: u32,
    pub no_hints: u32,
}

impl BonusBreakdown {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.streak
            .saturating_add(self.speed)
            .saturating_add(self.perfect)
            .saturating_add(self.no_hints)
    }
}

/// Aggregate of one finished round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub level_id: LevelId,
    pub mode: GameMode,
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    /// Percentage in `0.0..=100.0`.
    pub accuracy: f64,
    pub item_points: u32,
    pub bonus: BonusBreakdown,
    pub score: u32,
    pub highest_streak: u32,
    pub hints_used: u32,
    pub average_response_ms: u64,
    pub perfect_round: bool,
    pub stars: Stars,
    /// Items answered correctly this round that were not learned before.
    pub newly_learned: BTreeSet<ItemId>,
    pub challenges: Vec<ChallengeResult>,
}

impl RoundResult {
    /// Items answered correctly in this round, learned before or not.
    pub fn correct_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.challenges
            .iter()
            .filter(|r| r.outcome() == AnswerOutcome::Correct)
            .map(|r| r.item_id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
