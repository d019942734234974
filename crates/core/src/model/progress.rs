use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ItemId, LevelId};
use crate::model::level::LevelCatalog;
use crate::model::rank::{RankState, RankTable};
use crate::model::round::{RoundResult, Stars};

/// Accuracy a round needs to count as completed.
pub const COMPLETION_ACCURACY: f64 = 70.0;

//
// ─── LEVEL PROGRESS ────────────────────────────────────────────────────────────
//

/// Persistent per-level statistics.
///
/// High-water fields only ever grow and `unlocked` never goes back to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    level_id: LevelId,
    high_score: u32,
    best_accuracy: f64,
    best_streak: u32,
    times_played: u32,
    times_completed: u32,
    times_perfect: u32,
    unlocked: bool,
    stars: Stars,
    last_played_at: Option<DateTime<Utc>>,
}

impl LevelProgress {
    #[must_use]
    pub fn new(level_id: LevelId) -> Self {
        Self {
            level_id,
            high_score: 0,
            best_accuracy: 0.0,
            best_streak: 0,
            times_played: 0,
            times_completed: 0,
            times_perfect: 0,
            unlocked: false,
            stars: Stars::default(),
            last_played_at: None,
        }
    }

    /// Rehydrate from storage, clamping out-of-range values.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_persisted(
        level_id: LevelId,
        high_score: u32,
        best_accuracy: f64,
        best_streak: u32,
        times_played: u32,
        times_completed: u32,
        times_perfect: u32,
        unlocked: bool,
        stars: u8,
        last_played_at: Option<DateTime<Utc>>,
    ) -> Self {
        let best_accuracy = if best_accuracy.is_finite() {
            best_accuracy.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            level_id,
            high_score,
            best_accuracy,
            best_streak,
            times_played,
            times_completed: times_completed.min(times_played),
            times_perfect: times_perfect.min(times_played),
            unlocked,
            stars: Stars::from_persisted(stars),
            last_played_at,
        }
    }

    /// Folds one finished round into the stats.
    pub fn merge(&mut self, result: &RoundResult, played_at: DateTime<Utc>) {
        self.high_score = self.high_score.max(result.score);
        self.best_accuracy = self.best_accuracy.max(result.accuracy);
        self.best_streak = self.best_streak.max(result.highest_streak);
        self.times_played = self.times_played.saturating_add(1);
        if result.accuracy >= COMPLETION_ACCURACY {
            self.times_completed = self.times_completed.saturating_add(1);
        }
        if result.perfect_round {
            self.times_perfect = self.times_perfect.saturating_add(1);
        }
        self.stars = self.stars.max(Stars::from_accuracy(result.accuracy));
        self.last_played_at = Some(
            self.last_played_at
                .map_or(played_at, |prev| prev.max(played_at)),
        );
    }

    /// Returns `true` if this call changed the flag.
    pub fn unlock(&mut self) -> bool {
        let changed = !self.unlocked;
        self.unlocked = true;
        changed
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn best_accuracy(&self) -> f64 {
        self.best_accuracy
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn times_played(&self) -> u32 {
        self.times_played
    }

    #[must_use]
    pub fn times_completed(&self) -> u32 {
        self.times_completed
    }

    #[must_use]
    pub fn times_perfect(&self) -> u32 {
        self.times_perfect
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub fn stars(&self) -> Stars {
        self.stars
    }

    #[must_use]
    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        self.last_played_at
    }
}

//
// ─── PROGRESS BOOK ─────────────────────────────────────────────────────────────
//

/// What a merged round changed beyond the level's own stats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockReport {
    pub newly_unlocked: Vec<LevelId>,
    pub newly_learned: usize,
}

/// All progress for one game: per-level stats, learned items and totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressBook {
    levels: BTreeMap<LevelId, LevelProgress>,
    learned: BTreeSet<ItemId>,
    rounds_played: u32,
    total_score: u64,
}

impl ProgressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_persisted(
        levels: impl IntoIterator<Item = LevelProgress>,
        learned: impl IntoIterator<Item = ItemId>,
        rounds_played: u32,
        total_score: u64,
    ) -> Self {
        Self {
            levels: levels.into_iter().map(|p| (p.level_id(), p)).collect(),
            learned: learned.into_iter().collect(),
            rounds_played,
            total_score,
        }
    }

    /// Unlocks every level without a requirement, regardless of stored state.
    pub fn unlock_starters(&mut self, catalog: &LevelCatalog) {
        for level in catalog.starter_levels() {
            self.levels
                .entry(level.id())
                .or_insert_with(|| LevelProgress::new(level.id()))
                .unlock();
        }
    }

    /// Merges a finished round and propagates unlocks along the catalog's
    /// edges. Rounds for levels the catalog does not know are ignored.
    pub fn apply_round(
        &mut self,
        catalog: &LevelCatalog,
        result: &RoundResult,
        played_at: DateTime<Utc>,
    ) -> UnlockReport {
        let mut report = UnlockReport::default();
        if catalog.get(result.level_id).is_none() {
            return report;
        }

        self.levels
            .entry(result.level_id)
            .or_insert_with(|| LevelProgress::new(result.level_id))
            .merge(result, played_at);

        for dependent in catalog.dependents_of(result.level_id) {
            let Some(req) = dependent.unlock_requirement() else {
                continue;
            };
            if result.score < req.min_score {
                continue;
            }
            let changed = self
                .levels
                .entry(dependent.id())
                .or_insert_with(|| LevelProgress::new(dependent.id()))
                .unlock();
            if changed {
                report.newly_unlocked.push(dependent.id());
            }
        }

        let before = self.learned.len();
        self.learned.extend(result.correct_items());
        report.newly_learned = self.learned.len() - before;

        self.rounds_played = self.rounds_played.saturating_add(1);
        self.total_score = self.total_score.saturating_add(u64::from(result.score));
        report
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&LevelProgress> {
        self.levels.get(&id)
    }

    #[must_use]
    pub fn is_unlocked(&self, id: LevelId) -> bool {
        self.levels.get(&id).is_some_and(LevelProgress::is_unlocked)
    }

    pub fn levels(&self) -> impl Iterator<Item = &LevelProgress> {
        self.levels.values()
    }

    #[must_use]
    pub fn learned(&self) -> &BTreeSet<ItemId> {
        &self.learned
    }

    #[must_use]
    pub fn is_learned(&self, item: ItemId) -> bool {
        self.learned.contains(&item)
    }

    #[must_use]
    pub fn learned_count(&self) -> u32 {
        u32::try_from(self.learned.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    #[must_use]
    pub fn rank(&self, table: &RankTable) -> RankState {
        table.state(self.learned_count())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
