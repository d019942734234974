use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    BonusBreakdown, ChallengeResult, Difficulty, GameMode, ItemId, LevelId, RoundResult, Stars,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("base points must be > 0")]
    InvalidBasePoints,

    #[error("time bonus threshold must be > 0 ms")]
    InvalidTimeBonusThreshold,

    #[error("speed tiers must have strictly increasing limits")]
    UnorderedSpeedTiers,
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// When a round counts as perfect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerfectPolicy {
    /// Every challenge answered correctly; a skip disqualifies.
    #[default]
    Strict,
    /// No wrong answers and at least one correct; skips are tolerated.
    SkipsAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedTier {
    /// Average response time must be strictly below this.
    pub below_ms: u64,
    pub bonus: u32,
}

/// Point values used to score items and rounds.
///
/// Hint penalties are applied last, after the combo and difficulty
/// multipliers, and clamp at `hint_floor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    base_points: u32,
    time_bonus_max: u32,
    time_bonus_threshold_ms: u64,
    hint_penalty: u32,
    hint_floor: u32,
    streak_bonus_per: u32,
    speed_tiers: Vec<SpeedTier>,
    perfect_bonus: u32,
    no_hints_bonus: u32,
    perfect_policy: PerfectPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: 100,
            time_bonus_max: 50,
            time_bonus_threshold_ms: 10_000,
            hint_penalty: 25,
            hint_floor: 0,
            streak_bonus_per: 15,
            speed_tiers: vec![
                SpeedTier {
                    below_ms: 5_000,
                    bonus: 150,
                },
                SpeedTier {
                    below_ms: 8_000,
                    bonus: 75,
                },
            ],
            perfect_bonus: 200,
            no_hints_bonus: 100,
            perfect_policy: PerfectPolicy::Strict,
        }
    }
}

impl ScoringConfig {
    /// # Errors
    ///
    /// Returns `ScoringError` for zero base points, a zero time-bonus
    /// threshold, or speed tiers that are not sorted by limit.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_points: u32,
        time_bonus_max: u32,
        time_bonus_threshold_ms: u64,
        hint_penalty: u32,
        hint_floor: u32,
        streak_bonus_per: u32,
        speed_tiers: Vec<SpeedTier>,
        perfect_bonus: u32,
        no_hints_bonus: u32,
        perfect_policy: PerfectPolicy,
    ) -> Result<Self, ScoringError> {
        if base_points == 0 {
            return Err(ScoringError::InvalidBasePoints);
        }
        if time_bonus_threshold_ms == 0 {
            return Err(ScoringError::InvalidTimeBonusThreshold);
        }
        if speed_tiers.windows(2).any(|w| w[0].below_ms >= w[1].below_ms) {
            return Err(ScoringError::UnorderedSpeedTiers);
        }
        Ok(Self {
            base_points,
            time_bonus_max,
            time_bonus_threshold_ms,
            hint_penalty,
            hint_floor,
            streak_bonus_per,
            speed_tiers,
            perfect_bonus,
            no_hints_bonus,
            perfect_policy,
        })
    }

    #[must_use]
    pub fn with_perfect_policy(mut self, policy: PerfectPolicy) -> Self {
        self.perfect_policy = policy;
        self
    }

    #[must_use]
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    #[must_use]
    pub fn hint_penalty(&self) -> u32 {
        self.hint_penalty
    }

    #[must_use]
    pub fn perfect_policy(&self) -> PerfectPolicy {
        self.perfect_policy
    }

    /// Points for one correct answer. Wrong answers and skips score 0 and
    /// never reach this function.
    #[must_use]
    pub fn score_item(
        &self,
        time_spent_ms: u64,
        combo_multiplier: f64,
        difficulty: Difficulty,
        hint_used: bool,
    ) -> u32 {
        let mut base = u64::from(self.base_points);
        if time_spent_ms < self.time_bonus_threshold_ms {
            // floor(max * (1 - t / threshold)) without float rounding
            let left = self.time_bonus_threshold_ms - time_spent_ms;
            base += u64::from(self.time_bonus_max) * left / self.time_bonus_threshold_ms;
        }
        #[allow(clippy::cast_precision_loss)]
        let mut score = (base as f64 * combo_multiplier).floor();
        score = (score * difficulty.score_multiplier()).floor();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = score.clamp(0.0, f64::from(u32::MAX)) as u32;
        if hint_used {
            score.saturating_sub(self.hint_penalty).max(self.hint_floor)
        } else {
            score
        }
    }

    #[must_use]
    pub fn speed_bonus(&self, average_response_ms: u64) -> u32 {
        self.speed_tiers
            .iter()
            .find(|tier| average_response_ms < tier.below_ms)
            .map_or(0, |tier| tier.bonus)
    }

    /// Aggregates per-item results into a `RoundResult`.
    ///
    /// `newly_learned` is the subset of correctly answered items the player
    /// had not learned before this round.
    #[must_use]
    pub fn summarize(
        &self,
        level_id: LevelId,
        mode: GameMode,
        challenges: Vec<ChallengeResult>,
        highest_streak: u32,
        newly_learned: BTreeSet<ItemId>,
    ) -> RoundResult {
        let total = count(challenges.len());
        let correct = count(challenges.iter().filter(|r| r.is_correct).count());
        let skipped = count(
            challenges
                .iter()
                .filter(|r| r.selected_answer.is_none())
                .count(),
        );
        let wrong = total.saturating_sub(correct).saturating_sub(skipped);
        let hints_used = count(challenges.iter().filter(|r| r.hint_used).count());
        let item_points = challenges
            .iter()
            .fold(0_u32, |acc, r| acc.saturating_add(r.points_earned));

        let accuracy = if total == 0 {
            0.0
        } else {
            f64::from(correct) / f64::from(total) * 100.0
        };
        let all_correct = total > 0 && correct == total;

        let average_response_ms = if challenges.is_empty() {
            0
        } else {
            let sum: u64 = challenges.iter().map(|r| r.time_spent_ms).sum();
            sum / challenges.len() as u64
        };

        let bonus = BonusBreakdown {
            streak: highest_streak.saturating_mul(self.streak_bonus_per),
            speed: if challenges.is_empty() {
                0
            } else {
                self.speed_bonus(average_response_ms)
            },
            perfect: if all_correct { self.perfect_bonus } else { 0 },
            no_hints: if hints_used == 0 {
                self.no_hints_bonus
            } else {
                0
            },
        };

        let perfect_round = match self.perfect_policy {
            PerfectPolicy::Strict => all_correct && wrong == 0,
            PerfectPolicy::SkipsAllowed => wrong == 0 && correct > 0,
        };

        RoundResult {
            level_id,
            mode,
            total,
            correct,
            wrong,
            skipped,
            accuracy,
            item_points,
            score: item_points.saturating_add(bonus.total()),
            bonus,
            highest_streak,
            hints_used,
            average_response_ms,
            perfect_round,
            stars: Stars::from_accuracy(accuracy),
            newly_learned,
            challenges,
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
