use std::time::Duration;

use quiz_core::combo::ComboState;
use quiz_core::model::{
    Category, Challenge, ChallengeResult, Domain, GameMode, LevelId, RankState, RoundResult,
};

use super::phase::Phase;

/// A transition the host must trigger later by calling `advance(token)`.
///
/// Tokens are never reused within a session, so an advance scheduled before
/// a reset, retry or quit is recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    pub token: u64,
    pub delay: Duration,
}

/// The challenge on screen plus what the player did with it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeView {
    pub challenge: Challenge,
    /// Zero-based position within the round.
    pub index: usize,
    pub total: usize,
    pub hint_revealed: bool,
    /// Set once answered, skipped or timed out.
    pub outcome: Option<ChallengeResult>,
}

/// Read-only picture of a session for presentation.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// no localized labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub domain: Domain,
    pub phase: Phase,
    pub mode: GameMode,
    pub category: Option<Category>,
    pub level: Option<LevelId>,
    /// Seconds left before the first challenge, while in `Countdown`.
    pub countdown_secs: u32,
    pub challenge: Option<ChallengeView>,
    /// `None` when the current challenge is untimed.
    pub remaining_secs: Option<u32>,
    pub combo: ComboState,
    /// Item points earned so far in the running round.
    pub running_score: u32,
    pub last_result: Option<RoundResult>,
    /// Levels the last finished round unlocked.
    pub newly_unlocked: Vec<LevelId>,
    pub pending_advance: Option<PendingAdvance>,
    pub unlocked_levels: Vec<LevelId>,
    pub rank: RankState,
}
