//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::generator::GenerateError;
use quiz_core::model::{AnswerId, Category, GameMode, LevelId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::Phase;

/// Why a command left the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IgnoreReason {
    #[error("not valid in this phase")]
    WrongPhase,
    #[error("mode {0:?} is not offered by this game")]
    UnknownMode(GameMode),
    #[error("category {0} is not in this catalog")]
    UnknownCategory(Category),
    #[error("level {0} is not selectable here")]
    UnknownLevel(LevelId),
    #[error("level {0} is locked")]
    LevelLocked(LevelId),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("answer {0} is not an option of the current challenge")]
    UnknownAnswer(AnswerId),
    #[error("the current challenge is already answered")]
    AlreadyAnswered,
    #[error("the current challenge has no hint")]
    NoHint,
    #[error("hint already revealed")]
    HintAlreadyUsed,
    #[error("nothing is waiting to advance")]
    NothingPending,
    #[error("advance token {0} is stale")]
    StaleToken(u64),
    #[error("timer is not running")]
    TimerIdle,
}

/// A command that had no meaning in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{command}` ignored in {phase}: {reason}")]
pub struct InvalidTransition {
    pub command: &'static str,
    pub phase: Phase,
    pub reason: IgnoreReason,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping or driving a `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServiceError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
