use thiserror::Error;

use crate::combo::ComboError;
use crate::generator::GenerateError;
use crate::model::{ContentError, LevelError, PackError, RankError, SettingsError};
use crate::scoring::ScoringError;

/// Any configuration or generation failure raised by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Pack(#[from] PackError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Combo(#[from] ComboError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}
