mod challenge;
pub mod content;
mod domain;
mod ids;
mod level;
mod pack;
mod progress;
mod rank;
mod round;
mod settings;

pub use content::{ContentError, ContentItem, ContentPool, DisplayHint, PoolQuery, StaticContentPool};
pub use ids::{AnswerId, ChallengeId, ItemId, LevelId, ParseIdError};

pub use challenge::{AnswerOption, AnswerOutcome, Challenge, ChallengeError, ChallengeResult};
pub use domain::{Category, Difficulty, Domain, Era, GameMode, Region, ScienceField, WordSet};
pub use level::{Level, LevelCatalog, LevelError, UnlockRequirement};
pub use pack::{GamePack, PackError};
pub use progress::{COMPLETION_ACCURACY, LevelProgress, ProgressBook, UnlockReport};
pub use rank::{RankError, RankState, RankTable, RankTier};
pub use round::{BonusBreakdown, RoundResult, Stars};
pub use settings::{EngineSettings, SettingsError};
