#![forbid(unsafe_code)]

pub mod error;
pub mod game_service;
pub mod progress_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{GameServiceError, IgnoreReason, InvalidTransition, ProgressError};
pub use game_service::GameService;
pub use progress_service::ProgressService;
pub use sessions::{
    Ack, ChallengeView, Command, PendingAdvance, Phase, SessionEngine, SessionSnapshot,
};
