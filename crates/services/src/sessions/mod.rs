mod engine;
mod phase;
mod view;

// Public API of the session subsystem.
pub use crate::error::{IgnoreReason, InvalidTransition};
pub use engine::SessionEngine;
pub use phase::{Ack, Command, Phase};
pub use view::{ChallengeView, PendingAdvance, SessionSnapshot};
