use std::fmt;

use quiz_core::model::{AnswerId, Category, GameMode, LevelId};

use crate::error::InvalidTransition;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a session currently is.
///
/// `ModeSelect` and `SubSelect` are only visited when the game offers more
/// than one mode or category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Menu,
    ModeSelect,
    SubSelect,
    LevelSelect,
    Countdown,
    Playing,
    Paused,
    Results,
}

impl Phase {
    /// True while a round exists (countdown, playing or paused).
    #[must_use]
    pub fn in_round(self) -> bool {
        matches!(self, Phase::Countdown | Phase::Playing | Phase::Paused)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Menu => "menu",
            Phase::ModeSelect => "mode-select",
            Phase::SubSelect => "sub-select",
            Phase::LevelSelect => "level-select",
            Phase::Countdown => "countdown",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Results => "results",
        };
        f.write_str(name)
    }
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

/// Everything a host can ask of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    SelectMode(GameMode),
    SelectCategory(Category),
    SelectLevel(LevelId),
    /// `None` skips the challenge.
    SubmitAnswer(Option<AnswerId>),
    UseHint,
    Skip,
    Pause,
    Resume,
    Reset,
    Retry,
    NextLevel,
    Quit,
    Back,
    Tick,
    Advance(u64),
}

impl Command {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Command::Open => "open",
            Command::SelectMode(_) => "select_mode",
            Command::SelectCategory(_) => "select_category",
            Command::SelectLevel(_) => "select_level",
            Command::SubmitAnswer(_) => "submit_answer",
            Command::UseHint => "use_hint",
            Command::Skip => "skip",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
            Command::Retry => "retry",
            Command::NextLevel => "next_level",
            Command::Quit => "quit",
            Command::Back => "back",
            Command::Tick => "tick",
            Command::Advance(_) => "advance",
        }
    }
}

/// Outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Ack {
    Applied,
    /// The session is unchanged.
    Ignored(InvalidTransition),
}

impl Ack {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Ack::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_round_phases_hold_a_round() {
        assert!(Phase::Countdown.in_round());
        assert!(Phase::Paused.in_round());
        assert!(!Phase::Results.in_round());
        assert!(!Phase::LevelSelect.in_round());
    }

    #[test]
    fn command_names_match_the_public_methods() {
        assert_eq!(Command::SubmitAnswer(None).name(), "submit_answer");
        assert_eq!(Command::Advance(3).name(), "advance");
    }
}
