use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::content::DisplayHint;
use crate::model::ids::{AnswerId, ChallengeId, ItemId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("challenge has no correct option")]
    NoCorrectOption,

    #[error("challenge has {0} correct options")]
    MultipleCorrectOptions(usize),

    #[error("correct answer {0} is not the option marked correct")]
    CorrectIdMismatch(AnswerId),

    #[error("option id {0} appears more than once")]
    DuplicateOptionId(AnswerId),

    #[error("option text {0:?} appears more than once")]
    DuplicateOptionText(String),
}

//
// ─── CHALLENGE ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub text: String,
    pub is_correct: bool,
}

/// One scored prompt with a fixed option set.
///
/// A `Challenge` can only be built through [`Challenge::new`], which enforces
/// that exactly one option is correct and that it carries `correct_answer_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    id: ChallengeId,
    item_id: ItemId,
    prompt: String,
    correct_answer_id: AnswerId,
    options: Vec<AnswerOption>,
    hint: Option<String>,
    explanation: Option<String>,
    display: DisplayHint,
}

impl Challenge {
    /// # Errors
    ///
    /// Returns `ChallengeError` if the option set is not uniquely correct or
    /// contains duplicate ids or text.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ChallengeId,
        item_id: ItemId,
        prompt: impl Into<String>,
        correct_answer_id: AnswerId,
        options: Vec<AnswerOption>,
        hint: Option<String>,
        explanation: Option<String>,
        display: DisplayHint,
    ) -> Result<Self, ChallengeError> {
        let mut ids = HashSet::with_capacity(options.len());
        let mut texts = HashSet::with_capacity(options.len());
        for option in &options {
            if !ids.insert(option.id) {
                return Err(ChallengeError::DuplicateOptionId(option.id));
            }
            if !texts.insert(option.text.to_lowercase()) {
                return Err(ChallengeError::DuplicateOptionText(option.text.clone()));
            }
        }

        let correct: Vec<_> = options.iter().filter(|o| o.is_correct).collect();
        match correct.as_slice() {
            [] => return Err(ChallengeError::NoCorrectOption),
            [only] if only.id != correct_answer_id => {
                return Err(ChallengeError::CorrectIdMismatch(correct_answer_id));
            }
            [_] => {}
            many => return Err(ChallengeError::MultipleCorrectOptions(many.len())),
        }

        Ok(Self {
            id,
            item_id,
            prompt: prompt.into(),
            correct_answer_id,
            options,
            hint,
            explanation,
            display,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    /// Content item this challenge tests.
    #[must_use]
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer_id(&self) -> AnswerId {
        self.correct_answer_id
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn display(&self) -> &DisplayHint {
        &self.display
    }

    #[must_use]
    pub fn has_option(&self, answer: AnswerId) -> bool {
        self.options.iter().any(|o| o.id == answer)
    }

    #[must_use]
    pub fn is_correct(&self, answer: AnswerId) -> bool {
        answer == self.correct_answer_id
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Skipped,
}

/// Outcome of one challenge within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResult {
    pub challenge_id: ChallengeId,
    pub item_id: ItemId,
    /// `None` when the challenge was skipped or timed out.
    pub selected_answer: Option<AnswerId>,
    pub is_correct: bool,
    pub time_spent_ms: u64,
    pub points_earned: u32,
    pub hint_used: bool,
}

impl ChallengeResult {
    #[must_use]
    pub fn outcome(&self) -> AnswerOutcome {
        match (self.selected_answer, self.is_correct) {
            (None, _) => AnswerOutcome::Skipped,
            (Some(_), true) => AnswerOutcome::Correct,
            (Some(_), false) => AnswerOutcome::Wrong,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
