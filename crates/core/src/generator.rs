use std::collections::HashSet;

use thiserror::Error;

use crate::model::{
    AnswerId, AnswerOption, Challenge, ChallengeError, ChallengeId, ContentItem, ContentPool,
    GameMode, Level, LevelId, PoolQuery,
};
use crate::rng::SeededRng;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("content pool has no items for level {0}")]
    EmptyPool(LevelId),

    #[error(transparent)]
    Challenge(#[from] ChallengeError),
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Turns a level and a content pool into an ordered challenge sequence.
///
/// Correct items are taken round-robin from a shuffled pool, so a pool
/// smaller than the level's question count repeats items instead of
/// failing. When the level's category cannot fill one option set the
/// distractors are drawn from the whole domain.
#[derive(Debug, Clone)]
pub struct ChallengeGenerator {
    rng: SeededRng,
}

impl ChallengeGenerator {
    #[must_use]
    pub fn new(rng: SeededRng) -> Self {
        Self { rng }
    }

    #[must_use]
    pub fn rng(&self) -> &SeededRng {
        &self.rng
    }

    /// # Errors
    ///
    /// Returns `GenerateError::EmptyPool` if nothing in the domain is at or
    /// below the level's difficulty.
    pub fn generate(
        &mut self,
        level: &Level,
        mode: GameMode,
        pool: &dyn ContentPool,
    ) -> Result<Vec<Challenge>, GenerateError> {
        let option_count = level.difficulty().option_count();
        let query = PoolQuery {
            domain: level.domain(),
            category: Some(level.category()),
            max_difficulty: level.difficulty(),
        };

        let mut primary = pool.query(&query);
        if primary.is_empty() {
            primary = pool.query(&query.widened());
        }
        if primary.is_empty() {
            return Err(GenerateError::EmptyPool(level.id()));
        }
        let distractors = if primary.len() < option_count {
            pool.query(&query.widened())
        } else {
            primary.clone()
        };

        self.rng.shuffle(&mut primary);

        let count = usize::try_from(level.question_count()).unwrap_or(usize::MAX);
        let mut challenges = Vec::with_capacity(count);
        for index in 0..count {
            let correct = primary[index % primary.len()];
            let challenge =
                self.build_challenge(index, correct, &distractors, option_count, mode)?;
            challenges.push(challenge);
        }

        self.rng.shuffle(&mut challenges);
        Ok(challenges)
    }

    fn build_challenge(
        &mut self,
        index: usize,
        correct: &ContentItem,
        distractors: &[&ContentItem],
        option_count: usize,
        mode: GameMode,
    ) -> Result<Challenge, ChallengeError> {
        let correct_text = option_text(correct, mode);
        let mut used_text: HashSet<String> = HashSet::from([correct_text.to_lowercase()]);

        let mut candidates: Vec<&ContentItem> = distractors
            .iter()
            .copied()
            .filter(|item| item.id() != correct.id())
            .collect();
        self.rng.shuffle(&mut candidates);

        let correct_id = AnswerId::from(correct.id());
        let mut options = vec![AnswerOption {
            id: correct_id,
            text: correct_text.to_owned(),
            is_correct: true,
        }];
        for item in candidates {
            if options.len() >= option_count {
                break;
            }
            let text = option_text(item, mode);
            if !used_text.insert(text.to_lowercase()) {
                continue;
            }
            options.push(AnswerOption {
                id: AnswerId::from(item.id()),
                text: text.to_owned(),
                is_correct: false,
            });
        }
        self.rng.shuffle(&mut options);

        Challenge::new(
            ChallengeId::new(index as u64),
            correct.id(),
            prompt_text(correct, mode),
            correct_id,
            options,
            correct.hint().map(str::to_owned),
            correct.explanation().map(str::to_owned),
            correct.display().clone(),
        )
    }
}

fn prompt_text(item: &ContentItem, mode: GameMode) -> &str {
    match mode {
        GameMode::Classic | GameMode::Practice => item.prompt(),
        GameMode::Reverse => item.answer(),
    }
}

fn option_text(item: &ContentItem, mode: GameMode) -> &str {
    match mode {
        GameMode::Classic | GameMode::Practice => item.answer(),
        GameMode::Reverse => item.prompt(),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
