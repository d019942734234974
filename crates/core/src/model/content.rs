use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::domain::{Category, Difficulty, Domain};
use crate::model::ids::ItemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("item {0} has an empty prompt")]
    EmptyPrompt(ItemId),

    #[error("item {0} has an empty answer")]
    EmptyAnswer(ItemId),

    #[error("item {0} is declared more than once")]
    DuplicateItem(ItemId),
}

//
// ─── ITEMS ─────────────────────────────────────────────────────────────────────
//

/// Presentation hint carried through to the challenge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayHint {
    #[default]
    Text,
    /// Render the given glyph (flag, element symbol, ...) next to the prompt.
    Symbol(String),
    /// Prompt refers to a calendar year; negative values are BCE.
    Year(i32),
}

/// One fact in a content pack: a prompt and the single answer it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    id: ItemId,
    category: Category,
    difficulty: Difficulty,
    prompt: String,
    answer: String,
    hint: Option<String>,
    explanation: Option<String>,
    display: DisplayHint,
}

impl ContentItem {
    /// # Errors
    ///
    /// Returns `ContentError` if prompt or answer are blank.
    pub fn new(
        id: ItemId,
        category: Category,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let prompt = prompt.into().trim().to_owned();
        let answer = answer.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(ContentError::EmptyPrompt(id));
        }
        if answer.is_empty() {
            return Err(ContentError::EmptyAnswer(id));
        }
        Ok(Self {
            id,
            category,
            difficulty,
            prompt,
            answer,
            hint: None,
            explanation: None,
            display: DisplayHint::Text,
        })
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = non_blank(hint.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = non_blank(explanation.into());
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayHint) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.category.domain()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
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
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

/// Filter applied when a round asks the pool for candidate items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolQuery {
    pub domain: Domain,
    pub category: Option<Category>,
    pub max_difficulty: Difficulty,
}

impl PoolQuery {
    #[must_use]
    pub fn matches(&self, item: &ContentItem) -> bool {
        item.domain() == self.domain
            && item.difficulty() <= self.max_difficulty
            && self.category.is_none_or(|c| item.category() == c)
    }

    /// Same query without the category restriction.
    #[must_use]
    pub fn widened(self) -> Self {
        Self {
            category: None,
            ..self
        }
    }
}

/// Read-only item catalog supplied by a content pack.
pub trait ContentPool: Send + Sync {
    /// Items matching `query`, in a stable order.
    fn query(&self, query: &PoolQuery) -> Vec<&ContentItem>;

    fn get(&self, id: ItemId) -> Option<&ContentItem>;
}

/// Content pool backed by a static list of items.
#[derive(Debug, Clone, Default)]
pub struct StaticContentPool {
    items: Vec<ContentItem>,
}

impl StaticContentPool {
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateItem` if two items share an id.
    pub fn new(items: Vec<ContentItem>) -> Result<Self, ContentError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(ContentError::DuplicateItem(item.id()));
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentPool for StaticContentPool {
    fn query(&self, query: &PoolQuery) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| query.matches(item)).collect()
    }

    fn get(&self, id: ItemId) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
