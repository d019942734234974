use chrono::{DateTime, Utc};
use quiz_core::model::{Domain, ItemId, LevelId, LevelProgress, ProgressBook};
use serde::{Deserialize, Serialize};

/// Current layout of the persisted progress record.
pub const PROGRESS_RECORD_VERSION: u32 = 1;

/// Storage key for a game's progress record.
#[must_use]
pub fn progress_key(domain: Domain) -> String {
    format!("{}/progress", domain.key())
}

/// Persisted shape for one level's stats.
///
/// This mirrors the domain `LevelProgress` so storage can serialize without
/// leaking serde layout into the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgressRecord {
    pub level_id: u64,
    pub high_score: u32,
    pub best_accuracy: f64,
    pub best_streak: u32,
    pub times_played: u32,
    pub times_completed: u32,
    pub times_perfect: u32,
    pub unlocked: bool,
    pub stars: u8,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl LevelProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &LevelProgress) -> Self {
        Self {
            level_id: progress.level_id().value(),
            high_score: progress.high_score(),
            best_accuracy: progress.best_accuracy(),
            best_streak: progress.best_streak(),
            times_played: progress.times_played(),
            times_completed: progress.times_completed(),
            times_perfect: progress.times_perfect(),
            unlocked: progress.is_unlocked(),
            stars: progress.stars().value(),
            last_played_at: progress.last_played_at(),
        }
    }

    #[must_use]
    pub fn into_progress(self) -> LevelProgress {
        LevelProgress::from_persisted(
            LevelId::new(self.level_id),
            self.high_score,
            self.best_accuracy,
            self.best_streak,
            self.times_played,
            self.times_completed,
            self.times_perfect,
            self.unlocked,
            self.stars,
            self.last_played_at,
        )
    }
}

/// Persisted shape for a whole game's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub version: u32,
    pub levels: Vec<LevelProgressRecord>,
    pub learned: Vec<u64>,
    pub rounds_played: u32,
    pub total_score: u64,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_book(book: &ProgressBook) -> Self {
        Self {
            version: PROGRESS_RECORD_VERSION,
            levels: book
                .levels()
                .map(LevelProgressRecord::from_progress)
                .collect(),
            learned: book.learned().iter().map(ItemId::value).collect(),
            rounds_played: book.rounds_played(),
            total_score: book.total_score(),
        }
    }

    #[must_use]
    pub fn into_book(self) -> ProgressBook {
        ProgressBook::from_persisted(
            self.levels
                .into_iter()
                .map(LevelProgressRecord::into_progress),
            self.learned.into_iter().map(ItemId::new),
            self.rounds_played,
            self.total_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespaced_per_game() {
        assert_eq!(progress_key(Domain::History), "history/progress");
        assert_ne!(
            progress_key(Domain::Science),
            progress_key(Domain::Vocabulary)
        );
    }

    #[test]
    fn record_survives_json() {
        let record = ProgressRecord {
            version: PROGRESS_RECORD_VERSION,
            levels: vec![LevelProgressRecord {
                level_id: 3,
                high_score: 1_250,
                best_accuracy: 87.5,
                best_streak: 6,
                times_played: 4,
                times_completed: 3,
                times_perfect: 0,
                unlocked: true,
                stars: 2,
                last_played_at: None,
            }],
            learned: vec![1, 2, 5],
            rounds_played: 4,
            total_score: 3_900,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        let book = back.into_book();
        assert!(book.is_unlocked(LevelId::new(3)));
        assert_eq!(book.learned_count(), 3);
    }

    #[test]
    fn missing_fields_fail_to_parse() {
        let err = serde_json::from_str::<ProgressRecord>(r#"{"version":1,"levels":[]}"#);
        assert!(err.is_err());
    }
}
