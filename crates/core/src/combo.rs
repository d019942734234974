use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ComboError {
    #[error("multiplier must be finite and >= 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error("streak threshold {0} appears more than once")]
    DuplicateThreshold(u32),

    #[error("multiplier for streak {lower} exceeds the one for streak {higher}")]
    NotMonotonic { lower: u32, higher: u32 },

    #[error("on-fire threshold must be > 0")]
    InvalidOnFireThreshold,
}

//
// ─── LADDER ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboStep {
    pub min_streak: u32,
    pub multiplier: f64,
}

/// Ordered streak thresholds mapping a streak to a score multiplier.
///
/// Steps are held highest threshold first. A streak below every threshold
/// scores at 1.0x. Deserializing runs the same checks as [`ComboLadder::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ComboStep>", into = "Vec<ComboStep>")]
pub struct ComboLadder {
    steps: Vec<ComboStep>,
}

impl ComboLadder {
    /// Builds a ladder from `(min_streak, multiplier)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns `ComboError` if a multiplier is below 1.0, a threshold repeats,
    /// or a higher streak would score less than a lower one.
    pub fn new(steps: impl IntoIterator<Item = (u32, f64)>) -> Result<Self, ComboError> {
        let mut steps: Vec<ComboStep> = steps
            .into_iter()
            .map(|(min_streak, multiplier)| ComboStep {
                min_streak,
                multiplier,
            })
            .collect();

        for step in &steps {
            if !step.multiplier.is_finite() || step.multiplier < 1.0 {
                return Err(ComboError::InvalidMultiplier(step.multiplier));
            }
        }

        steps.sort_by(|a, b| b.min_streak.cmp(&a.min_streak));
        for pair in steps.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            if higher.min_streak == lower.min_streak {
                return Err(ComboError::DuplicateThreshold(higher.min_streak));
            }
            if lower.multiplier > higher.multiplier {
                return Err(ComboError::NotMonotonic {
                    lower: lower.min_streak,
                    higher: higher.min_streak,
                });
            }
        }

        Ok(Self { steps })
    }

    /// The common ladder: 3 → 1.5x, 5 → 2.0x, 8 → 2.5x, 12 → 3.0x.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            steps: vec![
                ComboStep {
                    min_streak: 12,
                    multiplier: 3.0,
                },
                ComboStep {
                    min_streak: 8,
                    multiplier: 2.5,
                },
                ComboStep {
                    min_streak: 5,
                    multiplier: 2.0,
                },
                ComboStep {
                    min_streak: 3,
                    multiplier: 1.5,
                },
            ],
        }
    }

    #[must_use]
    pub fn multiplier_for(&self, streak: u32) -> f64 {
        self.steps
            .iter()
            .find(|step| streak >= step.min_streak)
            .map_or(1.0, |step| step.multiplier)
    }

    #[must_use]
    pub fn steps(&self) -> &[ComboStep] {
        &self.steps
    }
}

impl TryFrom<Vec<ComboStep>> for ComboLadder {
    type Error = ComboError;

    fn try_from(steps: Vec<ComboStep>) -> Result<Self, Self::Error> {
        Self::new(steps.into_iter().map(|s| (s.min_streak, s.multiplier)))
    }
}

impl From<ComboLadder> for Vec<ComboStep> {
    fn from(ladder: ComboLadder) -> Self {
        ladder.steps
    }
}

impl Default for ComboLadder {
    fn default() -> Self {
        Self::standard()
    }
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Snapshot of the streak within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub streak: u32,
    pub multiplier: f64,
    pub max_reached: u32,
    /// Presentation-only signal; does not affect scoring.
    pub on_fire: bool,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            streak: 0,
            multiplier: 1.0,
            max_reached: 0,
            on_fire: false,
        }
    }
}

/// Streak counter driving the score multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTracker {
    ladder: ComboLadder,
    on_fire_at: u32,
    state: ComboState,
}

impl ComboTracker {
    /// # Errors
    ///
    /// Returns `ComboError::InvalidOnFireThreshold` if `on_fire_at` is zero.
    pub fn new(ladder: ComboLadder, on_fire_at: u32) -> Result<Self, ComboError> {
        if on_fire_at == 0 {
            return Err(ComboError::InvalidOnFireThreshold);
        }
        Ok(Self {
            ladder,
            on_fire_at,
            state: ComboState::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> ComboState {
        self.state
    }

    #[must_use]
    pub fn ladder(&self) -> &ComboLadder {
        &self.ladder
    }

    /// Extends the streak and returns the multiplier that applies to the
    /// answer just recorded.
    pub fn record_correct(&mut self) -> f64 {
        let streak = self.state.streak.saturating_add(1);
        self.state = ComboState {
            streak,
            multiplier: self.ladder.multiplier_for(streak),
            max_reached: self.state.max_reached.max(streak),
            on_fire: self.state.on_fire || streak >= self.on_fire_at,
        };
        self.state.multiplier
    }

    /// Breaks the streak after a wrong answer, skip or timeout.
    pub fn record_miss(&mut self) {
        self.state = ComboState {
            max_reached: self.state.max_reached,
            ..ComboState::default()
        };
    }

    /// Clears everything, including the round peak.
    pub fn reset(&mut self) {
        self.state = ComboState::default();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> ComboTracker {
        ComboTracker::new(ComboLadder::standard(), 6).unwrap()
    }

    #[test]
    fn deserialized_ladder_must_not_decrease() {
        let falling = r#"[{"min_streak":3,"multiplier":2.0},{"min_streak":6,"multiplier":1.5}]"#;
        assert!(serde_json::from_str::<ComboLadder>(falling).is_err());

        let json = serde_json::to_string(&ComboLadder::standard()).unwrap();
        let loaded: ComboLadder = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, ComboLadder::standard());
        assert_eq!(loaded.multiplier_for(9), 2.5);
    }

    #[test]
    fn standard_ladder_thresholds() {
        let ladder = ComboLadder::standard();
        assert_eq!(ladder.multiplier_for(0), 1.0);
        assert_eq!(ladder.multiplier_for(2), 1.0);
        assert_eq!(ladder.multiplier_for(3), 1.5);
        assert_eq!(ladder.multiplier_for(5), 2.0);
        assert_eq!(ladder.multiplier_for(8), 2.5);
        assert_eq!(ladder.multiplier_for(40), 3.0);
    }

    #[test]
    fn ladder_rejects_decreasing_multiplier() {
        let err = ComboLadder::new([(3, 2.0), (5, 1.5)]).unwrap_err();
        assert_eq!(err, ComboError::NotMonotonic { lower: 3, higher: 5 });
    }

    #[test]
    fn ladder_rejects_sub_unit_multiplier() {
        let err = ComboLadder::new([(3, 0.5)]).unwrap_err();
        assert_eq!(err, ComboError::InvalidMultiplier(0.5));
    }

    #[test]
    fn ladder_accepts_any_input_order() {
        let ladder = ComboLadder::new([(3, 1.5), (10, 2.0)]).unwrap();
        assert_eq!(ladder.steps()[0].min_streak, 10);
        assert_eq!(ladder.multiplier_for(4), 1.5);
    }

    #[test]
    fn miss_resets_streak_but_keeps_peak() {
        let mut combo = tracker();
        for _ in 0..7 {
            combo.record_correct();
        }
        assert!(combo.state().on_fire);
        assert_eq!(combo.state().multiplier, 2.0);

        combo.record_miss();
        let state = combo.state();
        assert_eq!(state.streak, 0);
        assert_eq!(state.multiplier, 1.0);
        assert!(!state.on_fire);
        assert_eq!(state.max_reached, 7);

        combo.reset();
        assert_eq!(combo.state(), ComboState::default());
    }

    #[test]
    fn on_fire_threshold_must_be_positive() {
        assert_eq!(
            ComboTracker::new(ComboLadder::standard(), 0).unwrap_err(),
            ComboError::InvalidOnFireThreshold
        );
    }

    proptest! {
        #[test]
        fn multiplier_is_monotonic_and_resets(answers in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut combo = tracker();
            let mut previous = 1.0_f64;
            for correct in answers {
                if correct {
                    let m = combo.record_correct();
                    prop_assert!(m >= previous);
                    previous = m;
                } else {
                    combo.record_miss();
                    prop_assert_eq!(combo.state().multiplier, 1.0);
                    prop_assert_eq!(combo.state().streak, 0);
                    previous = 1.0;
                }
                prop_assert!(combo.state().max_reached >= combo.state().streak);
            }
        }
    }
}
