use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so response times are deterministic in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Convenience for `advance(Duration::milliseconds(ms))`.
    pub fn advance_ms(&mut self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }
}

/// Measures time spent on one question, excluding paused stretches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    paused_ms: u64,
}

impl Stopwatch {
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            paused_ms: 0,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(at) = self.paused_at.take() {
            self.paused_ms = self.paused_ms.saturating_add(millis_between(at, now));
        }
    }

    /// Running time in milliseconds; a clock that moved backwards yields 0.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let end = self.paused_at.unwrap_or(now);
        millis_between(self.started_at, end).saturating_sub(self.paused_ms)
    }
}

fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_excludes_paused_time() {
        let mut clock = fixed_clock();
        let mut watch = Stopwatch::start(clock.now());

        clock.advance_ms(1_500);
        watch.pause(clock.now());
        clock.advance_ms(10_000);
        assert_eq!(watch.elapsed_ms(clock.now()), 1_500);

        watch.resume(clock.now());
        clock.advance_ms(500);
        assert_eq!(watch.elapsed_ms(clock.now()), 2_000);
    }

    #[test]
    fn backwards_clock_reads_zero() {
        let watch = Stopwatch::start(fixed_now());
        let earlier = fixed_now() - Duration::seconds(5);
        assert_eq!(watch.elapsed_ms(earlier), 0);
    }

    #[test]
    fn default_clock_ignores_advance() {
        let mut clock = Clock::default();
        clock.advance_ms(1_000);
        assert!(matches!(clock, Clock::Default));
    }
}
