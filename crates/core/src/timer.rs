use serde::Serialize;

/// Lifecycle of a per-question countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Armed but not counting (between questions, or stopped).
    Idle,
    Running,
    /// Paused; remaining time is held.
    Suspended,
    Expired,
}

/// What a tick did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Ticked { remaining_secs: u32 },
    Expired,
    /// The timer was not running; the tick was dropped.
    Ignored,
}

/// Countdown for one question, advanced by an external 1 Hz tick.
///
/// The timer owns no clock or thread. Whatever drives the game delivers
/// ticks, and a suspended timer drops them, so nothing is caught up after
/// a resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTimer {
    limit_secs: u32,
    remaining_secs: u32,
    state: TimerState,
}

impl QuestionTimer {
    /// Returns `None` for an untimed limit of 0.
    #[must_use]
    pub fn for_limit(limit_secs: u32) -> Option<Self> {
        (limit_secs > 0).then_some(Self {
            limit_secs,
            remaining_secs: limit_secs,
            state: TimerState::Idle,
        })
    }

    /// Arms the timer at its full limit and starts counting.
    pub fn start(&mut self) {
        self.remaining_secs = self.limit_secs;
        self.state = TimerState::Running;
    }

    pub fn suspend(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Suspended;
        }
    }

    /// Continues from the remaining time held at suspension.
    pub fn resume(&mut self) {
        if self.state == TimerState::Suspended {
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    pub fn tick(&mut self) -> TimerEvent {
        if self.state != TimerState::Running {
            return TimerEvent::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            TimerEvent::Expired
        } else {
            TimerEvent::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    #[must_use]
    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }
}
