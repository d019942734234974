use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::combo::ComboTracker;
use quiz_core::generator::ChallengeGenerator;
use quiz_core::model::{
    AnswerId, Category, Challenge, ChallengeResult, ContentPool, EngineSettings, GameMode,
    GamePack, ItemId, Level, LevelId, ProgressBook, RoundResult,
};
use quiz_core::rng::SeededRng;
use quiz_core::time::Stopwatch;
use quiz_core::timer::{QuestionTimer, TimerEvent};

use super::phase::{Ack, Command, Phase};
use super::view::{ChallengeView, PendingAdvance, SessionSnapshot};
use crate::error::{IgnoreReason, InvalidTransition};

//
// ─── ROUND ─────────────────────────────────────────────────────────────────────
//

/// Transient state of one round; dropped on finish, reset, retry or quit.
struct Round {
    level: Level,
    challenges: Vec<Challenge>,
    index: usize,
    results: Vec<ChallengeResult>,
    combo: ComboTracker,
    timer: Option<QuestionTimer>,
    stopwatch: Stopwatch,
    countdown_secs: u32,
    hint_used: bool,
    answered: Option<ChallengeResult>,
    running_score: u32,
}

impl Round {
    fn current(&self) -> Option<&Challenge> {
        self.challenges.get(self.index)
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// One player's session of one game.
///
/// The engine is a plain owned value: every command takes `&mut self` and
/// returns an `Ack`. Time only moves through `tick` (1 Hz) and the injected
/// `Clock`, and post-answer pacing is handed to the host as a
/// `PendingAdvance` instead of sleeping.
pub struct SessionEngine {
    pack: GamePack,
    pool: Arc<dyn ContentPool>,
    generator: ChallengeGenerator,
    settings: EngineSettings,
    clock: Clock,
    progress: ProgressBook,
    phase: Phase,
    mode: GameMode,
    category: Option<Category>,
    level: Option<Level>,
    round: Option<Round>,
    last_result: Option<RoundResult>,
    newly_unlocked: Vec<LevelId>,
    pending: Option<PendingAdvance>,
    next_token: u64,
    dirty: bool,
}

impl SessionEngine {
    /// Creates a session in `Menu`. Starter levels are unlocked in `progress`.
    #[must_use]
    pub fn new(
        pack: GamePack,
        pool: Arc<dyn ContentPool>,
        settings: EngineSettings,
        rng: SeededRng,
        mut progress: ProgressBook,
    ) -> Self {
        progress.unlock_starters(pack.catalog());
        let mode = default_mode(&pack);
        Self {
            pack,
            pool,
            generator: ChallengeGenerator::new(rng),
            settings,
            clock: Clock::default(),
            progress,
            phase: Phase::Menu,
            mode,
            category: None,
            level: None,
            round: None,
            last_result: None,
            newly_unlocked: Vec::new(),
            pending: None,
            next_token: 1,
            dirty: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Lets tests move a fixed clock between commands.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn pack(&self) -> &GamePack {
        &self.pack
    }

    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressBook {
        &self.progress
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// True when progress changed since the last `mark_saved`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Swaps in another progress book and abandons any running round.
    pub fn replace_progress(&mut self, mut progress: ProgressBook) {
        self.quit_to_menu();
        progress.unlock_starters(self.pack.catalog());
        self.progress = progress;
        self.dirty = false;
    }

    #[must_use]
    pub fn unlocked_levels(&self) -> Vec<LevelId> {
        self.pack
            .catalog()
            .levels()
            .iter()
            .map(Level::id)
            .filter(|id| self.progress.is_unlocked(*id))
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let round = self.round.as_ref();
        let challenge = round
            .filter(|_| matches!(self.phase, Phase::Playing | Phase::Paused))
            .and_then(|r| {
                r.current().map(|challenge| ChallengeView {
                    challenge: challenge.clone(),
                    index: r.index,
                    total: r.challenges.len(),
                    hint_revealed: r.hint_used,
                    outcome: r.answered.clone(),
                })
            });

        SessionSnapshot {
            domain: self.pack.domain(),
            phase: self.phase,
            mode: self.mode,
            category: self.category,
            level: self.level.as_ref().map(Level::id),
            countdown_secs: round
                .filter(|_| self.phase == Phase::Countdown)
                .map_or(0, |r| r.countdown_secs),
            challenge,
            remaining_secs: round
                .and_then(|r| r.timer.as_ref())
                .map(QuestionTimer::remaining_secs),
            combo: round.map(|r| r.combo.state()).unwrap_or_default(),
            running_score: round.map_or(0, |r| r.running_score),
            last_result: self.last_result.clone(),
            newly_unlocked: self.newly_unlocked.clone(),
            pending_advance: self.pending,
            unlocked_levels: self.unlocked_levels(),
            rank: self.progress.rank(self.pack.ranks()),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Ack {
        match command {
            Command::Open => self.open(),
            Command::SelectMode(mode) => self.select_mode(mode),
            Command::SelectCategory(category) => self.select_category(category),
            Command::SelectLevel(id) => self.select_level(id),
            Command::SubmitAnswer(answer) => self.submit_answer(answer),
            Command::UseHint => self.use_hint(),
            Command::Skip => self.skip(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => self.reset(),
            Command::Retry => self.retry(),
            Command::NextLevel => self.next_level(),
            Command::Quit => self.quit(),
            Command::Back => self.back(),
            Command::Tick => self.tick(),
            Command::Advance(token) => self.advance(token),
        }
    }

    // ─── SELECTION ─────────────────────────────────────────────────────────────

    pub fn open(&mut self) -> Ack {
        if self.phase != Phase::Menu {
            return self.ignore("open", IgnoreReason::WrongPhase);
        }
        if self.pack.modes().len() > 1 {
            self.phase = Phase::ModeSelect;
        } else {
            self.mode = default_mode(&self.pack);
            self.enter_category_step();
        }
        Ack::Applied
    }

    pub fn select_mode(&mut self, mode: GameMode) -> Ack {
        if self.phase != Phase::ModeSelect {
            return self.ignore("select_mode", IgnoreReason::WrongPhase);
        }
        if !self.pack.modes().contains(&mode) {
            return self.ignore("select_mode", IgnoreReason::UnknownMode(mode));
        }
        self.mode = mode;
        self.enter_category_step();
        Ack::Applied
    }

    pub fn select_category(&mut self, category: Category) -> Ack {
        if self.phase != Phase::SubSelect {
            return self.ignore("select_category", IgnoreReason::WrongPhase);
        }
        if !self.pack.catalog().categories().contains(&category) {
            return self.ignore("select_category", IgnoreReason::UnknownCategory(category));
        }
        self.category = Some(category);
        self.phase = Phase::LevelSelect;
        Ack::Applied
    }

    /// Starts a round on an unlocked level of the selected category.
    pub fn select_level(&mut self, id: LevelId) -> Ack {
        if self.phase != Phase::LevelSelect {
            return self.ignore("select_level", IgnoreReason::WrongPhase);
        }
        let level = self
            .pack
            .catalog()
            .get(id)
            .filter(|level| self.category.is_none_or(|c| level.category() == c))
            .cloned();
        let Some(level) = level else {
            return self.ignore("select_level", IgnoreReason::UnknownLevel(id));
        };
        if !self.progress.is_unlocked(id) {
            return self.ignore("select_level", IgnoreReason::LevelLocked(id));
        }
        match self.start_round(level) {
            Ok(()) => Ack::Applied,
            Err(reason) => self.ignore("select_level", reason),
        }
    }

    /// Steps back one selection phase.
    pub fn back(&mut self) -> Ack {
        let has_modes = self.pack.modes().len() > 1;
        let has_categories = self.pack.catalog().categories().len() > 1;
        self.phase = match self.phase {
            Phase::LevelSelect if has_categories => {
                self.category = None;
                Phase::SubSelect
            }
            Phase::LevelSelect | Phase::SubSelect if has_modes => Phase::ModeSelect,
            Phase::LevelSelect | Phase::SubSelect | Phase::ModeSelect => Phase::Menu,
            _ => return self.ignore("back", IgnoreReason::WrongPhase),
        };
        Ack::Applied
    }

    // ─── PLAYING ───────────────────────────────────────────────────────────────

    /// `None` takes the skip path.
    pub fn submit_answer(&mut self, answer: Option<AnswerId>) -> Ack {
        match self.record_answer(answer) {
            Ok(()) => Ack::Applied,
            Err(reason) => self.ignore("submit_answer", reason),
        }
    }

    pub fn skip(&mut self) -> Ack {
        match self.record_answer(None) {
            Ok(()) => Ack::Applied,
            Err(reason) => self.ignore("skip", reason),
        }
    }

    /// Reveals the current challenge's hint; the answer then carries the
    /// hint penalty.
    pub fn use_hint(&mut self) -> Ack {
        match self.reveal_hint() {
            Ok(()) => Ack::Applied,
            Err(reason) => self.ignore("use_hint", reason),
        }
    }

    pub fn pause(&mut self) -> Ack {
        if self.phase != Phase::Playing {
            return self.ignore("pause", IgnoreReason::WrongPhase);
        }
        let now = self.clock.now();
        if let Some(round) = self.round.as_mut() {
            round.stopwatch.pause(now);
            if let Some(timer) = round.timer.as_mut() {
                timer.suspend();
            }
        }
        self.phase = Phase::Paused;
        Ack::Applied
    }

    /// Continues with the remaining time held at pause. A pending advance
    /// stays published for the host to reschedule.
    pub fn resume(&mut self) -> Ack {
        if self.phase != Phase::Paused {
            return self.ignore("resume", IgnoreReason::WrongPhase);
        }
        let now = self.clock.now();
        if let Some(round) = self.round.as_mut() {
            round.stopwatch.resume(now);
            if let Some(timer) = round.timer.as_mut() {
                timer.resume();
            }
        }
        self.phase = Phase::Playing;
        Ack::Applied
    }

    /// One second of real time: counts down the pre-round countdown or the
    /// question timer. A question that runs out is skipped.
    pub fn tick(&mut self) -> Ack {
        match self.phase {
            Phase::Countdown => {
                let Some(round) = self.round.as_mut() else {
                    return self.ignore("tick", IgnoreReason::WrongPhase);
                };
                round.countdown_secs = round.countdown_secs.saturating_sub(1);
                if round.countdown_secs == 0 {
                    self.begin_playing();
                }
                Ack::Applied
            }
            Phase::Playing => {
                let event = self
                    .round
                    .as_mut()
                    .and_then(|r| r.timer.as_mut())
                    .map_or(TimerEvent::Ignored, QuestionTimer::tick);
                match event {
                    TimerEvent::Ticked { .. } => Ack::Applied,
                    TimerEvent::Expired => {
                        tracing::debug!("question timed out");
                        match self.record_answer(None) {
                            Ok(()) => Ack::Applied,
                            Err(reason) => self.ignore("tick", reason),
                        }
                    }
                    TimerEvent::Ignored => self.ignore("tick", IgnoreReason::TimerIdle),
                }
            }
            _ => self.ignore("tick", IgnoreReason::WrongPhase),
        }
    }

    /// Fires a deferred transition published as `PendingAdvance`.
    ///
    /// While paused the advance is held; the host calls again after resume.
    pub fn advance(&mut self, token: u64) -> Ack {
        if self.phase != Phase::Playing {
            return self.ignore("advance", IgnoreReason::WrongPhase);
        }
        match self.pending {
            None => self.ignore("advance", IgnoreReason::NothingPending),
            Some(pending) if pending.token != token => {
                self.ignore("advance", IgnoreReason::StaleToken(token))
            }
            Some(_) => {
                self.pending = None;
                self.advance_round();
                Ack::Applied
            }
        }
    }

    // ─── RESULTS ───────────────────────────────────────────────────────────────

    /// Replays the same level with fresh round state.
    pub fn retry(&mut self) -> Ack {
        if self.phase != Phase::Results {
            return self.ignore("retry", IgnoreReason::WrongPhase);
        }
        let Some(level) = self.level.clone() else {
            return self.ignore("retry", IgnoreReason::WrongPhase);
        };
        match self.start_round(level) {
            Ok(()) => Ack::Applied,
            Err(reason) => self.ignore("retry", reason),
        }
    }

    /// Moves on to the next level of the category when this round's result
    /// clears it, otherwise back to level selection.
    pub fn next_level(&mut self) -> Ack {
        if self.phase != Phase::Results {
            return self.ignore("next_level", IgnoreReason::WrongPhase);
        }
        let next = self.level.as_ref().and_then(|current| {
            self.pack
                .catalog()
                .next_in_category(current.id())
                .filter(|level| self.progress.is_unlocked(level.id()))
                .filter(|level| self.meets_unlock_bar(level, current.id()))
                .cloned()
        });

        if let Some(level) = next {
            let id = level.id();
            match self.start_round(level) {
                Ok(()) => return Ack::Applied,
                Err(reason) => tracing::debug!(level = %id, %reason, "next level unavailable"),
            }
        }
        self.clear_round();
        self.phase = Phase::LevelSelect;
        Ack::Applied
    }

    /// A level gated on the one just played also needs this round's score
    /// to reach its bar. Other levels only need to be unlocked.
    fn meets_unlock_bar(&self, level: &Level, played: LevelId) -> bool {
        match level.unlock_requirement() {
            Some(req) if req.level_id == played => self
                .last_result
                .as_ref()
                .is_some_and(|result| result.score >= req.min_score),
            _ => true,
        }
    }

    /// Abandons everything and returns to `Menu`.
    pub fn quit(&mut self) -> Ack {
        if self.phase == Phase::Menu {
            return self.ignore("quit", IgnoreReason::WrongPhase);
        }
        self.quit_to_menu();
        Ack::Applied
    }

    /// Drops all round data. Selections survive; a session that was in or
    /// after a round lands on level selection.
    pub fn reset(&mut self) -> Ack {
        self.clear_round();
        if self.phase.in_round() || self.phase == Phase::Results {
            self.phase = Phase::LevelSelect;
        }
        Ack::Applied
    }

    // ─── INTERNALS ─────────────────────────────────────────────────────────────

    fn ignore(&self, command: &'static str, reason: IgnoreReason) -> Ack {
        let transition = InvalidTransition {
            command,
            phase: self.phase,
            reason,
        };
        if command == "tick" {
            tracing::trace!(%transition, "command ignored");
        } else {
            tracing::debug!(%transition, "command ignored");
        }
        Ack::Ignored(transition)
    }

    fn enter_category_step(&mut self) {
        let categories = self.pack.catalog().categories();
        if categories.len() > 1 {
            self.category = None;
            self.phase = Phase::SubSelect;
        } else {
            self.category = categories.first().copied();
            self.phase = Phase::LevelSelect;
        }
    }

    fn start_round(&mut self, level: Level) -> Result<(), IgnoreReason> {
        let challenges = self
            .generator
            .generate(&level, self.mode, self.pool.as_ref())?;
        let timer = if self.mode.is_timed() {
            QuestionTimer::for_limit(level.time_limit_secs())
        } else {
            None
        };
        tracing::debug!(
            level = %level.id(),
            mode = ?self.mode,
            questions = challenges.len(),
            "round generated"
        );

        self.clear_round();
        self.round = Some(Round {
            level: level.clone(),
            results: Vec::with_capacity(challenges.len()),
            challenges,
            index: 0,
            combo: self.pack.combo_tracker(),
            timer,
            stopwatch: Stopwatch::start(self.clock.now()),
            countdown_secs: self.settings.countdown_secs(),
            hint_used: false,
            answered: None,
            running_score: 0,
        });
        self.level = Some(level);
        self.phase = Phase::Countdown;
        if self.settings.countdown_secs() == 0 {
            self.begin_playing();
        }
        Ok(())
    }

    fn begin_playing(&mut self) {
        self.phase = Phase::Playing;
        self.start_question();
    }

    fn start_question(&mut self) {
        let now = self.clock.now();
        if let Some(round) = self.round.as_mut() {
            round.stopwatch = Stopwatch::start(now);
            round.hint_used = false;
            round.answered = None;
            if let Some(timer) = round.timer.as_mut() {
                timer.start();
            }
        }
    }

    fn reveal_hint(&mut self) -> Result<(), IgnoreReason> {
        if self.phase != Phase::Playing {
            return Err(IgnoreReason::WrongPhase);
        }
        let round = self.round.as_mut().ok_or(IgnoreReason::WrongPhase)?;
        if round.answered.is_some() {
            return Err(IgnoreReason::AlreadyAnswered);
        }
        let has_hint = round.current().is_some_and(|c| c.hint().is_some());
        if !has_hint {
            return Err(IgnoreReason::NoHint);
        }
        if round.hint_used {
            return Err(IgnoreReason::HintAlreadyUsed);
        }
        round.hint_used = true;
        Ok(())
    }

    fn record_answer(&mut self, selected: Option<AnswerId>) -> Result<(), IgnoreReason> {
        if self.phase != Phase::Playing {
            return Err(IgnoreReason::WrongPhase);
        }
        let now = self.clock.now();
        let round = self.round.as_mut().ok_or(IgnoreReason::WrongPhase)?;
        if round.answered.is_some() {
            return Err(IgnoreReason::AlreadyAnswered);
        }
        let challenge = round
            .challenges
            .get(round.index)
            .ok_or(IgnoreReason::WrongPhase)?;
        if let Some(answer) = selected {
            if !challenge.has_option(answer) {
                return Err(IgnoreReason::UnknownAnswer(answer));
            }
        }

        let is_correct = selected.is_some_and(|answer| challenge.is_correct(answer));
        let time_spent_ms = round.stopwatch.elapsed_ms(now);
        let points_earned = if is_correct {
            let multiplier = round.combo.record_correct();
            self.pack.scoring().score_item(
                time_spent_ms,
                multiplier,
                round.level.difficulty(),
                round.hint_used,
            )
        } else {
            round.combo.record_miss();
            0
        };

        let result = ChallengeResult {
            challenge_id: challenge.id(),
            item_id: challenge.item_id(),
            selected_answer: selected,
            is_correct,
            time_spent_ms,
            points_earned,
            hint_used: round.hint_used,
        };

        round.stopwatch.pause(now);
        if let Some(timer) = round.timer.as_mut() {
            timer.stop();
        }
        round.running_score = round.running_score.saturating_add(points_earned);
        round.results.push(result.clone());
        round.answered = Some(result);

        self.schedule_advance();
        Ok(())
    }

    fn schedule_advance(&mut self) {
        let delay_ms = self.settings.feedback_delay_ms();
        if delay_ms == 0 {
            self.advance_round();
            return;
        }
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.pending = Some(PendingAdvance {
            token,
            delay: Duration::from_millis(delay_ms),
        });
    }

    fn advance_round(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.index += 1;
        if round.index >= round.challenges.len() {
            self.finish_round();
        } else {
            self.start_question();
        }
    }

    fn finish_round(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        let newly_learned: BTreeSet<ItemId> = round
            .results
            .iter()
            .filter(|r| r.is_correct)
            .map(|r| r.item_id)
            .filter(|id| !self.progress.is_learned(*id))
            .collect();

        let level_id = round.level.id();
        let highest_streak = round.combo.state().max_reached;
        let result = self.pack.scoring().summarize(
            level_id,
            self.mode,
            round.results,
            highest_streak,
            newly_learned,
        );
        let report = self
            .progress
            .apply_round(self.pack.catalog(), &result, self.clock.now());

        tracing::info!(
            game = %self.pack.domain(),
            level = %level_id,
            score = result.score,
            accuracy = result.accuracy,
            stars = result.stars.value(),
            unlocked = report.newly_unlocked.len(),
            learned = report.newly_learned,
            "round finished"
        );

        self.newly_unlocked = report.newly_unlocked;
        self.last_result = Some(result);
        self.pending = None;
        self.dirty = true;
        self.phase = Phase::Results;
    }

    fn clear_round(&mut self) {
        self.round = None;
        self.pending = None;
        self.last_result = None;
        self.newly_unlocked.clear();
    }

    fn quit_to_menu(&mut self) {
        self.clear_round();
        self.level = None;
        self.category = None;
        self.mode = default_mode(&self.pack);
        self.phase = Phase::Menu;
    }
}

fn default_mode(pack: &GamePack) -> GameMode {
    pack.modes().first().copied().unwrap_or_default()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
