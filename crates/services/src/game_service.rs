use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::Clock;
use quiz_core::model::{ContentPool, Domain, EngineSettings, GamePack, ProgressBook};
use quiz_core::rng::SeededRng;
use storage::repository::Storage;

use crate::error::{GameServiceError, ProgressError};
use crate::progress_service::ProgressService;
use crate::sessions::{Ack, Command, SessionEngine, SessionSnapshot};

/// Async front of one game: serializes every command through a single
/// lock around the `SessionEngine` and persists progress after each
/// finished round.
pub struct GameService {
    domain: Domain,
    engine: Mutex<SessionEngine>,
    progress: ProgressService,
}

impl GameService {
    /// Load stored progress and build a session in `Menu`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the store cannot be read.
    pub async fn open(
        pack: GamePack,
        pool: Arc<dyn ContentPool>,
        settings: EngineSettings,
        rng: SeededRng,
        progress: ProgressService,
        clock: Clock,
    ) -> Result<Self, ProgressError> {
        let domain = pack.domain();
        let book = progress.load(domain, pack.catalog()).await?;
        tracing::debug!(
            game = %domain,
            seed = rng.seed(),
            learned = book.learned_count(),
            "game opened"
        );
        let engine = SessionEngine::new(pack, pool, settings, rng, book).with_clock(clock);
        Ok(Self {
            domain,
            engine: Mutex::new(engine),
            progress,
        })
    }

    /// Same as [`GameService::open`] over a `SQLite` store.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if the database cannot be opened or read.
    pub async fn open_sqlite(
        db_url: &str,
        pack: GamePack,
        pool: Arc<dyn ContentPool>,
        settings: EngineSettings,
        rng: SeededRng,
    ) -> Result<Self, GameServiceError> {
        let storage = Storage::sqlite(db_url).await?;
        let progress = ProgressService::from_storage(&storage);
        Ok(Self::open(pack, pool, settings, rng, progress, Clock::default()).await?)
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Apply one command; progress is written before the lock is released
    /// whenever the command finished a round.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if saving fails. The command itself has
    /// already been applied and the save is retried after the next command.
    pub async fn dispatch(&self, command: Command) -> Result<Ack, ProgressError> {
        let mut engine = self.engine.lock().await;
        let ack = engine.dispatch(command);
        if engine.is_dirty() {
            self.progress.save(self.domain, engine.progress()).await?;
            engine.mark_saved();
        }
        Ok(ack)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.engine.lock().await.snapshot()
    }

    /// Copy of the current progress book.
    pub async fn progress(&self) -> ProgressBook {
        self.engine.lock().await.progress().clone()
    }

    /// Erase stored progress and return the session to `Menu`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the store cannot be written.
    pub async fn reset_progress(&self) -> Result<(), ProgressError> {
        let mut engine = self.engine.lock().await;
        self.progress.reset(self.domain).await?;
        engine.replace_progress(ProgressBook::new());
        Ok(())
    }
}
