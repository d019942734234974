use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use quiz_core::model::{Domain, EngineSettings};
use quiz_core::rng::SeededRng;
use services::{GameService, ProgressService};
use storage::repository::Storage;

mod packs;
mod play;

#[derive(Parser)]
#[command(name = "quiz")]
#[command(about = "Geography, history, science and vocabulary quizzes in the terminal")]
#[command(version)]
struct Cli {
    /// SQLite database holding progress
    #[arg(long, global = true, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    db: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game
    Play {
        #[arg(long, value_enum)]
        game: Game,

        /// Seed for reproducible rounds
        #[arg(long, env = "QUIZ_SEED")]
        seed: Option<u64>,
    },

    /// Show level progress and rank
    Progress {
        #[arg(long, value_enum)]
        game: Game,
    },

    /// Forget all progress for a game
    ResetProgress {
        #[arg(long, value_enum)]
        game: Game,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Game {
    Geography,
    History,
    Science,
    Vocabulary,
}

impl From<Game> for Domain {
    fn from(game: Game) -> Self {
        match game {
            Game::Geography => Domain::Geography,
            Game::History => Domain::History,
            Game::Science => Domain::Science,
            Game::Vocabulary => Domain::Vocabulary,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they do not interleave with the game on stdout.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;

    match cli.command {
        Commands::Play { game, seed } => {
            let domain = Domain::from(game);
            let (pack, pool) = packs::load(domain).context("built-in pack is invalid")?;
            let info = play::PackInfo::from_pack(&pack);
            let rng = seed.map_or_else(SeededRng::from_entropy, SeededRng::new);
            tracing::info!(game = %domain, seed = rng.seed(), "starting game");

            let service = GameService::open_sqlite(
                &db_url,
                pack,
                Arc::new(pool),
                EngineSettings::default(),
                rng,
            )
            .await
            .with_context(|| format!("failed to open {db_url}"))?;
            play::run(&service, &info).await?;
        }
        Commands::Progress { game } => {
            let domain = Domain::from(game);
            let (pack, _) = packs::load(domain).context("built-in pack is invalid")?;
            let progress = progress_service(&db_url).await?;
            let book = progress.load(domain, pack.catalog()).await?;
            play::print_progress(&pack, &book);
        }
        Commands::ResetProgress { game } => {
            let domain = Domain::from(game);
            progress_service(&db_url).await?.reset(domain).await?;
            println!("Progress for {domain} cleared.");
        }
    }

    Ok(())
}

async fn progress_service(db_url: &str) -> Result<ProgressService> {
    let storage = Storage::sqlite(db_url)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;
    Ok(ProgressService::from_storage(&storage))
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
    }
    Ok(())
}
