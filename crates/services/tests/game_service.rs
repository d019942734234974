mod support;

use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Domain, EngineSettings};
use quiz_core::rng::SeededRng;
use quiz_core::time::fixed_clock;
use services::{Ack, Command, GameService, Phase, ProgressError, ProgressService};
use storage::record::progress_key;
use storage::repository::{InMemoryStore, KeyValueStore, StorageError};
use support::*;

async fn open_game(store: &InMemoryStore) -> GameService {
    GameService::open(
        history_pack(),
        Arc::new(history_pool()),
        EngineSettings::new(0, 0).unwrap(),
        SeededRng::new(9),
        ProgressService::new(Arc::new(store.clone())),
        fixed_clock(),
    )
    .await
    .expect("open game")
}

async fn correct_answer_of(game: &GameService) -> Command {
    let snapshot = game.snapshot().await;
    let challenge = snapshot.challenge.expect("challenge on screen");
    Command::SubmitAnswer(Some(challenge.challenge.correct_answer_id()))
}

async fn play_perfect(game: &GameService) {
    for command in [
        Command::Open,
        Command::SelectCategory(ANCIENT),
        Command::SelectLevel(ANCIENT_I),
    ] {
        assert_eq!(game.dispatch(command).await.unwrap(), Ack::Applied);
    }
    while game.snapshot().await.phase == Phase::Playing {
        let command = correct_answer_of(game).await;
        assert!(game.dispatch(command).await.unwrap().is_applied());
    }
}

#[tokio::test]
async fn finished_round_is_persisted_and_reloaded() {
    let store = InMemoryStore::new();
    let game = open_game(&store).await;
    assert!(store.get(&progress_key(Domain::History)).await.unwrap().is_none());

    play_perfect(&game).await;
    assert_eq!(game.snapshot().await.phase, Phase::Results);
    assert!(store.get(&progress_key(Domain::History)).await.unwrap().is_some());
    drop(game);

    let reopened = open_game(&store).await;
    let progress = reopened.progress().await;
    assert!(progress.is_unlocked(ANCIENT_II));
    assert_eq!(progress.learned_count(), 8);
    assert_eq!(progress.rounds_played(), 1);
    assert_eq!(progress.get(ANCIENT_I).unwrap().stars().value(), 3);
    assert!(progress.get(ANCIENT_I).unwrap().last_played_at().is_some());
}

#[tokio::test]
async fn corrupt_progress_falls_back_to_defaults() {
    let store = InMemoryStore::new();
    store
        .set(&progress_key(Domain::History), r#"{"version":1,"levels":"#)
        .await
        .unwrap();

    let game = open_game(&store).await;
    let snapshot = game.snapshot().await;
    assert_eq!(snapshot.unlocked_levels, vec![ANCIENT_I, MEDIEVAL_I]);
    assert_eq!(snapshot.rank.learned, 0);

    play_perfect(&game).await;
    let raw = store.get(&progress_key(Domain::History)).await.unwrap().unwrap();
    assert!(raw.contains("\"rounds_played\":1"));
}

#[tokio::test]
async fn ignored_commands_do_not_touch_the_store() {
    let store = InMemoryStore::new();
    let game = open_game(&store).await;

    let ack = game.dispatch(Command::Pause).await.unwrap();
    assert!(matches!(ack, Ack::Ignored(ref t) if t.phase == Phase::Menu));
    assert!(store.get(&progress_key(Domain::History)).await.unwrap().is_none());
}

#[tokio::test]
async fn reset_progress_clears_store_and_session() {
    let store = InMemoryStore::new();
    let game = open_game(&store).await;
    play_perfect(&game).await;

    game.reset_progress().await.unwrap();
    assert!(store.get(&progress_key(Domain::History)).await.unwrap().is_none());
    let snapshot = game.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Menu);
    assert!(!snapshot.unlocked_levels.contains(&ANCIENT_II));
    assert!(snapshot.last_result.is_none());
}

struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn unreachable_store_is_an_error_not_a_reset() {
    let result = GameService::open(
        history_pack(),
        Arc::new(history_pool()),
        EngineSettings::default(),
        SeededRng::new(1),
        ProgressService::new(Arc::new(UnreachableStore)),
        fixed_clock(),
    )
    .await;
    assert!(matches!(
        result,
        Err(ProgressError::Storage(StorageError::Connection(_)))
    ));
}
