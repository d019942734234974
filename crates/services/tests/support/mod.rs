#![allow(dead_code)]

use std::sync::Arc;

use quiz_core::combo::ComboLadder;
use quiz_core::model::{
    AnswerId, Category, ContentItem, Difficulty, Domain, EngineSettings, Era, GameMode, GamePack,
    ItemId, Level, LevelCatalog, LevelId, ProgressBook, RankTable, StaticContentPool,
    UnlockRequirement,
};
use quiz_core::rng::SeededRng;
use quiz_core::scoring::ScoringConfig;
use quiz_core::time::fixed_clock;
use services::{Phase, SessionEngine};

pub const ANCIENT: Category = Category::Era(Era::Ancient);
pub const MEDIEVAL: Category = Category::Era(Era::Medieval);

pub const ANCIENT_I: LevelId = LevelId::new(1);
pub const ANCIENT_II: LevelId = LevelId::new(2);
pub const MEDIEVAL_I: LevelId = LevelId::new(3);

pub fn history_pool() -> StaticContentPool {
    let items = [
        (1, ANCIENT, "Founded Rome, by legend", "Romulus"),
        (2, ANCIENT, "Built the Great Pyramid", "Khufu"),
        (3, ANCIENT, "Wrote the Histories", "Herodotus"),
        (4, ANCIENT, "Crossed the Alps with elephants", "Hannibal"),
        (5, ANCIENT, "First emperor of Rome", "Augustus"),
        (6, ANCIENT, "Tutored Alexander", "Aristotle"),
        (7, ANCIENT, "Code of laws in Babylon", "Hammurabi"),
        (8, ANCIENT, "Unified China in 221 BC", "Qin Shi Huang"),
        (9, MEDIEVAL, "Crowned emperor in 800", "Charlemagne"),
        (10, MEDIEVAL, "Won at Hastings", "William"),
        (11, MEDIEVAL, "Sealed Magna Carta", "John"),
        (12, MEDIEVAL, "Travelled to Kublai Khan", "Marco Polo"),
    ];
    let items = items
        .into_iter()
        .map(|(id, category, prompt, answer)| {
            ContentItem::new(ItemId::new(id), category, Difficulty::Easy, prompt, answer)
                .unwrap()
                .with_hint(format!("{} letters", answer.len()))
        })
        .collect();
    StaticContentPool::new(items).unwrap()
}

pub fn history_pack() -> GamePack {
    let levels = vec![
        Level::new(ANCIENT_I, "Ancient I", ANCIENT, Difficulty::Easy, 8, 15, None).unwrap(),
        Level::new(
            ANCIENT_II,
            "Ancient II",
            ANCIENT,
            Difficulty::Medium,
            5,
            15,
            Some(UnlockRequirement {
                level_id: ANCIENT_I,
                min_score: 1_000,
            }),
        )
        .unwrap(),
        Level::new(MEDIEVAL_I, "Medieval I", MEDIEVAL, Difficulty::Easy, 4, 0, None).unwrap(),
    ];
    GamePack::new(
        Domain::History,
        vec![GameMode::Classic],
        LevelCatalog::new(Domain::History, levels).unwrap(),
        ComboLadder::standard(),
        8,
        ScoringConfig::default(),
        RankTable::new([(0, "Novice"), (5, "Chronicler"), (10, "Historian")]).unwrap(),
    )
    .unwrap()
}

pub fn engine(settings: EngineSettings) -> SessionEngine {
    engine_with_progress(settings, ProgressBook::new())
}

pub fn engine_with_progress(settings: EngineSettings, progress: ProgressBook) -> SessionEngine {
    SessionEngine::new(
        history_pack(),
        Arc::new(history_pool()),
        settings,
        SeededRng::new(42),
        progress,
    )
    .with_clock(fixed_clock())
}

/// Menu to level selection within `category`.
pub fn select_category(engine: &mut SessionEngine, category: Category) {
    assert!(engine.open().is_applied());
    assert!(engine.select_category(category).is_applied());
    assert_eq!(engine.phase(), Phase::LevelSelect);
}

pub fn correct_answer(engine: &SessionEngine) -> AnswerId {
    engine
        .snapshot()
        .challenge
        .expect("challenge on screen")
        .challenge
        .correct_answer_id()
}

pub fn wrong_answer(engine: &SessionEngine) -> AnswerId {
    engine
        .snapshot()
        .challenge
        .expect("challenge on screen")
        .challenge
        .options()
        .iter()
        .find(|o| !o.is_correct)
        .map(|o| o.id)
        .expect("a distractor")
}

/// Fires the pending advance, if the engine published one.
pub fn settle(engine: &mut SessionEngine) {
    if let Some(pending) = engine.snapshot().pending_advance {
        assert!(engine.advance(pending.token).is_applied());
    }
}

pub fn answer_correctly(engine: &mut SessionEngine, after_ms: i64) {
    engine.clock_mut().advance_ms(after_ms);
    let answer = correct_answer(engine);
    assert!(engine.submit_answer(Some(answer)).is_applied());
    settle(engine);
}

pub fn answer_wrongly(engine: &mut SessionEngine, after_ms: i64) {
    engine.clock_mut().advance_ms(after_ms);
    let answer = wrong_answer(engine);
    assert!(engine.submit_answer(Some(answer)).is_applied());
    settle(engine);
}

/// Plays a whole round of `level` answering everything right.
pub fn play_perfect_round(engine: &mut SessionEngine, level: LevelId) {
    assert!(engine.select_level(level).is_applied());
    while engine.phase() == Phase::Playing {
        answer_correctly(engine, 1_000);
    }
    assert_eq!(engine.phase(), Phase::Results);
}
