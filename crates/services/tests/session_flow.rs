mod support;

use proptest::prelude::*;
use quiz_core::model::{EngineSettings, ProgressBook};
use services::{Phase, SessionEngine};
use support::*;

fn paced() -> EngineSettings {
    EngineSettings::new(0, 600).unwrap()
}

#[test]
fn eight_fast_correct_answers_make_a_perfect_round() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    assert!(engine.select_level(ANCIENT_I).is_applied());

    for _ in 0..7 {
        answer_correctly(&mut engine, 1_000);
    }
    engine.clock_mut().advance_ms(1_000);
    let answer = correct_answer(&engine);
    assert!(engine.submit_answer(Some(answer)).is_applied());
    let combo = engine.snapshot().combo;
    assert_eq!(combo.streak, 8);
    assert!((combo.multiplier - 2.5).abs() < f64::EPSILON);
    assert!(combo.on_fire);
    settle(&mut engine);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Results);
    let result = snapshot.last_result.expect("round result");
    assert_eq!(result.total, 8);
    assert_eq!(result.correct, 8);
    assert!((result.accuracy - 100.0).abs() < f64::EPSILON);
    assert_eq!(result.stars.value(), 3);
    assert!(result.perfect_round);
    assert!(result.bonus.perfect > 0);
    assert!(result.bonus.no_hints > 0);
    assert_eq!(result.highest_streak, 8);
    // 145 points per item before the combo ladder kicks in
    assert_eq!(result.item_points, 1_956);
    assert_eq!(result.score, 2_526);
    assert!(result.score > 8 * 100);
    assert_eq!(result.newly_learned.len(), 8);

    assert_eq!(snapshot.newly_unlocked, vec![ANCIENT_II]);
    assert!(snapshot.unlocked_levels.contains(&ANCIENT_II));
    assert_eq!(snapshot.rank.tier.title, "Chronicler");
    assert!(engine.is_dirty());
}

#[test]
fn next_level_follows_the_unlock() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    play_perfect_round(&mut engine, ANCIENT_I);

    assert!(engine.next_level().is_applied());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.level, Some(ANCIENT_II));
    assert_eq!(snapshot.challenge.unwrap().total, 5);
    assert!(snapshot.last_result.is_none());
}

#[test]
fn next_level_falls_back_to_level_select_when_locked() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    assert!(engine.select_level(ANCIENT_I).is_applied());
    while engine.phase() == Phase::Playing {
        answer_wrongly(&mut engine, 1_000);
    }

    let result = engine.last_result().expect("round result").clone();
    assert_eq!(result.correct, 0);
    assert_eq!(result.stars.value(), 0);
    assert!(!result.perfect_round);
    assert_eq!(result.score, result.bonus.total());
    assert!(engine.snapshot().newly_unlocked.is_empty());

    assert!(engine.next_level().is_applied());
    assert_eq!(engine.phase(), Phase::LevelSelect);
    assert!(!engine.select_level(ANCIENT_II).is_applied());
}

#[test]
fn next_level_needs_this_rounds_score_to_clear_the_bar() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    play_perfect_round(&mut engine, ANCIENT_I);
    assert!(engine.unlocked_levels().contains(&ANCIENT_II));

    assert!(engine.retry().is_applied());
    while engine.phase() == Phase::Playing {
        answer_wrongly(&mut engine, 1_000);
    }
    let result = engine.last_result().expect("round result");
    assert!(result.score < 1_000);

    assert!(engine.next_level().is_applied());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::LevelSelect);
    assert!(snapshot.unlocked_levels.contains(&ANCIENT_II));
    assert!(engine.select_level(ANCIENT_II).is_applied());
}

#[test]
fn last_level_of_a_category_has_no_next() {
    let mut engine = engine(paced());
    select_category(&mut engine, MEDIEVAL);
    play_perfect_round(&mut engine, MEDIEVAL_I);
    assert_eq!(engine.last_result().unwrap().total, 4);

    assert!(engine.next_level().is_applied());
    assert_eq!(engine.phase(), Phase::LevelSelect);
}

#[test]
fn retry_starts_over_on_the_same_level() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    play_perfect_round(&mut engine, ANCIENT_I);

    assert!(engine.retry().is_applied());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.level, Some(ANCIENT_I));
    assert_eq!(snapshot.running_score, 0);
    assert_eq!(snapshot.combo.streak, 0);
    assert_eq!(snapshot.challenge.unwrap().index, 0);
    assert_eq!(engine.progress().get(ANCIENT_I).unwrap().times_played(), 1);

    play_remaining(&mut engine);
    let level = engine.progress().get(ANCIENT_I).unwrap();
    assert_eq!(level.times_played(), 2);
    assert_eq!(level.times_perfect(), 2);
    assert_eq!(engine.progress().rounds_played(), 2);
    // the second round teaches nothing new
    assert!(engine.last_result().unwrap().newly_learned.is_empty());
}

#[test]
fn pause_and_resume_keep_results_and_combo() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    assert!(engine.select_level(ANCIENT_I).is_applied());
    for _ in 0..3 {
        answer_correctly(&mut engine, 500);
    }
    let before = engine.snapshot();

    assert!(engine.pause().is_applied());
    assert!(!engine.skip().is_applied());
    let paused = engine.snapshot();
    assert_eq!(paused.phase, Phase::Paused);
    assert_eq!(paused.combo, before.combo);
    assert_eq!(paused.running_score, before.running_score);

    assert!(engine.resume().is_applied());
    assert_eq!(engine.snapshot().combo.streak, 3);
    play_remaining(&mut engine);
    assert_eq!(engine.last_result().unwrap().challenges.len(), 8);
    assert_eq!(engine.last_result().unwrap().correct, 8);
}

#[test]
fn reset_mid_round_discards_round_state_only() {
    let mut engine = engine(paced());
    select_category(&mut engine, ANCIENT);
    assert!(engine.select_level(ANCIENT_I).is_applied());
    answer_correctly(&mut engine, 500);
    assert!(engine.pause().is_applied());

    assert!(engine.reset().is_applied());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::LevelSelect);
    assert!(snapshot.challenge.is_none());
    assert_eq!(snapshot.running_score, 0);
    assert_eq!(snapshot.combo.streak, 0);
    assert_eq!(engine.progress().rounds_played(), 0);
    assert!(!engine.is_dirty());
}

#[test]
fn skips_count_against_accuracy_but_not_as_wrong() {
    let mut engine = engine(EngineSettings::new(0, 0).unwrap());
    select_category(&mut engine, MEDIEVAL);
    assert!(engine.select_level(MEDIEVAL_I).is_applied());

    answer_correctly(&mut engine, 100);
    answer_correctly(&mut engine, 100);
    answer_correctly(&mut engine, 100);
    assert!(engine.skip().is_applied());

    let result = engine.last_result().unwrap();
    assert_eq!(result.skipped, 1);
    assert_eq!(result.wrong, 0);
    assert!((result.accuracy - 75.0).abs() < f64::EPSILON);
    assert_eq!(result.stars.value(), 1);
    assert!(!result.perfect_round);
    assert_eq!(result.bonus.perfect, 0);
    assert_eq!(
        engine.progress().get(MEDIEVAL_I).unwrap().times_completed(),
        1
    );
}

#[test]
fn stored_progress_keeps_levels_unlocked() {
    let mut first = engine(paced());
    select_category(&mut first, ANCIENT);
    play_perfect_round(&mut first, ANCIENT_I);
    let book: ProgressBook = first.progress().clone();

    let mut second = engine_with_progress(paced(), book);
    select_category(&mut second, ANCIENT);
    assert!(second.select_level(ANCIENT_II).is_applied());
}

fn play_remaining(engine: &mut SessionEngine) {
    while engine.phase() == Phase::Playing {
        answer_correctly(engine, 1_000);
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Correct,
    Wrong,
    Skip,
    HintThenCorrect,
}

fn moves() -> impl Strategy<Value = Vec<(Move, i64)>> {
    prop::collection::vec(
        (
            prop_oneof![
                Just(Move::Correct),
                Just(Move::Wrong),
                Just(Move::Skip),
                Just(Move::HintThenCorrect),
            ],
            0_i64..14_000,
        ),
        8,
    )
}

proptest! {
    #[test]
    fn round_score_is_items_plus_bonuses(script in moves()) {
        let mut engine = engine(EngineSettings::new(0, 0).unwrap());
        select_category(&mut engine, ANCIENT);
        prop_assert!(engine.select_level(ANCIENT_I).is_applied());

        let mut previous_multiplier = 1.0_f64;
        for (step, after_ms) in script {
            engine.clock_mut().advance_ms(after_ms);
            match step {
                Move::Correct => {
                    let answer = correct_answer(&engine);
                    prop_assert!(engine.submit_answer(Some(answer)).is_applied());
                }
                Move::Wrong => {
                    let answer = wrong_answer(&engine);
                    prop_assert!(engine.submit_answer(Some(answer)).is_applied());
                }
                Move::Skip => prop_assert!(engine.skip().is_applied()),
                Move::HintThenCorrect => {
                    prop_assert!(engine.use_hint().is_applied());
                    let answer = correct_answer(&engine);
                    prop_assert!(engine.submit_answer(Some(answer)).is_applied());
                }
            }
            if engine.phase() == Phase::Playing {
                let combo = engine.snapshot().combo;
                match step {
                    Move::Correct | Move::HintThenCorrect => {
                        prop_assert!(combo.multiplier >= previous_multiplier);
                    }
                    Move::Wrong | Move::Skip => {
                        prop_assert_eq!(combo.streak, 0);
                        prop_assert!((combo.multiplier - 1.0).abs() < f64::EPSILON);
                    }
                }
                previous_multiplier = combo.multiplier;
            }
        }

        prop_assert_eq!(engine.phase(), Phase::Results);
        let result = engine.last_result().unwrap();
        let items: u32 = result.challenges.iter().map(|r| r.points_earned).sum();
        prop_assert_eq!(result.item_points, items);
        prop_assert_eq!(result.score, items + result.bonus.total());
        prop_assert_eq!(result.bonus.streak, result.highest_streak * 15);
        prop_assert_eq!(result.total, result.correct + result.wrong + result.skipped);
        prop_assert_eq!(
            result.hints_used as usize,
            result.challenges.iter().filter(|r| r.hint_used).count()
        );
    }
}
