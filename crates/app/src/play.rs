//! Terminal host: a 1 Hz tick, deferred advances and stdin commands all
//! funnel into one `GameService`.

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};

use quiz_core::model::{
    Category, DisplayHint, GameMode, GamePack, Level, LevelCatalog, ProgressBook,
};
use services::{Ack, Command, GameService, Phase, SessionSnapshot};

/// What the host needs from the pack to turn typed numbers into commands.
pub struct PackInfo {
    modes: Vec<GameMode>,
    catalog: LevelCatalog,
}

impl PackInfo {
    pub fn from_pack(pack: &GamePack) -> Self {
        Self {
            modes: pack.modes().to_vec(),
            catalog: pack.catalog().clone(),
        }
    }

    fn levels_for(&self, category: Option<Category>) -> Vec<&Level> {
        self.catalog
            .levels()
            .iter()
            .filter(|level| category.is_none_or(|c| level.category() == c))
            .collect()
    }
}

enum Input {
    Command(Command),
    Help,
    Exit,
}

pub async fn run(game: &GameService, info: &PackInfo) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut armed: Option<(u64, Instant)> = None;
    apply(game, info, Command::Open).await?;

    loop {
        let snapshot = game.snapshot().await;
        // A paused session keeps its pending advance; it is re-armed on resume.
        armed = match snapshot.pending_advance {
            Some(pending) if snapshot.phase == Phase::Playing => match armed {
                Some((token, at)) if token == pending.token => Some((token, at)),
                _ => Some((pending.token, Instant::now() + pending.delay)),
            },
            _ => None,
        };
        let deadline = armed.map_or_else(|| Instant::now() + Duration::from_secs(3_600), |(_, at)| at);

        tokio::select! {
            _ = ticker.tick() => {
                if game.dispatch(Command::Tick).await?.is_applied() {
                    render_tick(&game.snapshot().await);
                }
            }
            () = tokio::time::sleep_until(deadline), if armed.is_some() => {
                if let Some((token, _)) = armed.take() {
                    apply(game, info, Command::Advance(token)).await?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse(&line, &snapshot, info) {
                    Some(Input::Exit) => break,
                    Some(Input::Help) => print_help(),
                    Some(Input::Command(command)) => {
                        apply(game, info, command).await?;
                        if command == Command::Resume {
                            ticker.reset();
                        }
                    }
                    None => println!("? (type h for help)"),
                }
            }
        }
    }
    Ok(())
}

async fn apply(game: &GameService, info: &PackInfo, command: Command) -> Result<()> {
    match game.dispatch(command).await? {
        Ack::Applied => render(&game.snapshot().await, info),
        Ack::Ignored(transition) => println!("  ({})", transition.reason),
    }
    Ok(())
}

fn parse(line: &str, snapshot: &SessionSnapshot, info: &PackInfo) -> Option<Input> {
    let word = line.trim().to_lowercase();
    let pick = word.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    let command = match (word.as_str(), snapshot.phase) {
        ("exit", _) => return Some(Input::Exit),
        ("help" | "?", _) => return Some(Input::Help),
        ("b" | "back", _) => Command::Back,
        ("reset", _) => Command::Reset,
        ("q" | "quit", _) => Command::Quit,
        ("" | "start", Phase::Menu) => Command::Open,
        (_, Phase::ModeSelect) => Command::SelectMode(*info.modes.get(pick?)?),
        (_, Phase::SubSelect) => Command::SelectCategory(*info.catalog.categories().get(pick?)?),
        (_, Phase::LevelSelect) => {
            Command::SelectLevel(info.levels_for(snapshot.category).get(pick?)?.id())
        }
        ("h" | "hint", Phase::Playing) => Command::UseHint,
        ("s" | "skip", Phase::Playing) => Command::Skip,
        ("p" | "pause", Phase::Playing) => Command::Pause,
        (_, Phase::Playing) => {
            let view = snapshot.challenge.as_ref()?;
            Command::SubmitAnswer(Some(view.challenge.options().get(pick?)?.id))
        }
        ("r" | "resume", Phase::Paused) => Command::Resume,
        ("r" | "retry", Phase::Results) => Command::Retry,
        ("n" | "next", Phase::Results) => Command::NextLevel,
        _ => return None,
    };
    Some(Input::Command(command))
}

fn print_help() {
    println!("  numbers pick an option, mode, category or level");
    println!("  h hint | s skip | p pause | r resume/retry | n next level");
    println!("  b back | reset | q quit to menu | exit");
}

fn render_tick(snapshot: &SessionSnapshot) {
    match snapshot.phase {
        Phase::Countdown => println!("  {}...", snapshot.countdown_secs),
        Phase::Playing => {
            if let Some(secs) = snapshot.remaining_secs {
                if secs <= 5 && snapshot.challenge.as_ref().is_some_and(|c| c.outcome.is_none()) {
                    println!("  {secs}s left");
                }
            }
        }
        _ => {}
    }
}

fn render(snapshot: &SessionSnapshot, info: &PackInfo) {
    match snapshot.phase {
        Phase::Menu => println!("\n== {} quiz == (press enter to start)", snapshot.domain),
        Phase::ModeSelect => {
            println!("\nChoose a mode:");
            for (i, mode) in info.modes.iter().enumerate() {
                println!("  {}. {mode:?}", i + 1);
            }
        }
        Phase::SubSelect => {
            println!("\nChoose a category:");
            for (i, category) in info.catalog.categories().iter().enumerate() {
                println!("  {}. {category}", i + 1);
            }
        }
        Phase::LevelSelect => {
            println!("\nChoose a level:");
            for (i, level) in info.levels_for(snapshot.category).iter().enumerate() {
                let lock = if snapshot.unlocked_levels.contains(&level.id()) {
                    ""
                } else {
                    " [locked]"
                };
                println!("  {}. {}{lock}", i + 1, level.name());
            }
        }
        Phase::Countdown => println!("\nGet ready... {}", snapshot.countdown_secs),
        Phase::Playing => render_challenge(snapshot),
        Phase::Paused => println!("  paused (r to resume, q to quit)"),
        Phase::Results => render_results(snapshot),
    }
}

fn render_challenge(snapshot: &SessionSnapshot) {
    let Some(view) = snapshot.challenge.as_ref() else {
        return;
    };
    if let Some(outcome) = &view.outcome {
        if outcome.is_correct {
            println!("  correct! +{} (streak {})", outcome.points_earned, snapshot.combo.streak);
        } else {
            let answer = view.challenge.correct_option().map_or("?", |o| o.text.as_str());
            println!("  the answer was {answer}");
        }
        if let Some(explanation) = view.challenge.explanation() {
            println!("  {explanation}");
        }
        return;
    }

    let challenge = &view.challenge;
    let fire = if snapshot.combo.on_fire { " on fire!" } else { "" };
    println!(
        "\n[{}/{}] score {} x{:.1}{fire}",
        view.index + 1,
        view.total,
        snapshot.running_score,
        snapshot.combo.multiplier
    );
    match challenge.display() {
        DisplayHint::Symbol(symbol) => println!("{}  ({symbol})", challenge.prompt()),
        DisplayHint::Text | DisplayHint::Year(_) => println!("{}", challenge.prompt()),
    }
    if view.hint_revealed {
        if let Some(hint) = challenge.hint() {
            println!("  hint: {hint}");
        }
    }
    for (i, option) in challenge.options().iter().enumerate() {
        println!("  {}. {}", i + 1, option.text);
    }
}

fn render_results(snapshot: &SessionSnapshot) {
    let Some(result) = snapshot.last_result.as_ref() else {
        return;
    };
    let stars = "*".repeat(usize::from(result.stars.value()));
    println!("\n== results == {stars}");
    println!(
        "  {}/{} correct ({:.0}%), {} skipped, best streak {}",
        result.correct, result.total, result.accuracy, result.skipped, result.highest_streak
    );
    println!(
        "  items {} + streak {} + speed {} + perfect {} + no hints {} = {}",
        result.item_points,
        result.bonus.streak,
        result.bonus.speed,
        result.bonus.perfect,
        result.bonus.no_hints,
        result.score
    );
    if !snapshot.newly_unlocked.is_empty() {
        println!("  unlocked {} new level(s)!", snapshot.newly_unlocked.len());
    }
    println!(
        "  rank: {} ({} learned)",
        snapshot.rank.tier.title, snapshot.rank.learned
    );
    println!("  r retry | n next level | q menu");
}

pub fn print_progress(pack: &GamePack, book: &ProgressBook) {
    println!("{} progress", pack.domain());
    for level in pack.catalog().levels() {
        match book.get(level.id()).filter(|p| p.is_unlocked()) {
            Some(progress) => println!(
                "  {:<32} best {:>5}  {:>3.0}%  {}  played {}",
                level.name(),
                progress.high_score(),
                progress.best_accuracy(),
                "*".repeat(usize::from(progress.stars().value())),
                progress.times_played()
            ),
            None => println!("  {:<32} locked", level.name()),
        }
    }
    let rank = book.rank(pack.ranks());
    println!(
        "rank: {} ({} items learned, {} rounds, {} points)",
        rank.tier.title,
        rank.learned,
        book.rounds_played(),
        book.total_score()
    );
    if let Some(next) = rank.next {
        println!("next rank: {} at {} items", next.title, next.min_learned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Domain;

    fn info() -> PackInfo {
        let (pack, _) = crate::packs::load(Domain::Geography).unwrap();
        PackInfo::from_pack(&pack)
    }

    fn snapshot_in(phase: Phase, category: Option<Category>) -> SessionSnapshot {
        let (pack, _) = crate::packs::load(Domain::Geography).unwrap();
        SessionSnapshot {
            domain: Domain::Geography,
            phase,
            mode: GameMode::Classic,
            category,
            level: None,
            countdown_secs: 0,
            challenge: None,
            remaining_secs: None,
            combo: Default::default(),
            running_score: 0,
            last_result: None,
            newly_unlocked: Vec::new(),
            pending_advance: None,
            unlocked_levels: Vec::new(),
            rank: ProgressBook::new().rank(pack.ranks()),
        }
    }

    #[test]
    fn numbers_map_to_phase_choices() {
        let info = info();
        let Some(Input::Command(command)) = parse("2", &snapshot_in(Phase::ModeSelect, None), &info)
        else {
            panic!("expected a command");
        };
        assert_eq!(command, Command::SelectMode(GameMode::Reverse));

        let europe = info.catalog.categories()[0];
        let Some(Input::Command(command)) =
            parse(" 2 ", &snapshot_in(Phase::LevelSelect, Some(europe)), &info)
        else {
            panic!("expected a command");
        };
        assert_eq!(command, Command::SelectLevel(info.levels_for(Some(europe))[1].id()));

        assert!(parse("9", &snapshot_in(Phase::ModeSelect, None), &info).is_none());
        assert!(parse("0", &snapshot_in(Phase::ModeSelect, None), &info).is_none());
    }

    #[test]
    fn words_are_phase_aware() {
        let info = info();
        assert!(matches!(
            parse("r", &snapshot_in(Phase::Paused, None), &info),
            Some(Input::Command(Command::Resume))
        ));
        assert!(matches!(
            parse("r", &snapshot_in(Phase::Results, None), &info),
            Some(Input::Command(Command::Retry))
        ));
        assert!(matches!(
            parse("exit", &snapshot_in(Phase::Playing, None), &info),
            Some(Input::Exit)
        ));
        assert!(matches!(
            parse("", &snapshot_in(Phase::Menu, None), &info),
            Some(Input::Command(Command::Open))
        ));
    }
}
