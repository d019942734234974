//! Small built-in content for the four games.

use quiz_core::Error;
use quiz_core::combo::ComboLadder;
use quiz_core::model::{
    Category, ContentItem, Difficulty, DisplayHint, Domain, Era, GameMode, GamePack, ItemId,
    Level, LevelCatalog, LevelId, RankTable, Region, ScienceField, StaticContentPool,
    UnlockRequirement, WordSet,
};
use quiz_core::scoring::{PerfectPolicy, ScoringConfig};

/// Prompt, answer, hint.
type Entry = (&'static str, &'static str, &'static str);

/// Pack and content pool for `domain`.
///
/// # Errors
///
/// Returns `Error` if the built-in tables fail validation.
pub fn load(domain: Domain) -> Result<(GamePack, StaticContentPool), Error> {
    match domain {
        Domain::Geography => geography(),
        Domain::History => history(),
        Domain::Science => science(),
        Domain::Vocabulary => vocabulary(),
    }
}

struct PoolBuilder {
    next_id: u64,
    items: Vec<ContentItem>,
}

impl PoolBuilder {
    fn new() -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
        }
    }

    fn add(
        &mut self,
        category: Category,
        difficulty: Difficulty,
        entries: &[Entry],
        display: impl Fn(&Entry) -> DisplayHint,
    ) -> Result<&mut Self, Error> {
        for entry in entries {
            let (prompt, answer, hint) = *entry;
            let item = ContentItem::new(
                ItemId::new(self.next_id),
                category,
                difficulty,
                prompt,
                answer,
            )?
            .with_hint(hint)
            .with_display(display(entry));
            self.items.push(item);
            self.next_id += 1;
        }
        Ok(self)
    }

    fn build(self) -> Result<StaticContentPool, Error> {
        Ok(StaticContentPool::new(self.items)?)
    }
}

fn text(_: &Entry) -> DisplayHint {
    DisplayHint::Text
}

fn requires(level: u64, min_score: u32) -> Option<UnlockRequirement> {
    Some(UnlockRequirement {
        level_id: LevelId::new(level),
        min_score,
    })
}

//
// ─── GEOGRAPHY ─────────────────────────────────────────────────────────────────
//

const EUROPE_CAPITALS: &[Entry] = &[
    ("France", "Paris", "City of light"),
    ("Germany", "Berlin", "Its wall fell in 1989"),
    ("Spain", "Madrid", "Home of the Prado"),
    ("Italy", "Rome", "Eternal city"),
    ("Portugal", "Lisbon", "Built on seven hills by the Tagus"),
    ("Norway", "Oslo", "Hosts the Nobel Peace Prize"),
    ("Poland", "Warsaw", "Stands on the Vistula"),
    ("Greece", "Athens", "Named after a goddess"),
];

const EUROPE_HARD: &[Entry] = &[
    ("Slovenia", "Ljubljana", "Its symbol is a dragon"),
    ("Moldova", "Chisinau", "Starts with Ch"),
    ("Latvia", "Riga", "Largest city of the Baltics"),
    ("Albania", "Tirana", "Starts with T"),
];

const ASIA_CAPITALS: &[Entry] = &[
    ("Japan", "Tokyo", "Formerly Edo"),
    ("Nepal", "Kathmandu", "Gateway to Everest"),
    ("Thailand", "Bangkok", "City of angels"),
    ("Vietnam", "Hanoi", "City by the Red River"),
    ("Mongolia", "Ulaanbaatar", "Coldest capital"),
    ("South Korea", "Seoul", "On the Han river"),
];

fn geography() -> Result<(GamePack, StaticContentPool), Error> {
    let europe = Category::Region(Region::Europe);
    let asia = Category::Region(Region::Asia);

    let mut pool = PoolBuilder::new();
    pool.add(europe, Difficulty::Easy, EUROPE_CAPITALS, text)?
        .add(europe, Difficulty::Hard, EUROPE_HARD, text)?
        .add(asia, Difficulty::Easy, ASIA_CAPITALS, text)?;

    let levels = vec![
        Level::new(LevelId::new(1), "Europe: capitals", europe, Difficulty::Easy, 6, 15, None)?,
        Level::new(
            LevelId::new(2),
            "Europe: tricky capitals",
            europe,
            Difficulty::Hard,
            8,
            12,
            requires(1, 900),
        )?,
        Level::new(LevelId::new(3), "Asia: capitals", asia, Difficulty::Easy, 6, 15, None)?,
    ];
    let pack = GamePack::new(
        Domain::Geography,
        vec![GameMode::Classic, GameMode::Reverse, GameMode::Practice],
        LevelCatalog::new(Domain::Geography, levels)?,
        ComboLadder::standard(),
        6,
        ScoringConfig::default(),
        RankTable::new([(0, "Tourist"), (8, "Traveller"), (15, "Explorer"), (25, "Cartographer")])?,
    )?;
    Ok((pack, pool.build()?))
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

const ANCIENT_EVENTS: &[Entry] = &[
    ("Battle of Marathon", "490 BC", "Persian wars"),
    ("Founding of Rome", "753 BC", "Romulus and Remus"),
    ("Death of Alexander the Great", "323 BC", "In Babylon"),
    ("Assassination of Julius Caesar", "44 BC", "Ides of March"),
    ("Fall of the Western Roman Empire", "476 AD", "Romulus Augustulus deposed"),
    ("First Olympic Games", "776 BC", "Held at Olympia"),
];

const MODERN_EVENTS: &[Entry] = &[
    ("Storming of the Bastille", "1789", "French Revolution"),
    ("Battle of Waterloo", "1815", "Napoleon's last battle"),
    ("Start of World War I", "1914", "Sarajevo"),
    ("Moon landing", "1969", "Apollo 11"),
    ("Fall of the Berlin Wall", "1989", "November"),
    ("End of World War II", "1945", "V-E and V-J day"),
];

fn year_of(entry: &Entry) -> DisplayHint {
    let (_, answer, _) = *entry;
    let digits: String = answer.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<i32>() {
        Ok(year) if answer.ends_with("BC") => DisplayHint::Year(-year),
        Ok(year) => DisplayHint::Year(year),
        Err(_) => DisplayHint::Text,
    }
}

fn history() -> Result<(GamePack, StaticContentPool), Error> {
    let ancient = Category::Era(Era::Ancient);
    let modern = Category::Era(Era::Modern);

    let mut pool = PoolBuilder::new();
    pool.add(ancient, Difficulty::Medium, ANCIENT_EVENTS, year_of)?
        .add(modern, Difficulty::Easy, MODERN_EVENTS, year_of)?;

    let levels = vec![
        Level::new(LevelId::new(1), "Modern milestones", modern, Difficulty::Easy, 6, 20, None)?,
        Level::new(LevelId::new(2), "Antiquity", ancient, Difficulty::Medium, 6, 20, None)?,
        Level::new(
            LevelId::new(3),
            "Antiquity against the clock",
            ancient,
            Difficulty::Expert,
            6,
            8,
            requires(2, 1_200),
        )?,
    ];
    let pack = GamePack::new(
        Domain::History,
        vec![GameMode::Classic, GameMode::Practice],
        LevelCatalog::new(Domain::History, levels)?,
        ComboLadder::standard(),
        8,
        ScoringConfig::default().with_perfect_policy(PerfectPolicy::SkipsAllowed),
        RankTable::new([(0, "Novice"), (6, "Chronicler"), (12, "Historian")])?,
    )?;
    Ok((pack, pool.build()?))
}

//
// ─── SCIENCE ───────────────────────────────────────────────────────────────────
//

const PHYSICS: &[Entry] = &[
    ("Unit of force", "Newton", "Named after an apple story"),
    ("Unit of electrical resistance", "Ohm", "Symbol is omega"),
    ("Speed of light in vacuum, km/s", "300000", "Roughly"),
    ("Particle with no electric charge", "Neutron", "Lives in the nucleus"),
    ("Unit of power", "Watt", "Steam engine pioneer"),
];

const CHEMISTRY: &[Entry] = &[
    ("Gold", "Au", "From Latin aurum"),
    ("Iron", "Fe", "From Latin ferrum"),
    ("Sodium", "Na", "From Latin natrium"),
    ("Potassium", "K", "From Latin kalium"),
    ("Silver", "Ag", "From Latin argentum"),
    ("Lead", "Pb", "From Latin plumbum"),
];

fn symbol(entry: &Entry) -> DisplayHint {
    let (_, answer, _) = *entry;
    DisplayHint::Symbol(answer.to_owned())
}

fn science() -> Result<(GamePack, StaticContentPool), Error> {
    let physics = Category::Field(ScienceField::Physics);
    let chemistry = Category::Field(ScienceField::Chemistry);

    let mut pool = PoolBuilder::new();
    pool.add(physics, Difficulty::Easy, PHYSICS, text)?
        .add(chemistry, Difficulty::Medium, CHEMISTRY, symbol)?;

    let levels = vec![
        Level::new(LevelId::new(1), "Physics basics", physics, Difficulty::Easy, 5, 20, None)?,
        Level::new(
            LevelId::new(2),
            "Element symbols",
            chemistry,
            Difficulty::Medium,
            6,
            15,
            requires(1, 600),
        )?,
    ];
    let pack = GamePack::new(
        Domain::Science,
        vec![GameMode::Classic],
        LevelCatalog::new(Domain::Science, levels)?,
        ComboLadder::new([(10, 3.0), (6, 2.0), (3, 1.5)])?,
        6,
        ScoringConfig::default(),
        RankTable::new([(0, "Lab assistant"), (5, "Researcher"), (10, "Professor")])?,
    )?;
    Ok((pack, pool.build()?))
}

//
// ─── VOCABULARY ────────────────────────────────────────────────────────────────
//

const EVERYDAY: &[Entry] = &[
    ("Happy", "Feeling joy", "Opposite of sad"),
    ("Tired", "Needing rest", "After a long day"),
    ("Brave", "Showing courage", "A knight might be"),
    ("Quiet", "Making little noise", "Libraries ask for it"),
    ("Tidy", "Neat and in order", "A clean room"),
];

const ACADEMIC: &[Entry] = &[
    ("Ubiquitous", "Found everywhere", "Latin ubique"),
    ("Ephemeral", "Lasting a very short time", "Like a mayfly"),
    ("Pragmatic", "Dealing with things practically", "Not idealistic"),
    ("Meticulous", "Showing great attention to detail", "Very careful"),
    ("Ambiguous", "Open to more than one meaning", "Not clear-cut"),
    ("Candid", "Truthful and straightforward", "Frank"),
];

fn vocabulary() -> Result<(GamePack, StaticContentPool), Error> {
    let everyday = Category::WordSet(WordSet::Everyday);
    let academic = Category::WordSet(WordSet::Academic);

    let mut pool = PoolBuilder::new();
    pool.add(everyday, Difficulty::Easy, EVERYDAY, text)?
        .add(academic, Difficulty::Hard, ACADEMIC, text)?;

    let levels = vec![
        Level::new(LevelId::new(1), "Everyday words", everyday, Difficulty::Easy, 5, 20, None)?,
        Level::new(
            LevelId::new(2),
            "Academic words",
            academic,
            Difficulty::Hard,
            6,
            20,
            requires(1, 700),
        )?,
    ];
    let pack = GamePack::new(
        Domain::Vocabulary,
        vec![GameMode::Classic, GameMode::Reverse],
        LevelCatalog::new(Domain::Vocabulary, levels)?,
        ComboLadder::standard(),
        8,
        ScoringConfig::default(),
        RankTable::new([(0, "Reader"), (5, "Wordsmith"), (10, "Lexicographer")])?,
    )?;
    Ok((pack, pool.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::generator::ChallengeGenerator;
    use quiz_core::rng::SeededRng;

    #[test]
    fn every_builtin_pack_generates_every_level() {
        for domain in Domain::ALL {
            let (pack, pool) = load(domain).unwrap();
            assert_eq!(pack.domain(), domain);
            let mut generator = ChallengeGenerator::new(SeededRng::new(3));
            for level in pack.catalog().levels() {
                for mode in pack.modes() {
                    let challenges = generator.generate(level, *mode, &pool).unwrap();
                    assert_eq!(challenges.len() as u32, level.question_count());
                }
            }
        }
    }

    #[test]
    fn bc_years_are_negative() {
        assert_eq!(
            year_of(&("Founding of Rome", "753 BC", "")),
            DisplayHint::Year(-753)
        );
        assert_eq!(year_of(&("Moon landing", "1969", "")), DisplayHint::Year(1969));
    }
}
