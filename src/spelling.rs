//! The spelling table: every (semitone, letter) pair reachable from a natural
//! with a bounded number of accidentals, indexed both by pair and by the
//! octave-qualified name.

use crate::config::Config;
use crate::note::Note;
use crate::pitch::{check_semitone, DomainError, Letter, KEY_COUNT, SEMITONES_PER_OCTAVE};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use thiserror::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpellingError {
    #[error("No spelling of semitone {semitone} uses the letter {letter:?} within {limit} accidentals.")]
    Unspellable {
        semitone: u8,
        letter: Letter,
        limit: u8,
    },
    #[error("Semitone {semitone} has no registered spelling.")]
    EmptySemitone { semitone: u8 },
    #[error("Unknown note name {name:?} in octave {octave}.")]
    UnknownName { name: String, octave: u8 },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

static SHARED: Lazy<SpellingTable> = Lazy::new(SpellingTable::standard);

#[derive(Debug, Clone, PartialEq)]
pub struct SpellingTable {
    accidental_limit: u8,
    octaves: (u8, u8),
    by_name: BTreeMap<String, Note>,
    by_semitone: Vec<BTreeMap<Letter, Note>>,
}

impl SpellingTable {
    /// Builds a table for the given configuration.
    pub fn build(config: &Config) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self::populate(
            config.accidental_limit,
            config.min_octave,
            config.max_octave,
        ))
    }

    /// The table for the default configuration: octaves 1-8, up to three
    /// sharps or flats.
    pub fn standard() -> Self {
        let config = Config::default();
        Self::populate(
            config.accidental_limit,
            config.min_octave,
            config.max_octave,
        )
    }

    /// A process-wide standard table, built on first use.
    pub fn shared() -> &'static SpellingTable {
        &SHARED
    }

    fn populate(accidental_limit: u8, min_octave: u8, max_octave: u8) -> Self {
        let mut table = SpellingTable {
            accidental_limit,
            octaves: (min_octave, max_octave),
            by_name: BTreeMap::new(),
            by_semitone: vec![BTreeMap::new(); KEY_COUNT as usize],
        };
        let limit = i32::from(accidental_limit);
        for octave in min_octave..=max_octave {
            let base = i32::from(octave - 1) * i32::from(SEMITONES_PER_OCTAVE);
            for letter in Letter::all() {
                let natural = base + i32::from(letter.natural_offset());
                for offset in -limit..=limit {
                    let semitone = match check_semitone(natural + offset) {
                        Ok(st) => st,
                        Err(_) => continue,
                    };
                    table.insert(Note::from_parts(*letter, semitone, offset as i8));
                }
            }
        }
        debug!(
            "Built spelling table for octaves {}..={} with {} accidentals: {} spellings.",
            min_octave,
            max_octave,
            accidental_limit,
            table.by_name.len()
        );
        table
    }

    fn insert(&mut self, note: Note) {
        self.by_name.insert(note.to_string(), note);
        self.by_semitone[note.semitone() as usize].insert(note.letter(), note);
    }

    pub fn accidental_limit(&self) -> u8 {
        self.accidental_limit
    }

    pub fn octave_range(&self) -> (u8, u8) {
        self.octaves
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The registered note spelling `semitone` with `letter`.
    pub fn resolve(&self, semitone: u8, letter: Letter) -> Result<Note, SpellingError> {
        let semitone = check_semitone(i32::from(semitone))?;
        self.by_semitone
            .get(semitone as usize)
            .and_then(|spellings| spellings.get(&letter))
            .copied()
            .ok_or(SpellingError::Unspellable {
                semitone,
                letter,
                limit: self.accidental_limit,
            })
    }

    /// Looks up a spelled name such as `"Eb"` or `"F##"` in an octave.
    pub fn resolve_by_name(&self, name: &str, octave: u8) -> Result<Note, SpellingError> {
        let key = format!("{}{}", name, octave);
        self.by_name
            .get(&key)
            .copied()
            .ok_or_else(|| SpellingError::UnknownName {
                name: name.to_owned(),
                octave,
            })
    }

    /// Every registered spelling of a semitone, ordered by letter.
    pub fn spellings(&self, semitone: u8) -> impl Iterator<Item = &Note> + '_ {
        self.by_semitone
            .get(semitone as usize)
            .into_iter()
            .flat_map(|spellings| spellings.values())
    }

    /// The spelling of a semitone with the fewest accidentals; sharps win ties.
    pub fn canonical(&self, semitone: u8) -> Result<Note, SpellingError> {
        let semitone = check_semitone(i32::from(semitone))?;
        self.spellings(semitone)
            .min_by_key(|note| (note.accidentals().unsigned_abs(), note.accidentals() < 0))
            .copied()
            .ok_or(SpellingError::EmptySemitone { semitone })
    }

    /// All entries keyed by octave-qualified name.
    pub fn names(&self) -> impl Iterator<Item = (&str, &Note)> + '_ {
        self.by_name.iter().map(|(name, note)| (name.as_str(), note))
    }

    /// All entries as (semitone, letter, note), ordered by semitone then letter.
    pub fn entries(&self) -> impl Iterator<Item = (u8, Letter, &Note)> + '_ {
        self.by_semitone
            .iter()
            .enumerate()
            .flat_map(|(semitone, spellings)| {
                spellings
                    .iter()
                    .map(move |(letter, note)| (semitone as u8, *letter, note))
            })
    }
}

impl Default for SpellingTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{IS_LETTER_ADVANCE, LETTER_COUNT};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_is_idempotent() {
        let first = SpellingTable::standard();
        let second = SpellingTable::build(&Config::default()).unwrap();
        assert_eq!(first, second);
        let first_names: Vec<_> = first
            .names()
            .map(|(name, note)| (name.to_owned(), note.name()))
            .collect();
        let second_names: Vec<_> = second
            .names()
            .map(|(name, note)| (name.to_owned(), note.name()))
            .collect();
        assert_eq!(first_names, second_names);
        assert_eq!(&first, SpellingTable::shared());
    }

    #[test]
    fn test_indexes_agree() {
        let table = SpellingTable::standard();
        assert_eq!(table.len(), table.entries().count());
        for (name, note) in table.names() {
            assert_eq!(name, note.to_string());
            let found = table.resolve(note.semitone(), note.letter()).unwrap();
            assert_eq!(*note, found);
            assert_eq!(note.accidentals(), found.accidentals());
        }
        for (semitone, letter, note) in table.entries() {
            assert_eq!(semitone, note.semitone());
            assert_eq!(letter, note.letter());
            let by_name = table.resolve_by_name(&note.name(), note.octave()).unwrap();
            assert_eq!(*note, by_name);
        }
    }

    #[test]
    fn test_every_semitone_is_covered() {
        let table = SpellingTable::standard();
        for semitone in 0..KEY_COUNT {
            assert!(table.spellings(semitone).count() > 0, "semitone {}", semitone);
            let natural = Note::chromatic(semitone).unwrap();
            assert_eq!(natural, table.resolve(semitone, natural.letter()).unwrap());
        }
    }

    #[test]
    fn test_spellings_stay_near_their_natural() {
        let table = SpellingTable::standard();
        for (semitone, letter, note) in table.entries() {
            assert!(note.accidentals().unsigned_abs() <= table.accidental_limit());
            let pitch_class = i32::from(semitone % SEMITONES_PER_OCTAVE);
            let distance = (pitch_class - i32::from(letter.natural_offset())).rem_euclid(12);
            let distance = distance.min(12 - distance);
            assert!(distance <= 3, "{} at {}", note, semitone);
        }
        // A chromatic walk never needs more letters than the advance table allows.
        let advances = IS_LETTER_ADVANCE.iter().filter(|adv| **adv).count();
        assert_eq!(LETTER_COUNT as usize, advances);
    }

    #[test]
    fn test_lookup_by_name() {
        let table = SpellingTable::standard();
        let c4 = table.resolve_by_name("C", 4).unwrap();
        assert_eq!(36, c4.semitone());
        let eb4 = table.resolve_by_name("Eb", 4).unwrap();
        assert_eq!(39, eb4.semitone());
        assert_eq!(Letter::E, eb4.letter());
        let fsss = table.resolve_by_name("F###", 4).unwrap();
        assert_eq!(44, fsss.semitone());
        // Octave numbers follow the sounding pitch.
        let cb3 = table.resolve_by_name("Cb", 3).unwrap();
        assert_eq!(35, cb3.semitone());
        let bs4 = table.resolve_by_name("B#", 4).unwrap();
        assert_eq!(36, bs4.semitone());

        assert!(table.resolve_by_name("H", 4).is_err());
        assert!(table.resolve_by_name("C", 9).is_err());
        assert!(table.resolve_by_name("C", 0).is_err());
        assert!(table.resolve_by_name("C####", 4).is_err());
        assert!(table.resolve_by_name("B#", 1).is_err());
    }

    #[test]
    fn test_unspellable_pairs() {
        let table = SpellingTable::standard();
        // E quadruple-sharp would be needed to name G#4 with an E.
        let err = table.resolve(44, Letter::E).unwrap_err();
        assert_eq!(
            SpellingError::Unspellable {
                semitone: 44,
                letter: Letter::E,
                limit: 3
            },
            err
        );
        assert!(matches!(
            table.resolve(96, Letter::C),
            Err(SpellingError::Domain(DomainError::SemitoneOutOfRange { found: 96, .. }))
        ));
        // The bottom and top of the keyboard lose their out-of-range neighbours.
        assert_eq!("Dbb", table.resolve(0, Letter::D).unwrap().name());
        assert!(table.resolve(0, Letter::B).is_err());
        assert_eq!("A##", table.resolve(95, Letter::A).unwrap().name());
        assert!(table.resolve(95, Letter::C).is_err());
    }

    #[test]
    fn test_canonical() {
        let table = SpellingTable::standard();
        assert_eq!("C", table.canonical(36).unwrap().name());
        assert_eq!("C#", table.canonical(37).unwrap().name());
        assert_eq!("F#", table.canonical(42).unwrap().name());
        assert_eq!("B", table.canonical(47).unwrap().name());
        assert!(matches!(
            table.canonical(96),
            Err(SpellingError::Domain(DomainError::SemitoneOutOfRange { found: 96, .. }))
        ));
    }

    #[test]
    fn test_configured_limits() {
        let config = Config {
            accidental_limit: 1,
            min_octave: 3,
            max_octave: 5,
            ..Config::default()
        };
        let table = SpellingTable::build(&config).unwrap();
        assert_eq!(1, table.accidental_limit());
        assert_eq!((3, 5), table.octave_range());
        assert!(table.resolve_by_name("Ebb", 4).is_err());
        assert!(table.resolve_by_name("Eb", 4).is_ok());
        assert!(table.resolve_by_name("C", 2).is_err());
        assert!(table.resolve(40, Letter::F).is_ok());
        assert!(table.resolve(41, Letter::G).is_err());

        let bad = Config {
            accidental_limit: 9,
            ..Config::default()
        };
        assert!(SpellingTable::build(&bad).is_err());
    }
}
