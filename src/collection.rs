use crate::catalog::{Catalog, Pattern, PatternKind};
use crate::note::{Note, FLAT};
use crate::pitch::{Letter, KEY_COUNT};
use crate::spelling::{SpellingError, SpellingTable};
use log::trace;
use std::fmt;

/// Spells the notes of a shape on `root`.
///
/// Each target semitone wraps around the top of the keyboard instead of
/// failing, so a chord rooted near B8 continues from octave 1. The letter of
/// every note is the root's letter moved by the matching letter offset, and
/// the first pair whose spelling was never registered aborts the build.
/// Only checked `Pattern`s get here, so the two offset lists are always the
/// same length.
pub(crate) fn spell_pattern(
    table: &SpellingTable,
    root: Note,
    pattern: &Pattern,
) -> Result<Vec<Note>, SpellingError> {
    let mut notes = Vec::with_capacity(pattern.len());
    notes.push(root);
    for (interval, core) in pattern.intervals().iter().zip(pattern.cores().iter()).skip(1) {
        let semitone = (u16::from(root.semitone()) + u16::from(*interval)) % u16::from(KEY_COUNT);
        let letter = root.letter().shift(i32::from(*core));
        notes.push(table.resolve(semitone as u8, letter)?);
    }
    Ok(notes)
}

/// A chord or scale: an ordered run of notes starting at its root.
#[derive(Debug, Clone)]
pub struct NoteCollection {
    kind: PatternKind,
    name: String,
    root: Note,
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn build(table: &SpellingTable, root: Note, pattern: &Pattern) -> Result<Self, SpellingError> {
        let notes = spell_pattern(table, root, pattern)?;
        let name = match pattern.kind() {
            PatternKind::Chord => format!("{}{}", root.name(), pattern.symbol()),
            PatternKind::Scale => format!("{} {}", root.name(), pattern.name()),
        };
        trace!("Spelled {} as {:?}", name, notes);
        Ok(NoteCollection {
            kind: pattern.kind(),
            name,
            root,
            notes,
        })
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }
    /// Display name: `Ebm`, `F#°7`, or `C major` for a scale.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn root(&self) -> Note {
        self.root
    }
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
    pub fn len(&self) -> usize {
        self.notes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Two collections are equal when they hold the same notes in the same order.
impl PartialEq for NoteCollection {
    fn eq(&self, other: &Self) -> bool {
        self.notes == other.notes
    }
}

impl Eq for NoteCollection {}

impl fmt::Display for NoteCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.name)?;
        for (idx, note) in self.notes.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", note)?;
        }
        write!(f, "]")
    }
}

pub fn chord(table: &SpellingTable, root: Note, pattern: &Pattern) -> Result<NoteCollection, SpellingError> {
    NoteCollection::build(table, root, pattern)
}

pub fn scale(table: &SpellingTable, root: Note, pattern: &Pattern) -> Result<NoteCollection, SpellingError> {
    NoteCollection::build(table, root, pattern)
}

/// The seven naturals of an octave.
pub fn core_notes(table: &SpellingTable, octave: u8) -> Result<Vec<Note>, SpellingError> {
    Letter::all()
        .iter()
        .map(|letter| table.resolve_by_name(&letter.as_char().to_string(), octave))
        .collect()
}

/// The natural and flat roots of an octave, in letter order. A root the
/// table cannot name (Cb8 would come from the missing C9) is reported in
/// its slot.
pub fn chord_roots(table: &SpellingTable, octave: u8) -> Vec<Result<Note, SpellingError>> {
    let mut roots = Vec::with_capacity(Letter::all().len() * 2);
    for letter in Letter::all() {
        let natural = letter.as_char().to_string();
        roots.push(table.resolve_by_name(&natural, octave));
        roots.push(table.resolve_by_name(&format!("{}{}", natural, FLAT), octave));
    }
    roots
}

/// Every catalog chord on every natural and flat root of an octave. Each
/// construction is reported on its own so one unspellable chord or missing
/// root does not hide the rest.
pub fn all_chords(
    table: &SpellingTable,
    catalog: &Catalog,
    octave: u8,
) -> Vec<Result<NoteCollection, SpellingError>> {
    let roots = chord_roots(table, octave);
    catalog
        .chords()
        .flat_map(|pattern| {
            roots.iter().map(move |root| match root {
                Ok(root) => chord(table, *root, pattern),
                Err(e) => Err(e.clone()),
            })
        })
        .collect()
}
