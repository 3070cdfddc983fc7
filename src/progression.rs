//! Diatonic progressions: the triad built on each degree of a major or minor
//! key.

use crate::catalog::{ChordDef, Pattern, DIMINISHED_TRIAD, MAJOR_TRIAD, MINOR_TRIAD};
use crate::collection::{chord, NoteCollection};
use crate::note::Note;
use crate::pitch::{KEY_COUNT, MAJOR_STEPS, MINOR_STEPS};
use crate::spelling::{SpellingError, SpellingTable};
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl Quality {
    pub const fn def(&self) -> &'static ChordDef {
        match self {
            Quality::Major => &MAJOR_TRIAD,
            Quality::Minor => &MINOR_TRIAD,
            Quality::Diminished => &DIMINISHED_TRIAD,
        }
    }

    pub fn pattern(&self) -> Pattern {
        Pattern::from(self.def())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quality::Major => "Maj",
            Quality::Minor => "min",
            Quality::Diminished => "dim",
        };
        f.write_str(label)
    }
}

impl Mode {
    pub const fn steps(&self) -> &'static [u8; 7] {
        match self {
            Mode::Major => &MAJOR_STEPS,
            Mode::Minor => &MINOR_STEPS,
        }
    }

    /// Triad quality on each scale degree.
    pub const fn qualities(&self) -> &'static [Quality; 7] {
        use Quality::*;
        match self {
            Mode::Major => &[Major, Minor, Minor, Major, Major, Minor, Diminished],
            Mode::Minor => &[Minor, Diminished, Major, Minor, Minor, Major, Major],
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "major" | "maj" | "ionian" => Some(Mode::Major),
            "minor" | "min" | "aeolian" => Some(Mode::Minor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Progression {
    mode: Mode,
    chords: Vec<NoteCollection>,
}

impl Progression {
    /// Builds the seven degree triads of `root`'s key.
    ///
    /// Each degree root moves up by the key's next step and by exactly one
    /// letter, so a minor key on C reaches Eb rather than D#.
    pub fn diatonic(table: &SpellingTable, root: Note, mode: Mode) -> Result<Self, SpellingError> {
        let mut chords = Vec::with_capacity(mode.qualities().len());
        let mut offset = 0u16;
        for (degree, quality) in mode.qualities().iter().enumerate() {
            let degree_root = if degree == 0 {
                root
            } else {
                offset += u16::from(mode.steps()[degree - 1]);
                let semitone = (u16::from(root.semitone()) + offset) % u16::from(KEY_COUNT);
                table.resolve(semitone as u8, root.letter().shift(degree as i32))?
            };
            chords.push(chord(table, degree_root, &quality.pattern())?);
        }
        Ok(Progression { mode, chords })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn chords(&self) -> &[NoteCollection] {
        &self.chords
    }
    pub fn qualities(&self) -> &'static [Quality; 7] {
        self.mode.qualities()
    }
    pub fn roots(&self) -> impl Iterator<Item = Note> + '_ {
        self.chords.iter().map(NoteCollection::root)
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, chord) in self.chords.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", chord.name())?;
        }
        Ok(())
    }
}
