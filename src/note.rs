use crate::const_try;
use crate::pitch::{
    check_octave, check_semitone, semitone_frequency, DomainError, Letter, SEMITONES_PER_OCTAVE,
};
use crate::utils::wrap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const SHARP: char = '#';
pub const FLAT: char = 'b';

/// A spelled pitch on the keyboard.
///
/// Identity is the pair (letter, semitone): `B#4` and `C4` name the same key
/// but are different notes, while the accidental count is only a rendering
/// of how far the semitone sits from the letter's natural.
#[derive(Copy, Clone, Debug)]
pub struct Note {
    letter: Letter,
    semitone: u8,
    accidentals: i8,
}

impl Note {
    pub(crate) const fn from_parts(letter: Letter, semitone: u8, accidentals: i8) -> Self {
        Self {
            letter,
            semitone,
            accidentals,
        }
    }

    /// The natural `letter` in the given octave (octave 1 starts at semitone 0).
    pub const fn natural(letter: Letter, octave: u8) -> Result<Self, DomainError> {
        let octave = const_try!(check_octave(octave));
        let raw = (octave as i32 - 1) * SEMITONES_PER_OCTAVE as i32 + letter.natural_offset() as i32;
        let semitone = const_try!(check_semitone(raw));
        Ok(Note::from_parts(letter, semitone, 0))
    }

    /// Sharp-biased spelling of a semitone: naturals where possible, otherwise
    /// the lower letter with one sharp.
    pub const fn chromatic(semitone: u8) -> Result<Self, DomainError> {
        let semitone = const_try!(check_semitone(semitone as i32));
        let pitch_class = semitone % SEMITONES_PER_OCTAVE;
        let letter = Letter::chromatic(pitch_class);
        let accidentals = pitch_class as i8 - letter.natural_offset() as i8;
        Ok(Note::from_parts(letter, semitone, accidentals))
    }

    /// Spells `semitone` with `letter`. The accidental count is the distance
    /// from the letter's natural, taken the short way around the octave, so it
    /// always lies in `-6..=5`.
    pub const fn spelled(letter: Letter, semitone: u8) -> Result<Self, DomainError> {
        let semitone = const_try!(check_semitone(semitone as i32));
        let pitch_class = (semitone % SEMITONES_PER_OCTAVE) as i32;
        let diff = pitch_class - letter.natural_offset() as i32;
        let octave = SEMITONES_PER_OCTAVE as i32;
        let accidentals = wrap(diff + octave / 2, octave) - octave / 2;
        Ok(Note::from_parts(letter, semitone, accidentals as i8))
    }

    pub const fn letter(&self) -> Letter {
        self.letter
    }
    /// Index of the core letter, `0` for C through `6` for B.
    pub const fn core(&self) -> u8 {
        self.letter.as_u8()
    }
    pub const fn semitone(&self) -> u8 {
        self.semitone
    }
    pub const fn octave(&self) -> u8 {
        self.semitone / SEMITONES_PER_OCTAVE + 1
    }
    /// Signed accidental count: positive for sharps, negative for flats.
    pub const fn accidentals(&self) -> i8 {
        self.accidentals
    }

    /// Letter plus accidental marks, without the octave (`"Eb"`, `"F##"`).
    pub fn name(&self) -> String {
        let mut name = String::with_capacity(1 + self.accidentals.unsigned_abs() as usize);
        name.push(self.letter.as_char());
        name.push_str(&accidental_marks(self.accidentals));
        name
    }

    /// The same spelling moved into another octave.
    pub fn with_octave(self, octave: u8) -> Result<Self, DomainError> {
        let octave = check_octave(octave)?;
        let shift = (i32::from(octave) - i32::from(self.octave())) * i32::from(SEMITONES_PER_OCTAVE);
        let semitone = check_semitone(i32::from(self.semitone) + shift)?;
        Ok(Note { semitone, ..self })
    }

    pub fn frequency(&self, reference: f64) -> Result<f64, DomainError> {
        semitone_frequency(self.semitone, reference)
    }
}

/// Frequency of a note under the given A4 reference pitch.
pub fn frequency_of(note: &Note, reference: f64) -> Result<f64, DomainError> {
    note.frequency(reference)
}

pub fn accidental_marks(count: i8) -> String {
    let mark = if count < 0 { FLAT } else { SHARP };
    std::iter::repeat(mark)
        .take(count.unsigned_abs() as usize)
        .collect()
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.letter == other.letter && self.semitone == other.semitone
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.letter.hash(state);
        self.semitone.hash(state);
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.semitone, self.letter).cmp(&(other.semitone, other.letter))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}
