//! The pitch space: octave geometry, core letters, and conversions between
//! semitone indices, piano key numbers, and frequencies.

use crate::const_try;
use crate::utils::wrap;
use thiserror::*;

pub const SEMITONES_PER_OCTAVE: u8 = 12;
pub const LETTER_COUNT: u8 = 7;
pub const OCTAVE_COUNT: u8 = 8;
pub const MIN_OCTAVE: u8 = 1;
pub const MAX_OCTAVE: u8 = OCTAVE_COUNT;

/// Number of semitone slots on the keyboard; valid semitones are `0..KEY_COUNT`.
pub const KEY_COUNT: u8 = SEMITONES_PER_OCTAVE * OCTAVE_COUNT;

pub const DEFAULT_REFERENCE_PITCH: f64 = 440.0;

/// Piano key number of A4, the reference pitch.
pub const REFERENCE_KEY: i32 = 49;

/// Piano key number of semitone 0 (C1).
pub const FIRST_KEY: i32 = 4;

/// Marks the positions inside an octave after which the next semitone up
/// belongs to the next letter (C# -> D, E -> F, ...).
pub const IS_LETTER_ADVANCE: [bool; 12] = [
    false, true, false, true, true, false, true, false, true, false, true, true,
];

pub const MAJOR_STEPS: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];
pub const MINOR_STEPS: [u8; 7] = [2, 1, 2, 2, 1, 2, 2];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Semitone out of range: expected a value in [0..{max}), found {found}.")]
    SemitoneOutOfRange { found: i32, max: u8 },
    #[error("Octave out of range: expected a value in [{min}..={max}], found {found}.")]
    OctaveOutOfRange { found: u8, min: u8, max: u8 },
    #[error("Letter index out of range: expected a value in [0..7), found {found}.")]
    LetterOutOfRange { found: u8 },
    #[error("Frequency {found} Hz does not map to a key number.")]
    InvalidFrequency { found: f64 },
    #[error("Reference pitch {found} Hz must be finite and positive.")]
    InvalidReferencePitch { found: f64 },
    #[error("Accidental limit {found} is larger than the maximum of {max}.")]
    AccidentalLimit { found: u8, max: u8 },
}

pub const fn check_semitone(raw: i32) -> Result<u8, DomainError> {
    if raw < 0 || raw >= KEY_COUNT as i32 {
        Err(DomainError::SemitoneOutOfRange {
            found: raw,
            max: KEY_COUNT,
        })
    } else {
        Ok(raw as u8)
    }
}

pub const fn check_octave(raw: u8) -> Result<u8, DomainError> {
    if raw < MIN_OCTAVE || raw > MAX_OCTAVE {
        Err(DomainError::OctaveOutOfRange {
            found: raw,
            min: MIN_OCTAVE,
            max: MAX_OCTAVE,
        })
    } else {
        Ok(raw)
    }
}

/// One of the seven natural note names, independent of any accidental.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const fn all() -> &'static [Letter] {
        &[
            Letter::C,
            Letter::D,
            Letter::E,
            Letter::F,
            Letter::G,
            Letter::A,
            Letter::B,
        ]
    }
    pub const fn from_u8(raw: u8) -> Self {
        match raw % LETTER_COUNT {
            0 => Letter::C,
            1 => Letter::D,
            2 => Letter::E,
            3 => Letter::F,
            4 => Letter::G,
            5 => Letter::A,
            // Always 6
            _ => Letter::B,
        }
    }
    pub const fn from_index(raw: u8) -> Result<Self, DomainError> {
        if raw >= LETTER_COUNT {
            Err(DomainError::LetterOutOfRange { found: raw })
        } else {
            Ok(Letter::from_u8(raw))
        }
    }
    pub const fn as_u8(&self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }
    pub const fn shift(&self, offset: i32) -> Self {
        let raw = wrap(self.as_u8() as i32 + offset, LETTER_COUNT as i32);
        Letter::from_u8(raw as u8)
    }
    /// Position of the natural inside an octave.
    pub const fn natural_offset(&self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }
    /// The letter a chromatic (sharp-biased) spelling uses for a pitch class.
    pub const fn chromatic(pitch_class: u8) -> Self {
        let pitch_class = pitch_class % SEMITONES_PER_OCTAVE;
        let mut advances = 0;
        let mut idx = 0;
        while idx < pitch_class as usize {
            if IS_LETTER_ADVANCE[idx] {
                advances += 1;
            }
            idx += 1;
        }
        Letter::from_u8(advances)
    }
    pub const fn as_char(&self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// Semitone offsets of the common intervals. Aliases share a value.
pub struct Interval;

impl Interval {
    pub const PERFECT_UNISON: u8 = 0;
    pub const MINOR_SECOND: u8 = 1;
    pub const MAJOR_SECOND: u8 = 2;
    pub const MINOR_THIRD: u8 = 3;
    pub const MAJOR_THIRD: u8 = 4;
    pub const PERFECT_FOURTH: u8 = 5;
    pub const TRITONE: u8 = 6;
    pub const PERFECT_FIFTH: u8 = 7;
    pub const MINOR_SIXTH: u8 = 8;
    pub const MAJOR_SIXTH: u8 = 9;
    pub const MINOR_SEVENTH: u8 = 10;
    pub const MAJOR_SEVENTH: u8 = 11;
    pub const PERFECT_OCTAVE: u8 = 12;

    pub const DIMINISHED_SECOND: u8 = 0;
    pub const AUGMENTED_UNISON: u8 = 1;
    pub const DIMINISHED_THIRD: u8 = 2;
    pub const AUGMENTED_SECOND: u8 = 3;
    pub const DIMINISHED_FOURTH: u8 = 4;
    pub const AUGMENTED_THIRD: u8 = 5;
    pub const DIMINISHED_FIFTH: u8 = 6;
    pub const AUGMENTED_FOURTH: u8 = 6;
    pub const DIMINISHED_SIXTH: u8 = 7;
    pub const AUGMENTED_FIFTH: u8 = 8;
    pub const DIMINISHED_SEVENTH: u8 = 9;
    pub const AUGMENTED_SIXTH: u8 = 10;
    pub const DIMINISHED_OCTAVE: u8 = 11;
    pub const AUGMENTED_SEVENTH: u8 = 12;
}

pub fn check_reference(reference: f64) -> Result<f64, DomainError> {
    if reference.is_finite() && reference > 0.0 {
        Ok(reference)
    } else {
        Err(DomainError::InvalidReferencePitch { found: reference })
    }
}

/// Piano key number (A4 = 49) nearest to `frequency`.
pub fn key_number(frequency: f64, reference: f64) -> Result<i32, DomainError> {
    let reference = check_reference(reference)?;
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(DomainError::InvalidFrequency { found: frequency });
    }
    let steps = ((frequency / reference).log2() * 12.0).round();
    if !steps.is_finite() || steps.abs() > i32::MAX as f64 / 2.0 {
        return Err(DomainError::InvalidFrequency { found: frequency });
    }
    Ok(steps as i32 + REFERENCE_KEY)
}

pub fn frequency(key: i32, reference: f64) -> f64 {
    2f64.powf((f64::from(key) - f64::from(REFERENCE_KEY)) / 12.0) * reference
}

pub const fn semitone_to_key(semitone: u8) -> Result<i32, DomainError> {
    let semitone = const_try!(check_semitone(semitone as i32));
    Ok(semitone as i32 + FIRST_KEY)
}

pub const fn key_to_semitone(key: i32) -> Result<u8, DomainError> {
    check_semitone(key - FIRST_KEY)
}

/// Frequency of a keyboard semitone under the given A4 reference.
pub fn semitone_frequency(semitone: u8, reference: f64) -> Result<f64, DomainError> {
    let reference = check_reference(reference)?;
    let key = semitone_to_key(semitone)?;
    Ok(frequency(key, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        let c = Letter::C;
        assert_eq!(Letter::E, c.shift(2));
        assert_eq!(Letter::A, c.shift(-2));
        assert_eq!(Letter::C, Letter::B.shift(1));
        for letter in Letter::all() {
            assert_eq!(*letter, Letter::from_u8(letter.as_u8()));
            assert_eq!(Some(*letter), Letter::from_char(letter.as_char()));
        }
        assert_eq!(Some(Letter::G), Letter::from_char('g'));
        assert_eq!(None, Letter::from_char('H'));
        assert!(Letter::from_index(7).is_err());
    }

    #[test]
    fn test_chromatic_letters() {
        let expected = [
            Letter::C,
            Letter::C,
            Letter::D,
            Letter::D,
            Letter::E,
            Letter::F,
            Letter::F,
            Letter::G,
            Letter::G,
            Letter::A,
            Letter::A,
            Letter::B,
        ];
        for (pc, letter) in expected.iter().enumerate() {
            assert_eq!(*letter, Letter::chromatic(pc as u8), "pitch class {}", pc);
        }
        for letter in Letter::all() {
            assert_eq!(*letter, Letter::chromatic(letter.natural_offset()));
        }
    }

    #[test]
    fn test_steps_span_octave() {
        let major: u8 = MAJOR_STEPS.iter().sum();
        let minor: u8 = MINOR_STEPS.iter().sum();
        assert_eq!(SEMITONES_PER_OCTAVE, major);
        assert_eq!(SEMITONES_PER_OCTAVE, minor);
    }

    #[test]
    fn test_key_numbers() {
        assert_eq!(Ok(49), key_number(440.0, DEFAULT_REFERENCE_PITCH));
        assert_eq!(Ok(40), key_number(261.63, DEFAULT_REFERENCE_PITCH));
        assert_eq!(Ok(61), key_number(880.0, DEFAULT_REFERENCE_PITCH));
        assert_eq!(Ok(49), key_number(432.0, 432.0));
        assert!(key_number(0.0, DEFAULT_REFERENCE_PITCH).is_err());
        assert!(key_number(-10.0, DEFAULT_REFERENCE_PITCH).is_err());
        assert!(key_number(f64::NAN, DEFAULT_REFERENCE_PITCH).is_err());
        assert!(key_number(440.0, 0.0).is_err());
    }

    #[test]
    fn test_frequencies() {
        assert!((frequency(49, 440.0) - 440.0).abs() < 1e-9);
        assert!((frequency(37, 440.0) - 220.0).abs() < 1e-9);
        assert!((frequency(40, 440.0) - 261.625_565).abs() < 1e-4);
        for key in 1..=88 {
            assert_eq!(Ok(key), key_number(frequency(key, 440.0), 440.0));
        }
    }

    #[test]
    fn test_frequency_extreme_keys() {
        assert_eq!(0.0, frequency(i32::MIN, 440.0));
        assert!(frequency(i32::MAX, 440.0).is_infinite());
        assert!(frequency(-1000, 440.0) > 0.0);
    }

    #[test]
    fn test_semitone_keys() {
        // C1 is the first keyboard slot, A4 sits three octaves and a sixth above it.
        assert_eq!(Ok(FIRST_KEY), semitone_to_key(0));
        assert_eq!(Ok(REFERENCE_KEY), semitone_to_key(45));
        assert_eq!(Ok(45), key_to_semitone(REFERENCE_KEY));
        assert!(semitone_to_key(KEY_COUNT).is_err());
        assert!(key_to_semitone(1).is_err());
        let a4 = semitone_frequency(45, 440.0).unwrap();
        assert!((a4 - 440.0).abs() < 1e-9);
        assert!(semitone_frequency(96, 440.0).is_err());
    }
}
