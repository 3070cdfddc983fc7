//! Named chord and scale shapes.
//!
//! A chord shape pairs semitone offsets with letter offsets so that an altered
//! interval keeps its staff position: a diminished fifth is still spelled on
//! the fifth letter. A scale is given as its seven steps, which must cover
//! exactly one octave; its letters advance by one per degree.

use crate::pitch::{Interval, LETTER_COUNT, MAJOR_STEPS, MINOR_STEPS, SEMITONES_PER_OCTAVE};
use thiserror::*;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum PatternFault {
    #[error("the pattern has no notes")]
    Empty,
    #[error("{intervals} intervals but {cores} letter offsets")]
    LengthMismatch { intervals: usize, cores: usize },
    #[error("the first interval and letter offset must both be 0")]
    NonZeroRoot,
    #[error("interval {index} does not rise above the previous one")]
    NotAscending { index: usize },
    #[error("a scale needs {expected} steps, found {found}")]
    DegreeCount { expected: usize, found: usize },
    #[error("step {index} is zero")]
    ZeroStep { index: usize },
    #[error("the steps sum to {sum} semitones instead of 12")]
    StepSum { sum: u32 },
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PatternError {
    #[error("Pattern {name:?} is malformed: {fault}.")]
    Malformed { name: String, fault: PatternFault },
    #[error("A {kind:?} pattern named {name:?} is already registered.")]
    Duplicate { kind: PatternKind, name: String },
}

pub const fn check_chord_shape(intervals: &[u8], cores: &[u8]) -> Result<(), PatternFault> {
    if intervals.is_empty() {
        return Err(PatternFault::Empty);
    }
    if intervals.len() != cores.len() {
        return Err(PatternFault::LengthMismatch {
            intervals: intervals.len(),
            cores: cores.len(),
        });
    }
    if intervals[0] != 0 || cores[0] != 0 {
        return Err(PatternFault::NonZeroRoot);
    }
    let mut idx = 1;
    while idx < intervals.len() {
        if intervals[idx] <= intervals[idx - 1] {
            return Err(PatternFault::NotAscending { index: idx });
        }
        idx += 1;
    }
    Ok(())
}

pub const fn check_scale_steps(steps: &[u8]) -> Result<(), PatternFault> {
    if steps.len() != LETTER_COUNT as usize {
        return Err(PatternFault::DegreeCount {
            expected: LETTER_COUNT as usize,
            found: steps.len(),
        });
    }
    let mut sum = 0u32;
    let mut idx = 0;
    while idx < steps.len() {
        if steps[idx] == 0 {
            return Err(PatternFault::ZeroStep { index: idx });
        }
        sum += steps[idx] as u32;
        idx += 1;
    }
    if sum != SEMITONES_PER_OCTAVE as u32 {
        return Err(PatternFault::StepSum { sum });
    }
    Ok(())
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChordDef {
    pub name: &'static str,
    pub symbol: &'static str,
    pub intervals: &'static [u8],
    pub cores: &'static [u8],
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScaleDef {
    pub name: &'static str,
    pub steps: &'static [u8],
}

const TRIAD_CORES: &[u8] = &[0, 2, 4];
const SEVENTH_CORES: &[u8] = &[0, 2, 4, 6];

pub const MAJOR_TRIAD: ChordDef = ChordDef {
    name: "major",
    symbol: "",
    intervals: &[0, Interval::MAJOR_THIRD, Interval::PERFECT_FIFTH],
    cores: TRIAD_CORES,
};
pub const MINOR_TRIAD: ChordDef = ChordDef {
    name: "minor",
    symbol: "m",
    intervals: &[0, Interval::MINOR_THIRD, Interval::PERFECT_FIFTH],
    cores: TRIAD_CORES,
};
pub const AUGMENTED_TRIAD: ChordDef = ChordDef {
    name: "augmented",
    symbol: "+",
    intervals: &[0, Interval::MAJOR_THIRD, Interval::AUGMENTED_FIFTH],
    cores: TRIAD_CORES,
};
pub const DIMINISHED_TRIAD: ChordDef = ChordDef {
    name: "diminished",
    symbol: "°",
    intervals: &[0, Interval::MINOR_THIRD, Interval::DIMINISHED_FIFTH],
    cores: TRIAD_CORES,
};

pub const SUS4: ChordDef = ChordDef {
    name: "suspended fourth",
    symbol: "sus4",
    intervals: &[0, Interval::PERFECT_FOURTH, Interval::PERFECT_FIFTH],
    cores: &[0, 3, 4],
};
pub const SUS2: ChordDef = ChordDef {
    name: "suspended second",
    symbol: "sus2",
    intervals: &[0, Interval::MAJOR_SECOND, Interval::PERFECT_FIFTH],
    cores: &[0, 1, 4],
};

pub const MAJOR_SEVENTH: ChordDef = ChordDef {
    name: "major seventh",
    symbol: "M7",
    intervals: &[
        0,
        Interval::MAJOR_THIRD,
        Interval::PERFECT_FIFTH,
        Interval::MAJOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const MINOR_SEVENTH: ChordDef = ChordDef {
    name: "minor seventh",
    symbol: "m7",
    intervals: &[
        0,
        Interval::MINOR_THIRD,
        Interval::PERFECT_FIFTH,
        Interval::MINOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const DOMINANT_SEVENTH: ChordDef = ChordDef {
    name: "dominant seventh",
    symbol: "7",
    intervals: &[
        0,
        Interval::MAJOR_THIRD,
        Interval::PERFECT_FIFTH,
        Interval::MINOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const MINOR_MAJOR_SEVENTH: ChordDef = ChordDef {
    name: "minor major seventh",
    symbol: "mM7",
    intervals: &[
        0,
        Interval::MINOR_THIRD,
        Interval::PERFECT_FIFTH,
        Interval::MAJOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const AUGMENTED_SEVENTH: ChordDef = ChordDef {
    name: "augmented seventh",
    symbol: "+7",
    intervals: &[
        0,
        Interval::MAJOR_THIRD,
        Interval::AUGMENTED_FIFTH,
        Interval::MINOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const AUGMENTED_MAJOR_SEVENTH: ChordDef = ChordDef {
    name: "augmented major seventh",
    symbol: "+M7",
    intervals: &[
        0,
        Interval::MAJOR_THIRD,
        Interval::AUGMENTED_FIFTH,
        Interval::MAJOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const DIMINISHED_SEVENTH: ChordDef = ChordDef {
    name: "diminished seventh",
    symbol: "°7",
    intervals: &[
        0,
        Interval::MINOR_THIRD,
        Interval::DIMINISHED_FIFTH,
        Interval::DIMINISHED_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};
pub const HALF_DIMINISHED_SEVENTH: ChordDef = ChordDef {
    name: "half-diminished seventh",
    symbol: "ø7",
    intervals: &[
        0,
        Interval::MINOR_THIRD,
        Interval::DIMINISHED_FIFTH,
        Interval::MINOR_SEVENTH,
    ],
    cores: SEVENTH_CORES,
};

pub const STANDARD_CHORDS: [ChordDef; 14] = [
    MAJOR_TRIAD,
    MINOR_TRIAD,
    AUGMENTED_TRIAD,
    DIMINISHED_TRIAD,
    SUS4,
    SUS2,
    MAJOR_SEVENTH,
    MINOR_SEVENTH,
    DOMINANT_SEVENTH,
    MINOR_MAJOR_SEVENTH,
    AUGMENTED_SEVENTH,
    AUGMENTED_MAJOR_SEVENTH,
    DIMINISHED_SEVENTH,
    HALF_DIMINISHED_SEVENTH,
];

pub const MAJOR_SCALE: ScaleDef = ScaleDef {
    name: "major",
    steps: &MAJOR_STEPS,
};
pub const MINOR_SCALE: ScaleDef = ScaleDef {
    name: "minor",
    steps: &MINOR_STEPS,
};
pub const HARMONIC_MINOR_SCALE: ScaleDef = ScaleDef {
    name: "harmonic minor",
    steps: &[2, 1, 2, 2, 1, 3, 1],
};
pub const MELODIC_MINOR_SCALE: ScaleDef = ScaleDef {
    name: "melodic minor",
    steps: &[2, 1, 2, 2, 2, 2, 1],
};

pub const STANDARD_SCALES: [ScaleDef; 4] = [
    MAJOR_SCALE,
    MINOR_SCALE,
    HARMONIC_MINOR_SCALE,
    MELODIC_MINOR_SCALE,
];

const fn chord_defs_ok(defs: &[ChordDef]) -> bool {
    let mut idx = 0;
    while idx < defs.len() {
        if check_chord_shape(defs[idx].intervals, defs[idx].cores).is_err() {
            return false;
        }
        idx += 1;
    }
    true
}

const fn scale_defs_ok(defs: &[ScaleDef]) -> bool {
    let mut idx = 0;
    while idx < defs.len() {
        if check_scale_steps(defs[idx].steps).is_err() {
            return false;
        }
        idx += 1;
    }
    true
}

const _: () = assert!(chord_defs_ok(&STANDARD_CHORDS));
const _: () = assert!(scale_defs_ok(&STANDARD_SCALES));

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PatternKind {
    Chord,
    Scale,
}

/// A validated shape: semitone offsets and letter offsets from the root,
/// index for index.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Pattern {
    kind: PatternKind,
    name: String,
    symbol: String,
    intervals: Vec<u8>,
    cores: Vec<u8>,
}

impl Pattern {
    pub fn chord(
        name: &str,
        symbol: &str,
        intervals: &[u8],
        cores: &[u8],
    ) -> Result<Self, PatternError> {
        check_chord_shape(intervals, cores).map_err(|fault| PatternError::Malformed {
            name: name.to_owned(),
            fault,
        })?;
        Ok(Self::chord_unchecked(name, symbol, intervals, cores))
    }

    /// Builds a scale from its seven steps; the steps must add up to an octave.
    pub fn scale(name: &str, steps: &[u8]) -> Result<Self, PatternError> {
        check_scale_steps(steps).map_err(|fault| PatternError::Malformed {
            name: name.to_owned(),
            fault,
        })?;
        Ok(Self::scale_unchecked(name, steps))
    }

    fn chord_unchecked(name: &str, symbol: &str, intervals: &[u8], cores: &[u8]) -> Self {
        Pattern {
            kind: PatternKind::Chord,
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            intervals: intervals.to_vec(),
            cores: cores.to_vec(),
        }
    }

    fn scale_unchecked(name: &str, steps: &[u8]) -> Self {
        let intervals = steps
            .iter()
            .take(steps.len() - 1)
            .scan(0, |acc, step| {
                *acc += step;
                Some(*acc)
            });
        Pattern {
            kind: PatternKind::Scale,
            name: name.to_owned(),
            symbol: name.to_owned(),
            intervals: std::iter::once(0).chain(intervals).collect(),
            cores: (0..steps.len() as u8).collect(),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Suffix appended to the root name when naming a chord (`m7`, `°`).
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
    pub fn intervals(&self) -> &[u8] {
        &self.intervals
    }
    pub fn cores(&self) -> &[u8] {
        &self.cores
    }
    pub fn len(&self) -> usize {
        self.intervals.len()
    }
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl From<&ChordDef> for Pattern {
    fn from(def: &ChordDef) -> Self {
        Pattern::chord_unchecked(def.name, def.symbol, def.intervals, def.cores)
    }
}

impl From<&ScaleDef> for Pattern {
    fn from(def: &ScaleDef) -> Self {
        Pattern::scale_unchecked(def.name, def.steps)
    }
}

fn normalize_scale_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// The registry of chord and scale shapes known to a caller.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Catalog {
    chords: Vec<Pattern>,
    scales: Vec<Pattern>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triads, suspended chords, sevenths, and the four common scales.
    pub fn standard() -> Self {
        Catalog {
            chords: STANDARD_CHORDS.iter().map(Pattern::from).collect(),
            scales: STANDARD_SCALES.iter().map(Pattern::from).collect(),
        }
    }

    pub fn register_chord(
        &mut self,
        name: &str,
        symbol: &str,
        intervals: &[u8],
        cores: &[u8],
    ) -> Result<&Pattern, PatternError> {
        if self.chord(symbol).is_some() {
            return Err(PatternError::Duplicate {
                kind: PatternKind::Chord,
                name: symbol.to_owned(),
            });
        }
        let pattern = Pattern::chord(name, symbol, intervals, cores)?;
        self.chords.push(pattern);
        Ok(&self.chords[self.chords.len() - 1])
    }

    pub fn register_scale(&mut self, name: &str, steps: &[u8]) -> Result<&Pattern, PatternError> {
        let name = normalize_scale_name(name);
        if self.scale(&name).is_some() {
            return Err(PatternError::Duplicate {
                kind: PatternKind::Scale,
                name,
            });
        }
        let pattern = Pattern::scale(&name, steps)?;
        self.scales.push(pattern);
        Ok(&self.scales[self.scales.len() - 1])
    }

    /// Looks a chord up by its exact symbol.
    pub fn chord(&self, symbol: &str) -> Option<&Pattern> {
        self.chords.iter().find(|pattern| pattern.symbol == symbol)
    }

    /// Looks a scale up by name, ignoring case and treating `-`/`_` as spaces.
    pub fn scale(&self, name: &str) -> Option<&Pattern> {
        let name = normalize_scale_name(name);
        self.scales.iter().find(|pattern| pattern.name == name)
    }

    pub fn chords(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.chords.iter()
    }

    pub fn scales(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.scales.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_shapes_are_valid() {
        for def in STANDARD_CHORDS.iter() {
            let checked = Pattern::chord(def.name, def.symbol, def.intervals, def.cores).unwrap();
            assert_eq!(Pattern::from(def), checked);
        }
        for def in STANDARD_SCALES.iter() {
            let checked = Pattern::scale(def.name, def.steps).unwrap();
            assert_eq!(Pattern::from(def), checked);
        }
    }

    #[test]
    fn test_scale_intervals() {
        let major = Pattern::from(&MAJOR_SCALE);
        assert_eq!(&[0, 2, 4, 5, 7, 9, 11], major.intervals());
        assert_eq!(&[0, 1, 2, 3, 4, 5, 6], major.cores());
        let harmonic = Pattern::from(&HARMONIC_MINOR_SCALE);
        assert_eq!(&[0, 2, 3, 5, 7, 8, 11], harmonic.intervals());
        assert_eq!(PatternKind::Scale, harmonic.kind());
    }

    #[test]
    fn test_scale_step_sum() {
        let short = Pattern::scale("short", &[2, 2, 1, 2, 2, 1, 1]).unwrap_err();
        assert_eq!(
            PatternError::Malformed {
                name: "short".to_owned(),
                fault: PatternFault::StepSum { sum: 11 }
            },
            short
        );
        let long = Pattern::scale("long", &[2, 2, 1, 2, 2, 2, 2]).unwrap_err();
        assert!(matches!(
            long,
            PatternError::Malformed {
                fault: PatternFault::StepSum { sum: 13 },
                ..
            }
        ));
        let hexatonic = Pattern::scale("whole tone", &[2, 2, 2, 2, 2, 2]).unwrap_err();
        assert!(matches!(
            hexatonic,
            PatternError::Malformed {
                fault: PatternFault::DegreeCount { found: 6, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_chord_shape_faults() {
        assert_eq!(
            Err(PatternFault::LengthMismatch {
                intervals: 3,
                cores: 2
            }),
            check_chord_shape(&[0, 4, 7], &[0, 2])
        );
        assert_eq!(Err(PatternFault::Empty), check_chord_shape(&[], &[]));
        assert_eq!(
            Err(PatternFault::NonZeroRoot),
            check_chord_shape(&[1, 4, 7], &[0, 2, 4])
        );
        assert_eq!(
            Err(PatternFault::NotAscending { index: 2 }),
            check_chord_shape(&[0, 7, 4], &[0, 4, 2])
        );
        assert_eq!(Ok(()), check_chord_shape(&[0, 7], &[0, 4]));
    }

    #[test]
    fn test_registration() {
        let mut catalog = Catalog::standard();
        assert_eq!(14, catalog.chords().count());
        assert_eq!(4, catalog.scales().count());

        let power = catalog.register_chord("power", "5", &[0, 7], &[0, 4]).unwrap();
        assert_eq!("5", power.symbol());
        assert!(catalog.chord("5").is_some());

        let dup = catalog.register_chord("minor again", "m", &[0, 3, 7], &[0, 2, 4]);
        assert!(matches!(dup, Err(PatternError::Duplicate { .. })));

        let bad = catalog.register_chord("broken", "x", &[0, 4, 7], &[0, 2]);
        assert!(matches!(bad, Err(PatternError::Malformed { .. })));
        assert!(catalog.chord("x").is_none());

        let dorian = catalog.register_scale("Dorian", &[2, 1, 2, 2, 2, 1, 2]).unwrap();
        assert_eq!("dorian", dorian.name());
        assert!(catalog.scale("DORIAN").is_some());
        assert!(catalog.register_scale("bad", &[2, 2, 2, 2, 2, 2, 2]).is_err());
        assert!(catalog.scale("bad").is_none());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::standard();
        assert_eq!("major", catalog.chord("").unwrap().name());
        assert_eq!("diminished seventh", catalog.chord("°7").unwrap().name());
        assert_eq!("harmonic minor", catalog.scale("Harmonic-Minor").unwrap().name());
        assert_eq!("melodic minor", catalog.scale("melodic_minor").unwrap().name());
        assert!(catalog.chord("m9").is_none());
        assert!(catalog.scale("lydian").is_none());
    }
}
