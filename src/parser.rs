use nom::{
    branch::alt,
    character::complete::space0,
    combinator::{all_consuming, map, rest},
    error::{context, convert_error},
    sequence::preceded,
    Err as NomErr,
};

use crate::catalog::Catalog;
use crate::collection::NoteCollection;
use crate::note::{accidental_marks, Note};
use crate::pitch::Letter;
use crate::spelling::SpellingTable;
use crate::Error;

mod values;
pub use values::*;

pub type ParseError<'a> = nom::error::VerboseError<&'a str>;

pub type ParseResult<'a, T> = nom::IResult<&'a str, T, ParseError<'a>>;

/// A written note: letter, accidentals, octave (`Eb4`, `F##3`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NoteSpec {
    pub letter: Letter,
    pub accidentals: i8,
    pub octave: u8,
}

impl NoteSpec {
    pub fn name(&self) -> String {
        let mut name = self.letter.as_char().to_string();
        name.push_str(&accidental_marks(self.accidentals));
        name
    }

    pub fn resolve(&self, table: &SpellingTable) -> Result<Note, Error> {
        Ok(table.resolve_by_name(&self.name(), self.octave)?)
    }
}

/// A written chord: a root note followed by a chord symbol (`Eb4m7`, `C4 dim`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ChordSpec {
    pub root: NoteSpec,
    pub symbol: String,
}

impl ChordSpec {
    pub fn build(&self, table: &SpellingTable, catalog: &Catalog) -> Result<NoteCollection, Error> {
        let pattern = catalog
            .chord(&self.symbol)
            .ok_or_else(|| Error::UnknownChord(self.symbol.clone()))?;
        let root = self.root.resolve(table)?;
        Ok(NoteCollection::build(table, root, pattern)?)
    }
}

pub fn parse_notespec(input: &str) -> ParseResult<'_, NoteSpec> {
    let (input, letter) = context("Note letter", parse_letter)(input)?;
    let (input, accidentals) = context("Accidentals", parse_accidentals)(input)?;
    let (input, octave) = context("Octave", parse_octave)(input)?;
    let res = NoteSpec {
        letter,
        accidentals,
        octave,
    };
    Ok((input, res))
}

pub fn parse_chordsymbol(input: &str) -> ParseResult<'_, String> {
    let alias = map(all_consuming(parse_symbol_alias), str::to_owned);
    let raw = map(rest, |sym: &str| sym.trim_end().to_owned());
    alt((alias, raw))(input)
}

pub fn parse_chordspec(input: &str) -> ParseResult<'_, ChordSpec> {
    let (input, root) = parse_notespec(input)?;
    let (input, symbol) = context("Chord symbol", preceded(space0, parse_chordsymbol))(input)?;
    Ok((input, ChordSpec { root, symbol }))
}

/// Runs `parser` over the whole of `input`, rendering nom's error trace on
/// failure.
pub fn parse_complete<'a, T, F>(input: &'a str, parser: F) -> Result<T, Error>
where
    F: Fn(&'a str) -> ParseResult<'a, T>,
{
    let trimmed = input.trim();
    let (out, res) = parser(trimmed).map_err(|e| match e {
        NomErr::Error(e) | NomErr::Failure(e) => format!(
            "could not parse {:?}:\n{}",
            trimmed,
            convert_error(trimmed, e)
        ),
        NomErr::Incomplete(ic) => format!("Incomplete: {:?}", ic),
    })?;
    if !out.trim().is_empty() {
        return Err(Error::Parse(format!(
            "Could not parse full input {:?}, rest: {:?}",
            trimmed, out
        )));
    }
    Ok(res)
}

pub fn note_spec(input: &str) -> Result<NoteSpec, Error> {
    parse_complete(input, parse_notespec)
}

pub fn chord_spec(input: &str) -> Result<ChordSpec, Error> {
    parse_complete(input, parse_chordspec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::SpellingError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_notespec() {
        let spec = note_spec("Eb4").unwrap();
        assert_eq!(
            NoteSpec {
                letter: Letter::E,
                accidentals: -1,
                octave: 4
            },
            spec
        );
        assert_eq!("Eb", spec.name());
        let fx = note_spec(" fx3 ").unwrap();
        assert_eq!(("F##".to_owned(), 3), (fx.name(), fx.octave));
        assert!(note_spec("Eb").is_err());
        assert!(note_spec("Eb4 extra").is_err());
        assert!(matches!(note_spec("H4"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_notespec_resolves() {
        let table = SpellingTable::shared();
        let eb4 = note_spec("Eb4").unwrap().resolve(table).unwrap();
        assert_eq!(39, eb4.semitone());
        let err = note_spec("C####4").unwrap().resolve(table).unwrap_err();
        assert!(matches!(err, Error::Spelling(SpellingError::UnknownName { .. })));
        assert!(note_spec("C9").unwrap().resolve(table).is_err());
    }

    #[test]
    fn test_chordspec() {
        assert_eq!("m7", chord_spec("Eb4m7").unwrap().symbol);
        assert_eq!("°7", chord_spec("C#3 dim7").unwrap().symbol);
        assert_eq!("", chord_spec("C4").unwrap().symbol);
        assert_eq!("", chord_spec("C4 maj").unwrap().symbol);
        assert_eq!("+M7", chord_spec("Ab4+M7").unwrap().symbol);
        assert_eq!("maj9", chord_spec("F4maj9").unwrap().symbol);

        let dominant = chord_spec("G47").unwrap();
        assert_eq!(4, dominant.root.octave);
        assert_eq!("7", dominant.symbol);
    }

    #[test]
    fn test_dominant_seventh_after_octave() {
        let table = SpellingTable::shared();
        let catalog = Catalog::standard();
        let chord = chord_spec("G47").unwrap().build(table, &catalog).unwrap();
        let names: Vec<String> = chord.notes().iter().map(Note::to_string).collect();
        assert_eq!(vec!["G4", "B4", "D5", "F5"], names);
        assert_eq!("G7", chord.name());
    }

    #[test]
    fn test_chordspec_builds() {
        let table = SpellingTable::shared();
        let catalog = Catalog::standard();
        let chord = chord_spec("Eb4m").unwrap().build(table, &catalog).unwrap();
        let names: Vec<String> = chord.notes().iter().map(Note::to_string).collect();
        assert_eq!(vec!["Eb4", "Gb4", "Bb4"], names);
        assert_eq!("Ebm", chord.name());

        let unknown = chord_spec("F4maj9").unwrap().build(table, &catalog).unwrap_err();
        assert!(matches!(unknown, Error::UnknownChord(ref sym) if sym == "maj9"));
    }
}
