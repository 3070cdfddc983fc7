use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, anychar, one_of},
    combinator::{map, map_opt},
    error::context,
    multi::many0,
};

use super::ParseResult;
use crate::pitch::Letter;
use crate::progression::Mode;

const MAX_MARKS: usize = 12;

pub fn parse_letter(input: &str) -> ParseResult<'_, Letter> {
    map_opt(anychar, Letter::from_char)(input)
}

pub fn parse_accidental(input: &str) -> ParseResult<'_, i8> {
    alt((
        map(tag("x"), |_| 2),
        map(tag("#"), |_| 1),
        map(tag("♯"), |_| 1),
        map(tag("b"), |_| -1),
        map(tag("♭"), |_| -1),
    ))(input)
}

/// A run of accidental marks. Sharps and flats may not be mixed.
pub fn parse_accidentals(input: &str) -> ParseResult<'_, i8> {
    let combine = |marks: Vec<i8>| {
        let all_sharps = marks.iter().all(|m| *m > 0);
        let all_flats = marks.iter().all(|m| *m < 0);
        if marks.len() <= MAX_MARKS && (all_sharps || all_flats) {
            Some(marks.iter().sum())
        } else {
            None
        }
    };
    map_opt(many0(parse_accidental), combine)(input)
}

/// A single octave digit, so `G47` reads as G4 followed by `7`.
pub fn parse_octave(input: &str) -> ParseResult<'_, u8> {
    map_opt(one_of("0123456789"), |c: char| c.to_digit(10).map(|d| d as u8))(input)
}

pub fn parse_mode(input: &str) -> ParseResult<'_, Mode> {
    context("Key mode", map_opt(alpha1, Mode::from_name))(input)
}

/// ASCII spellings of the catalog's chord symbols.
pub fn parse_symbol_alias(input: &str) -> ParseResult<'_, &'static str> {
    alt((
        map(tag_no_case("maj7"), |_| "M7"),
        map(tag_no_case("dim7"), |_| "°7"),
        map(tag_no_case("aug7"), |_| "+7"),
        map(tag("m7b5"), |_| "ø7"),
        map(tag("o7"), |_| "°7"),
        map(tag_no_case("major"), |_| ""),
        map(tag_no_case("minor"), |_| "m"),
        map(tag_no_case("maj"), |_| ""),
        map(tag_no_case("dim"), |_| "°"),
        map(tag_no_case("aug"), |_| "+"),
        map(tag("min"), |_| "m"),
        map(tag("o"), |_| "°"),
    ))(input)
}
