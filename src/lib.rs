//! Pitch spelling, chord and scale construction over an eight-octave
//! equal-tempered keyboard.

use thiserror::*;

pub mod utils;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod note;
pub mod parser;
pub mod pitch;
pub mod progression;
pub mod render;
pub mod spelling;

pub use catalog::{Catalog, ChordDef, Pattern, PatternError, PatternKind, ScaleDef};
pub use collection::{all_chords, chord, core_notes, scale, NoteCollection};
pub use config::{Config, ConfigError};
pub use note::Note;
pub use pitch::{DomainError, Letter};
pub use progression::{Mode, Progression, Quality};
pub use render::{ChordEvent, RenderError, SoxCommand, Voice};
pub use spelling::{SpellingError, SpellingTable};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Spelling(#[from] SpellingError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unknown chord symbol {0:?}.")]
    UnknownChord(String),
    #[error("Unknown scale {0:?}.")]
    UnknownScale(String),
}

impl From<String> for Error {
    fn from(parse_err: String) -> Self {
        Error::Parse(parse_err)
    }
}
