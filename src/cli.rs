use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chordspell", version, about = "Spell notes, chords, scales and progressions")]
pub struct Cli {
    /// TOML file with the reference pitch, octave range and accidental limit.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Frequency of A4 in Hz; overrides the config file.
    #[arg(long, global = true)]
    pub reference_pitch: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a note's key, frequency and enharmonic spellings.
    Note { note: String },
    /// Spell a chord such as `Eb4m7` or `C4 dim`.
    Chord { symbol: String },
    /// Spell a scale, e.g. `scale F#4 harmonic minor`.
    Scale {
        root: String,
        #[arg(required = true, num_args = 1..)]
        scale: Vec<String>,
    },
    /// The seven degree triads of a major or minor key.
    Progression { root: String, mode: String },
    /// Every catalog chord on the naturals and flats of one octave.
    Chords {
        #[arg(long, default_value_t = 4)]
        octave: u8,
    },
    /// Dump the spelling table.
    Table,
    /// Print the sox invocation that plays the given chords in sequence.
    Sox(SoxArgs),
}

#[derive(Debug, clap::Args)]
pub struct SoxArgs {
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
    #[arg(long, short)]
    pub output: String,
    /// Seconds per chord.
    #[arg(long, default_value_t = 2.0)]
    pub duration: f64,
    /// Seconds between the onsets of a chord's notes.
    #[arg(long, default_value_t = 0.05)]
    pub delay_per_note: f64,
    /// Hz added to every frequency.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub freq_shift: f64,
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,
    #[arg(long, default_value_t = 24)]
    pub bits: u8,
    #[arg(long, default_value_t = 1)]
    pub channels: u8,
    /// Fade-out length in seconds.
    #[arg(long, default_value_t = 0.1)]
    pub fade: f64,
    /// Normalization level in dB.
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub norm: f64,
}
