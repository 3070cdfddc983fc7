//! Hand-off to an external synthesizer.
//!
//! Chords are flattened into voices with start delays, and the voices are
//! turned into the argument vector of a `sox` invocation. Nothing here runs
//! the process.

use crate::note::Note;
use crate::pitch::DomainError;
use log::debug;
use std::fmt;
use thiserror::*;

pub const MIN_SAMPLE_RATE: u32 = 44100;
pub const MAX_SAMPLE_RATE: u32 = 48000;
pub const MAX_BITS: u8 = 32;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("Sample rate {found} is outside {min}..={max} Hz.")]
    SampleRate { found: u32, min: u32, max: u32 },
    #[error("Bit depth {found} is outside 1..={max}.")]
    BitDepth { found: u8, max: u8 },
    #[error("Channel count must be at least 1.")]
    NoChannels,
    #[error("Nothing to render.")]
    NoVoices,
    #[error("No output file given.")]
    NoOutput,
    #[error("Invalid timing value {found} for {field}.")]
    Timing { field: &'static str, found: f64 },
    #[error("Shifted frequency {found} Hz is not audible.")]
    Shift { found: f64 },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A chord to be played: its notes start `delay_per_note` seconds apart and
/// the next event starts `duration` seconds after this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEvent {
    pub notes: Vec<Note>,
    pub duration: f64,
    pub delay_per_note: f64,
    pub freq_shift: f64,
}

impl ChordEvent {
    pub fn new(notes: Vec<Note>) -> Self {
        ChordEvent {
            notes,
            duration: 2.0,
            delay_per_note: 0.05,
            freq_shift: 0.0,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay_per_note(mut self, delay: f64) -> Self {
        self.delay_per_note = delay;
        self
    }

    pub fn with_freq_shift(mut self, shift: f64) -> Self {
        self.freq_shift = shift;
        self
    }
}

/// One plucked string: a frequency and the delay before it sounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Voice {
    pub frequency: f64,
    pub delay: f64,
}

fn check_timing(field: &'static str, found: f64) -> Result<f64, RenderError> {
    if found.is_finite() && found >= 0.0 {
        Ok(found)
    } else {
        Err(RenderError::Timing { field, found })
    }
}

/// Flattens `events` into voices with absolute start delays.
pub fn schedule(events: &[ChordEvent], reference: f64) -> Result<Vec<Voice>, RenderError> {
    let mut voices = Vec::with_capacity(events.iter().map(|ev| ev.notes.len()).sum());
    let mut start = 0.0;
    for event in events {
        let duration = check_timing("duration", event.duration)?;
        let spacing = check_timing("delay per note", event.delay_per_note)?;
        for (idx, note) in event.notes.iter().enumerate() {
            let frequency = note.frequency(reference)? + event.freq_shift;
            if !(frequency.is_finite() && frequency > 0.0) {
                return Err(RenderError::Shift { found: frequency });
            }
            voices.push(Voice {
                frequency,
                delay: start + spacing * idx as f64,
            });
        }
        start += duration;
    }
    Ok(voices)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Noise {
    White,
    Brown,
    Tpdf,
}

impl Noise {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Noise::White => "whitenoise",
            Noise::Brown => "brownnoise",
            Noise::Tpdf => "tpdfnoise",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Effect {
    /// Fade in, total length, fade out, all in seconds.
    Fade { fade_in: f64, length: f64, fade_out: f64 },
    /// Normalize to the given dB level.
    Norm(f64),
}

impl Effect {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Effect::Fade {
                fade_in,
                length,
                fade_out,
            } => {
                args.push("fade".to_owned());
                args.push(fade_in.to_string());
                args.push(length.to_string());
                args.push(fade_out.to_string());
            }
            Effect::Norm(level) => {
                args.push("norm".to_owned());
                args.push(level.to_string());
            }
        }
    }
}

/// Builder for a `sox -n ... synth pl ...` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SoxCommand {
    voices: Vec<Voice>,
    sample_rate: u32,
    bits: u8,
    channels: u8,
    output: Option<String>,
    noise: Option<Noise>,
    effects: Vec<Effect>,
}

impl SoxCommand {
    pub fn new(voices: Vec<Voice>) -> Self {
        SoxCommand {
            voices,
            sample_rate: MIN_SAMPLE_RATE,
            bits: 24,
            channels: 1,
            output: None,
            noise: None,
            effects: Vec::new(),
        }
    }

    pub fn sample_rate(mut self, rate: u32) -> Result<Self, RenderError> {
        if rate < MIN_SAMPLE_RATE || rate > MAX_SAMPLE_RATE {
            return Err(RenderError::SampleRate {
                found: rate,
                min: MIN_SAMPLE_RATE,
                max: MAX_SAMPLE_RATE,
            });
        }
        self.sample_rate = rate;
        Ok(self)
    }

    pub fn bits(mut self, bits: u8) -> Result<Self, RenderError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(RenderError::BitDepth {
                found: bits,
                max: MAX_BITS,
            });
        }
        self.bits = bits;
        Ok(self)
    }

    pub fn channels(mut self, channels: u8) -> Result<Self, RenderError> {
        if channels == 0 {
            return Err(RenderError::NoChannels);
        }
        self.channels = channels;
        Ok(self)
    }

    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn noise(mut self, noise: Noise) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn build(&self) -> Result<Vec<String>, RenderError> {
        if self.voices.is_empty() {
            return Err(RenderError::NoVoices);
        }
        let output = match &self.output {
            Some(path) if !path.trim().is_empty() => path.clone(),
            _ => return Err(RenderError::NoOutput),
        };
        let mut args = vec![
            "sox".to_owned(),
            "-n".to_owned(),
            "-c".to_owned(),
            self.channels.to_string(),
            "-r".to_owned(),
            self.sample_rate.to_string(),
            "-b".to_owned(),
            self.bits.to_string(),
            output,
            "synth".to_owned(),
        ];
        for voice in &self.voices {
            args.push("pl".to_owned());
            args.push(format!("{:.3}", voice.frequency));
        }
        if let Some(noise) = self.noise {
            args.push(noise.as_str().to_owned());
        }
        args.push("delay".to_owned());
        args.extend(self.voices.iter().map(|voice| format!("{:.3}", voice.delay)));
        if !self.effects.is_empty() {
            args.push("remix".to_owned());
            args.push("-".to_owned());
        }
        for effect in &self.effects {
            effect.push_args(&mut args);
        }
        debug!("sox invocation: {:?}", args);
        Ok(args)
    }
}

impl fmt::Display for SoxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build() {
            Ok(args) => f.write_str(&args.join(" ")),
            Err(e) => write!(f, "<invalid sox command: {}>", e),
        }
    }
}
