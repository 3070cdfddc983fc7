use crate::pitch::{
    check_octave, check_reference, DomainError, DEFAULT_REFERENCE_PITCH, MAX_OCTAVE, MIN_OCTAVE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::*;

/// Above five accidentals the spellings of neighbouring octaves collide
/// (C###### and Cbbbbbb name the same key).
pub const MAX_ACCIDENTAL_LIMIT: u8 = 5;
pub const DEFAULT_ACCIDENTAL_LIMIT: u8 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The tunable knobs. The accidental limit and octave bounds only take
/// effect when a spelling table is built from this config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference_pitch: f64,
    pub min_octave: u8,
    pub max_octave: u8,
    pub accidental_limit: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_pitch: DEFAULT_REFERENCE_PITCH,
            min_octave: MIN_OCTAVE,
            max_octave: MAX_OCTAVE,
            accidental_limit: DEFAULT_ACCIDENTAL_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_reference(self.reference_pitch)?;
        check_octave(self.min_octave)?;
        check_octave(self.max_octave)?;
        if self.min_octave > self.max_octave {
            return Err(DomainError::OctaveOutOfRange {
                found: self.min_octave,
                min: MIN_OCTAVE,
                max: self.max_octave,
            });
        }
        if self.accidental_limit > MAX_ACCIDENTAL_LIMIT {
            return Err(DomainError::AccidentalLimit {
                found: self.accidental_limit,
                max: MAX_ACCIDENTAL_LIMIT,
            });
        }
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn with_reference_pitch(self, reference_pitch: f64) -> Self {
        Config {
            reference_pitch,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(440.0, config.reference_pitch);
        assert_eq!((1, 8), (config.min_octave, config.max_octave));
        assert_eq!(3, config.accidental_limit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str("reference_pitch = 432.0\n").unwrap();
        assert_eq!(Config::default().with_reference_pitch(432.0), config);

        let config = Config::from_toml_str("min_octave = 2\nmax_octave = 6\naccidental_limit = 2\n")
            .unwrap();
        assert_eq!(2, config.min_octave);
        assert_eq!(6, config.max_octave);
        assert_eq!(2, config.accidental_limit);
        assert_eq!(440.0, config.reference_pitch);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml_str("reference_pitch = -1.0"),
            Err(ConfigError::Domain(DomainError::InvalidReferencePitch { .. }))
        ));
        assert!(matches!(
            Config::from_toml_str("max_octave = 9"),
            Err(ConfigError::Domain(DomainError::OctaveOutOfRange { .. }))
        ));
        assert!(matches!(
            Config::from_toml_str("min_octave = 5\nmax_octave = 4"),
            Err(ConfigError::Domain(DomainError::OctaveOutOfRange { .. }))
        ));
        assert!(matches!(
            Config::from_toml_str("accidental_limit = 6"),
            Err(ConfigError::Domain(DomainError::AccidentalLimit { found: 6, max: 5 }))
        ));
        assert!(matches!(
            Config::from_toml_str("reference_pitch = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/chordspell.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
