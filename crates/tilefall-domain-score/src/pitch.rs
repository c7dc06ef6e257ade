use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PitchError {
    #[error("empty pitch label")]
    Empty,
    #[error("unknown note step '{0}'")]
    UnknownStep(char),
    #[error("invalid octave in '{0}'")]
    InvalidOctave(String),
    #[error("pitch '{0}' is outside the MIDI range")]
    OutOfRange(String),
}

/// Scientific pitch label (`C4`, `D#5`, `Bb3`) with its MIDI number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    label: String,
    midi: u8,
}

impl Pitch {
    pub fn parse(label: &str) -> Result<Self, PitchError> {
        let mut chars = label.chars();
        let step = chars.next().ok_or(PitchError::Empty)?;
        let class: i32 = match step {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            other => return Err(PitchError::UnknownStep(other)),
        };

        let rest = chars.as_str();
        let (accidental, octave_text) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        if octave_text.is_empty() {
            return Err(PitchError::InvalidOctave(label.to_string()));
        }
        let octave: i32 = octave_text
            .parse()
            .map_err(|_| PitchError::InvalidOctave(label.to_string()))?;
        if !(-1..=9).contains(&octave) {
            return Err(PitchError::OutOfRange(label.to_string()));
        }

        let midi = (octave + 1) * 12 + class + accidental;
        if !(0..=127).contains(&midi) {
            return Err(PitchError::OutOfRange(label.to_string()));
        }

        Ok(Self {
            label: label.to_string(),
            midi: midi as u8,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn midi(&self) -> u8 {
        self.midi
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Pitch {
    type Error = PitchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.label
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naturals_and_accidentals() {
        assert_eq!(Pitch::parse("C4").unwrap().midi(), 60);
        assert_eq!(Pitch::parse("A4").unwrap().midi(), 69);
        assert_eq!(Pitch::parse("D#5").unwrap().midi(), 75);
        assert_eq!(Pitch::parse("Bb3").unwrap().midi(), 58);
        assert_eq!(Pitch::parse("C-1").unwrap().midi(), 0);
    }

    #[test]
    fn rejects_malformed_labels() {
        assert_eq!(Pitch::parse(""), Err(PitchError::Empty));
        assert_eq!(Pitch::parse("H4"), Err(PitchError::UnknownStep('H')));
        assert!(matches!(Pitch::parse("C"), Err(PitchError::InvalidOctave(_))));
        assert!(matches!(Pitch::parse("C#x"), Err(PitchError::InvalidOctave(_))));
        assert!(matches!(Pitch::parse("A9"), Err(PitchError::OutOfRange(_))));
        assert!(matches!(Pitch::parse("C999999999"), Err(PitchError::OutOfRange(_))));
    }
}
