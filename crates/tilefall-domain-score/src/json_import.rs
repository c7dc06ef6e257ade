use crate::model::{Note, NoteRecord, Score, ScoreEntry, END_SENTINEL_LANE};
use crate::pitch::{Pitch, PitchError};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("entry {index}: time is not a finite number")]
    InvalidTime { index: usize },
    #[error("entry {index}: invalid duration {duration_ms}")]
    InvalidDuration { index: usize, duration_ms: f64 },
    #[error("entry {index}: invalid pitch '{label}': {source}")]
    InvalidPitch {
        index: usize,
        label: String,
        #[source]
        source: PitchError,
    },
    #[error("entry {index}: invalid lane {lane}")]
    InvalidLane { index: usize, lane: i64 },
    #[error("entry {index}: lane {lane} outside 0..{lanes}")]
    LaneOutOfRange { index: usize, lane: u8, lanes: u8 },
    #[error("entry {index}: time {time_ms} precedes previous note at {previous_ms}")]
    NonMonotonicTime {
        index: usize,
        previous_ms: f64,
        time_ms: f64,
    },
}

pub fn import_score_path(path: &Path) -> Result<Score, ScoreError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScoreError::Io(e.to_string()))?;
    import_score_json(&text)
}

pub fn import_score_json(text: &str) -> Result<Score, ScoreError> {
    let records: Vec<NoteRecord> =
        serde_json::from_str(text).map_err(|e| ScoreError::Parse(e.to_string()))?;
    import_records(&records)
}

/// Validates every record before building the score; nothing is kept on failure.
pub fn import_records(records: &[NoteRecord]) -> Result<Score, ScoreError> {
    let mut entries = Vec::with_capacity(records.len());
    let mut previous_ms: Option<f64> = None;

    for (index, NoteRecord(time_ms, lane, duration_ms, label)) in records.iter().enumerate() {
        let time_ms = *time_ms;
        if !time_ms.is_finite() {
            return Err(ScoreError::InvalidTime { index });
        }

        if *lane == END_SENTINEL_LANE {
            entries.push(ScoreEntry::End { time_ms });
            continue;
        }

        let lane = u8::try_from(*lane).map_err(|_| ScoreError::InvalidLane { index, lane: *lane })?;

        if !duration_ms.is_finite() || *duration_ms < 0.0 {
            return Err(ScoreError::InvalidDuration {
                index,
                duration_ms: *duration_ms,
            });
        }

        let pitch = Pitch::parse(label).map_err(|source| ScoreError::InvalidPitch {
            index,
            label: label.clone(),
            source,
        })?;

        if let Some(previous_ms) = previous_ms {
            if time_ms < previous_ms {
                return Err(ScoreError::NonMonotonicTime {
                    index,
                    previous_ms,
                    time_ms,
                });
            }
        }
        previous_ms = Some(time_ms);

        entries.push(ScoreEntry::Note(Note {
            time_ms,
            lane,
            duration_ms: *duration_ms,
            pitch,
        }));
    }

    Ok(Score::from_validated(entries))
}

impl Score {
    pub fn check_lanes(&self, lanes: u8) -> Result<(), ScoreError> {
        for (index, entry) in self.entries().iter().enumerate() {
            if let ScoreEntry::Note(note) = entry {
                if note.lane >= lanes {
                    return Err(ScoreError::LaneOutOfRange {
                        index,
                        lane: note.lane,
                        lanes,
                    });
                }
            }
        }
        Ok(())
    }
}
