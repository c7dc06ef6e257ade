use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use tilefall_ports::types::{LaneIndex, SongTimeMs};

/// Lane value reserved for the end-of-song marker.
pub const END_SENTINEL_LANE: i64 = 999;

/// Persisted score row: `[timeMs, lane, durationMs, pitchLabel]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord(pub f64, pub i64, pub f64, pub String);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub time_ms: SongTimeMs,
    pub lane: LaneIndex,
    pub duration_ms: f64,
    pub pitch: Pitch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScoreEntry {
    Note(Note),
    /// Consumed by the scheduler without producing a tile.
    End { time_ms: SongTimeMs },
}

impl ScoreEntry {
    pub fn time_ms(&self) -> SongTimeMs {
        match self {
            ScoreEntry::Note(note) => note.time_ms,
            ScoreEntry::End { time_ms } => *time_ms,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ScoreEntry::End { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub title: Option<String>,
    entries: Vec<ScoreEntry>,
}

impl Score {
    /// Entries are kept in the given order; callers hand over an already validated sequence.
    pub(crate) fn from_validated(entries: Vec<ScoreEntry>) -> Self {
        Self {
            title: None,
            entries,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ScoreEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.entries.iter().filter_map(|entry| match entry {
            ScoreEntry::Note(note) => Some(note),
            ScoreEntry::End { .. } => None,
        })
    }

    pub fn to_records(&self) -> Vec<NoteRecord> {
        self.entries
            .iter()
            .map(|entry| match entry {
                ScoreEntry::Note(note) => NoteRecord(
                    note.time_ms,
                    note.lane as i64,
                    note.duration_ms,
                    note.pitch.label().to_string(),
                ),
                ScoreEntry::End { time_ms } => {
                    NoteRecord(*time_ms, END_SENTINEL_LANE, 0.0, String::new())
                }
            })
            .collect()
    }
}
