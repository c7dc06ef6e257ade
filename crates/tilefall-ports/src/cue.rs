use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum CueError {
    #[error("cue rejected: {0}")]
    Rejected(String),
}

/// Sound to play for a hit tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitCue {
    pub midi_note: u8,
    pub label: String,
    pub duration_secs: f32,
}

/// Thread model:
/// - play_cue is called from whichever thread resolves pointer input
/// - implementations that render audio must keep their render path realtime-safe
pub trait CuePort: Send + Sync {
    fn play_cue(&self, cue: &HitCue) -> Result<(), CueError>;
}
