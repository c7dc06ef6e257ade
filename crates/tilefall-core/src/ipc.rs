use serde::{Deserialize, Serialize};
use tilefall_domain_score::NoteRecord;
use tilefall_ports::types::{LaneIndex, Playfield, PointerPoint, SongTimeMs};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    LoadScore { records: Vec<NoteRecord> },
    Start,
    Restart,
    Pointer { points: Vec<PointerPoint> },
    ResizePlayfield { playfield: Playfield },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Idle,
    Running,
    GameOver,
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    GameOver,
    Victory,
}

impl From<RoundOutcome> for RoundState {
    fn from(outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::GameOver => RoundState::GameOver,
            RoundOutcome::Victory => RoundState::Victory,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub score: u32,
    pub hits: u32,
    pub song_time_ms: SongTimeMs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    StateChanged { state: RoundState, score: u32 },
    TileSpawned { tile_id: u64, lane: LaneIndex, target_ms: SongTimeMs },
    TileHit {
        tile_id: u64,
        lane: LaneIndex,
        pitch: String,
        duration_secs: f32,
        delta_ms: f64,
        score: u32,
    },
    ScoreUpdated { score: u32 },
    RoundOver {
        outcome: RoundOutcome,
        score: u32,
        song_time_ms: SongTimeMs,
    },
}
