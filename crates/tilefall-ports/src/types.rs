use serde::{Deserialize, Serialize};
use std::fmt;

pub type SongTimeMs = f64; // song time, monotonic while a round runs
pub type HostTimeMs = f64; // host refresh timestamp, like a performance counter
pub type LaneIndex = u8;

/// Pointer position already translated into playfield-local pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerPoint {
    pub x: f64,
    pub y: f64,
}

impl PointerPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Playfield {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub id: u64,
    pub lane: LaneIndex,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongSlug(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Volume01(pub f32);

impl Volume01 {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl fmt::Display for SongSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
