use crate::types::*;
use serde::{Deserialize, Serialize};

fn default_lanes() -> u8 {
    4
}

fn default_tile_height() -> f64 {
    150.0
}

fn default_fall_speed() -> f64 {
    0.6
}

fn default_hit_zone_height() -> f64 {
    300.0
}

fn default_loss_tolerance() -> f64 {
    0.20
}

fn default_score_increment() -> u32 {
    10
}

fn default_cue_volume() -> Volume01 {
    Volume01::new(0.8)
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("song not found: {0}")]
    NotFound(SongSlug),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    #[serde(default = "default_lanes")]
    pub lanes: u8,
    #[serde(default = "default_tile_height")]
    pub tile_height: f64,
    /// Pixels per millisecond.
    #[serde(default = "default_fall_speed")]
    pub fall_speed: f64,
    #[serde(default = "default_hit_zone_height")]
    pub hit_zone_height: f64,
    /// Fraction of a tile height an unhit tile may pass the floor before the round is lost.
    #[serde(default = "default_loss_tolerance")]
    pub loss_tolerance: f64,
    #[serde(default = "default_score_increment")]
    pub score_increment: u32,
    #[serde(default = "default_cue_volume")]
    pub cue_volume: Volume01,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            lanes: default_lanes(),
            tile_height: default_tile_height(),
            fall_speed: default_fall_speed(),
            hit_zone_height: default_hit_zone_height(),
            loss_tolerance: default_loss_tolerance(),
            score_increment: default_score_increment(),
            cue_volume: default_cue_volume(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub slug: SongSlug,
    pub title: String,
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<GameSettings, StorageError>;
    fn save_settings(&self, s: &GameSettings) -> Result<(), StorageError>;

    fn list_songs(&self) -> Result<Vec<SongInfo>, StorageError>;
    /// Raw score text for the song; parsing belongs to the score domain.
    fn load_song(&self, slug: &SongSlug) -> Result<String, StorageError>;
}
