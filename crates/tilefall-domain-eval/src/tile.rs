use crate::geometry::FallGeometry;
use serde::{Deserialize, Serialize};
use tilefall_domain_score::{Note, Pitch};
use tilefall_ports::types::{LaneIndex, SongTimeMs, TileView};

/// A falling tile. While unhit, `y` advances by `fall_speed * delta` per frame and
/// must stay equal to [`Tile::y_at`] for the song time the frames add up to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u64,
    pub lane: LaneIndex,
    pub target_ms: SongTimeMs,
    pub spawned_at_ms: SongTimeMs,
    pub spawn_y: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub duration_ms: f64,
    pub pitch: Pitch,
    pub hit: bool,
}

impl Tile {
    pub fn spawn(id: u64, note: &Note, now_ms: SongTimeMs, geometry: &FallGeometry) -> Self {
        let fall_start = geometry.fall_start_ms(note.time_ms);
        let spawn_y = -geometry.tile_height + (now_ms - fall_start) * geometry.fall_speed;
        Self {
            id,
            lane: note.lane,
            target_ms: note.time_ms,
            spawned_at_ms: now_ms,
            spawn_y,
            y: spawn_y,
            width: geometry.lane_width(),
            height: geometry.tile_height,
            duration_ms: note.duration_ms,
            pitch: note.pitch.clone(),
            hit: false,
        }
    }

    pub fn advance(&mut self, delta_ms: f64, fall_speed: f64) {
        if !self.hit {
            self.y += fall_speed * delta_ms;
        }
    }

    pub fn y_at(&self, now_ms: SongTimeMs, fall_speed: f64) -> f64 {
        self.spawn_y + (now_ms - self.spawned_at_ms) * fall_speed
    }

    pub fn drift(&self, now_ms: SongTimeMs, fall_speed: f64) -> f64 {
        (self.y - self.y_at(now_ms, fall_speed)).abs()
    }

    pub fn leading_edge(&self) -> f64 {
        self.y + self.height
    }

    /// Song time at which the leading edge reaches the top of the hit zone.
    pub fn arrival_ms(&self, geometry: &FallGeometry) -> SongTimeMs {
        let distance = geometry.hit_zone_top() - (self.spawn_y + self.height);
        self.spawned_at_ms + distance / geometry.fall_speed
    }

    pub fn spans_y(&self, y: f64) -> bool {
        y >= self.y && y <= self.y + self.height
    }

    pub fn is_past_loss_line(&self, geometry: &FallGeometry) -> bool {
        !self.hit && self.y > geometry.loss_line()
    }

    pub fn is_off_screen(&self, geometry: &FallGeometry) -> bool {
        self.y >= geometry.exit_line()
    }

    pub fn view(&self, geometry: &FallGeometry) -> TileView {
        TileView {
            id: self.id,
            lane: self.lane,
            x: geometry.lane_left(self.lane),
            y: self.y,
            width: self.width,
            height: self.height,
            color_index: self.lane as usize,
        }
    }
}
