use serde::{Deserialize, Serialize};
use tilefall_ports::types::{LaneIndex, Playfield, SongTimeMs};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallGeometry {
    pub playfield: Playfield,
    pub lanes: u8,
    pub tile_height: f64,
    pub hit_zone_height: f64,
    /// Pixels per millisecond.
    pub fall_speed: f64,
    pub loss_tolerance: f64,
}

impl FallGeometry {
    pub fn lane_width(&self) -> f64 {
        self.playfield.width / self.lanes as f64
    }

    pub fn lane_left(&self, lane: LaneIndex) -> f64 {
        lane as f64 * self.lane_width()
    }

    /// Half-open `[left, left + width)` so a point on a lane divider belongs to the right lane.
    pub fn lane_contains(&self, lane: LaneIndex, x: f64) -> bool {
        let left = self.lane_left(lane);
        x >= left && x < left + self.lane_width()
    }

    pub fn hit_zone_top(&self) -> f64 {
        self.playfield.height - self.hit_zone_height
    }

    pub fn hit_zone_contains(&self, y: f64) -> bool {
        y >= self.hit_zone_top() && y <= self.playfield.height
    }

    pub fn fall_duration_ms(&self) -> f64 {
        self.hit_zone_top() / self.fall_speed
    }

    pub fn fall_start_ms(&self, target_ms: SongTimeMs) -> SongTimeMs {
        target_ms - self.fall_duration_ms()
    }

    pub fn loss_line(&self) -> f64 {
        self.playfield.height + self.tile_height * self.loss_tolerance
    }

    pub fn exit_line(&self) -> f64 {
        self.playfield.height + self.tile_height
    }
}
