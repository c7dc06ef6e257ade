use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub song_time_ms: SongTimeMs,
    pub playfield: Playfield,
    pub hit_zone_top: f64,
    pub lanes: u8,
    /// Unhit tiles, sorted by `y` ascending so they draw back-to-front.
    pub tiles: Vec<TileView>,
}

/// Draws one frame. Called once per tick on the frame thread.
pub trait FrameRenderer {
    fn render(&mut self, frame: &FrameSnapshot);
}

pub const LANE_COLORS: [&str; 4] = ["#38bdf8", "#fb7185", "#a78bfa", "#4ade80"];

/// Palette entry for a tile's color index, cycling past the fourth lane.
pub fn lane_color(color_index: usize) -> &'static str {
    LANE_COLORS[color_index % LANE_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_colors_cycle() {
        assert_eq!(lane_color(0), "#38bdf8");
        assert_eq!(lane_color(3), "#4ade80");
        assert_eq!(lane_color(5), "#fb7185");
    }
}
