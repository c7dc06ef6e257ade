use crate::geometry::FallGeometry;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use tilefall_domain_score::Pitch;
use tilefall_ports::types::{LaneIndex, PointerPoint, SongTimeMs};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileHit {
    pub tile_id: u64,
    pub lane: LaneIndex,
    pub pitch: Pitch,
    pub duration_ms: f64,
    /// Positive when the tap came after the tile's target time.
    pub delta_ms: f64,
}

impl TileHit {
    pub fn duration_secs(&self) -> f32 {
        (self.duration_ms / 1000.0) as f32
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HitDetector {
    geometry: FallGeometry,
}

impl HitDetector {
    pub fn new(geometry: FallGeometry) -> Self {
        Self { geometry }
    }

    /// Resolves each point to at most one tile. `tiles` must be in creation order; the
    /// newest tile is tried first. Tiles consumed by an earlier point are skipped.
    pub fn resolve(
        &self,
        tiles: &mut [Tile],
        points: &[PointerPoint],
        now_ms: SongTimeMs,
    ) -> Vec<TileHit> {
        let mut hits = Vec::new();
        for point in points {
            let Some(tile) = tiles
                .iter_mut()
                .rev()
                .find(|tile| self.accepts(tile, *point))
            else {
                continue;
            };

            tile.hit = true;
            hits.push(TileHit {
                tile_id: tile.id,
                lane: tile.lane,
                pitch: tile.pitch.clone(),
                duration_ms: tile.duration_ms,
                delta_ms: now_ms - tile.target_ms,
            });
        }
        hits
    }

    fn accepts(&self, tile: &Tile, point: PointerPoint) -> bool {
        !tile.hit
            && self.geometry.lane_contains(tile.lane, point.x)
            && self.geometry.hit_zone_contains(point.y)
            && tile.spans_y(point.y)
    }
}
