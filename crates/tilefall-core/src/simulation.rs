use tilefall_domain_eval::{FallGeometry, HitDetector, Tile, TileHit};
use tilefall_ports::render::FrameSnapshot;
use tilefall_ports::types::{PointerPoint, SongTimeMs};

#[derive(Debug, Default)]
pub struct TileSimulation {
    tiles: Vec<Tile>,
}

impl TileSimulation {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn admit(&mut self, tiles: Vec<Tile>) {
        self.tiles.extend(tiles);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn advance(&mut self, delta_ms: f64, now_ms: SongTimeMs, fall_speed: f64) {
        for tile in self.tiles.iter_mut() {
            // tiles spawned this tick already sit at their position for now_ms
            if tile.spawned_at_ms < now_ms {
                tile.advance(delta_ms, fall_speed);
            }
        }
    }

    pub fn first_past_loss_line(&self, geometry: &FallGeometry) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.is_past_loss_line(geometry))
    }

    pub fn prune(&mut self, geometry: &FallGeometry) -> usize {
        let before = self.tiles.len();
        // unhit tiles must also be past the loss line; at full tolerance it equals the exit line
        self.tiles.retain(|tile| {
            !tile.hit && !(tile.is_off_screen(geometry) && tile.is_past_loss_line(geometry))
        });
        before - self.tiles.len()
    }

    pub fn resolve_hits(
        &mut self,
        detector: &HitDetector,
        points: &[PointerPoint],
        now_ms: SongTimeMs,
    ) -> Vec<TileHit> {
        detector.resolve(&mut self.tiles, points, now_ms)
    }

    pub fn snapshot(&self, song_time_ms: SongTimeMs, geometry: &FallGeometry) -> FrameSnapshot {
        let mut tiles: Vec<_> = self
            .tiles
            .iter()
            .filter(|tile| !tile.hit)
            .map(|tile| tile.view(geometry))
            .collect();
        tiles.sort_by(|a, b| a.y.total_cmp(&b.y));

        FrameSnapshot {
            song_time_ms,
            playfield: geometry.playfield,
            hit_zone_top: geometry.hit_zone_top(),
            lanes: geometry.lanes,
            tiles,
        }
    }
}
