use log::debug;
use tilefall_domain_eval::{FallGeometry, Tile};
use tilefall_domain_score::{Score, ScoreEntry};
use tilefall_ports::types::SongTimeMs;

pub struct TileScheduler {
    score: Score,
    cursor: usize,
    next_tile_id: u64,
}

impl TileScheduler {
    pub fn new() -> Self {
        Self {
            score: Score::default(),
            cursor: 0,
            next_tile_id: 1,
        }
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = score;
        self.reset();
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.next_tile_id = 1;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.score.len()
    }

    /// Admits every entry whose fall-start time is at or before `now_ms`. An end marker is
    /// consumed and ends the call, so anything after it waits for the next call.
    pub fn schedule_due(&mut self, now_ms: SongTimeMs, geometry: &FallGeometry) -> Vec<Tile> {
        let Self {
            score,
            cursor,
            next_tile_id,
        } = self;

        let mut spawned = Vec::new();
        while let Some(entry) = score.get(*cursor) {
            if geometry.fall_start_ms(entry.time_ms()) > now_ms {
                break;
            }
            *cursor += 1;

            match entry {
                ScoreEntry::End { .. } => {
                    debug!("end marker consumed at cursor {}", *cursor - 1);
                    break;
                }
                ScoreEntry::Note(note) => {
                    let tile = Tile::spawn(*next_tile_id, note, now_ms, geometry);
                    *next_tile_id += 1;
                    debug!(
                        "spawned tile {} lane {} target {:.1}ms at y {:.1}",
                        tile.id, tile.lane, tile.target_ms, tile.y
                    );
                    spawned.push(tile);
                }
            }
        }

        spawned
    }
}

impl Default for TileScheduler {
    fn default() -> Self {
        Self::new()
    }
}
