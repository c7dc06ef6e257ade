use crate::clock::GameClock;
use crate::config::{ConfigError, GameConfig};
use crate::ipc::{Command, Event, RoundOutcome, RoundState, RoundSummary};
use crate::scheduler::TileScheduler;
use crate::simulation::TileSimulation;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use tilefall_domain_eval::{HitDetector, Tile, TileHit};
use tilefall_domain_score::{import_records, Score, ScoreError};
use tilefall_ports::cue::{CuePort, HitCue};
use tilefall_ports::render::FrameSnapshot;
use tilefall_ports::types::{Playfield, PointerPoint, SongTimeMs};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("score error: {0}")]
    Score(#[from] ScoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no score loaded")]
    NoScore,
    #[error("a round is in progress")]
    RoundInProgress,
}

pub struct RoundSession {
    config: GameConfig,
    state: RoundState,
    points: u32,
    hits: u32,
    clock: GameClock,
    scheduler: TileScheduler,
    simulation: TileSimulation,
    detector: HitDetector,
    score_loaded: bool,
    cue: Option<Arc<dyn CuePort>>,
    events: VecDeque<Event>,
    summary: Option<RoundSummary>,
}

impl RoundSession {
    pub fn new(config: GameConfig, cue: Option<Arc<dyn CuePort>>) -> Self {
        Self {
            config,
            state: RoundState::Idle,
            points: 0,
            hits: 0,
            clock: GameClock::new(),
            scheduler: TileScheduler::new(),
            simulation: TileSimulation::new(),
            detector: HitDetector::new(config.geometry),
            score_loaded: false,
            cue,
            events: VecDeque::new(),
            summary: None,
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), SessionError> {
        match cmd {
            Command::LoadScore { records } => {
                let score = import_records(&records)?;
                self.load_score(score)?;
            }
            Command::Start => {
                self.start()?;
            }
            Command::Restart if self.state == RoundState::Idle => {
                warn!("restart ignored: no round has been played yet");
            }
            Command::Restart => {
                self.start()?;
            }
            Command::Pointer { points } => {
                self.handle_input(&points);
            }
            Command::ResizePlayfield { playfield } => {
                self.resize_playfield(playfield)?;
            }
        }
        Ok(())
    }

    pub fn load_score(&mut self, score: Score) -> Result<(), SessionError> {
        if self.state == RoundState::Running {
            return Err(SessionError::RoundInProgress);
        }
        score.check_lanes(self.config.geometry.lanes)?;

        info!(
            "loaded score {:?} with {} entries",
            score.title.as_deref().unwrap_or("untitled"),
            score.len()
        );
        self.scheduler.set_score(score);
        self.simulation.clear();
        self.score_loaded = true;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state == RoundState::Running {
            warn!("start ignored: round already running");
            return Ok(());
        }
        if !self.score_loaded {
            return Err(SessionError::NoScore);
        }

        self.clock.start();
        self.scheduler.reset();
        self.simulation.clear();
        self.points = 0;
        self.hits = 0;
        self.summary = None;
        self.state = RoundState::Running;
        info!("round started with {} score entries", self.scheduler.score().len());
        self.emit_state();
        Ok(())
    }

    pub fn resize_playfield(&mut self, playfield: Playfield) -> Result<(), SessionError> {
        if self.state == RoundState::Running {
            warn!("resize to {}x{} ignored while running", playfield.width, playfield.height);
            return Ok(());
        }
        self.config = self.config.with_playfield(playfield)?;
        self.detector = HitDetector::new(self.config.geometry);
        // leftover tiles were laid out for the old playfield
        self.simulation.clear();
        Ok(())
    }

    pub fn tick(&mut self, delta_ms: f64) -> RoundState {
        if self.state != RoundState::Running {
            return self.state;
        }

        self.clock.advance(delta_ms);
        let now = self.clock.now();
        let geometry = self.config.geometry;

        let spawned = self.scheduler.schedule_due(now, &geometry);
        for tile in &spawned {
            self.events.push_back(Event::TileSpawned {
                tile_id: tile.id,
                lane: tile.lane,
                target_ms: tile.target_ms,
            });
        }
        self.simulation.admit(spawned);
        self.simulation.advance(delta_ms.max(0.0), now, geometry.fall_speed);

        let missed = self
            .simulation
            .first_past_loss_line(&geometry)
            .map(|tile| (tile.id, tile.lane));
        if let Some((tile_id, lane)) = missed {
            info!(
                "tile {} in lane {} passed the loss line at {:.1}ms",
                tile_id, lane, now
            );
            self.finish(RoundOutcome::GameOver);
            return self.state;
        }

        let removed = self.simulation.prune(&geometry);
        if removed > 0 {
            debug!("pruned {} tiles", removed);
        }

        if self.scheduler.is_exhausted() && self.simulation.is_empty() {
            self.finish(RoundOutcome::Victory);
        }
        self.state
    }

    pub fn handle_input(&mut self, points: &[PointerPoint]) -> Vec<TileHit> {
        if self.state != RoundState::Running || points.is_empty() {
            return Vec::new();
        }

        let now = self.clock.now();
        let hits = self.simulation.resolve_hits(&self.detector, points, now);
        for hit in &hits {
            self.points = self.points.saturating_add(self.config.score_increment);
            self.hits += 1;
            debug!(
                "hit tile {} lane {} {} ({:+.1}ms)",
                hit.tile_id,
                hit.lane,
                hit.pitch,
                hit.delta_ms
            );
            self.play_cue(hit);
            self.events.push_back(Event::TileHit {
                tile_id: hit.tile_id,
                lane: hit.lane,
                pitch: hit.pitch.label().to_string(),
                duration_secs: hit.duration_secs(),
                delta_ms: hit.delta_ms,
                score: self.points,
            });
            self.events.push_back(Event::ScoreUpdated { score: self.points });
        }
        hits
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.simulation
            .snapshot(self.clock.now(), &self.config.geometry)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    pub fn score(&self) -> u32 {
        self.points
    }

    pub fn song_time_ms(&self) -> SongTimeMs {
        self.clock.now()
    }

    pub fn cursor(&self) -> usize {
        self.scheduler.cursor()
    }

    pub fn tiles(&self) -> &[Tile] {
        self.simulation.tiles()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        self.clock.stop();
        self.state = outcome.into();
        let summary = RoundSummary {
            outcome,
            score: self.points,
            hits: self.hits,
            song_time_ms: self.clock.now(),
        };
        info!(
            "round over: {:?} with score {} after {:.0}ms",
            outcome, summary.score, summary.song_time_ms
        );
        self.summary = Some(summary);
        self.events.push_back(Event::RoundOver {
            outcome,
            score: summary.score,
            song_time_ms: summary.song_time_ms,
        });
        self.emit_state();
    }

    fn play_cue(&self, hit: &TileHit) {
        let Some(cue) = self.cue.as_ref() else {
            return;
        };
        let request = HitCue {
            midi_note: hit.pitch.midi(),
            label: hit.pitch.label().to_string(),
            duration_secs: hit.duration_secs(),
        };
        if let Err(err) = cue.play_cue(&request) {
            warn!("cue for {} failed: {}", request.label, err);
        }
    }

    fn emit_state(&mut self) {
        self.events.push_back(Event::StateChanged {
            state: self.state,
            score: self.points,
        });
    }
}
