use log::debug;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tilefall_infra_synth_simple::SimpleSynth;
use tilefall_ports::render::{lane_color, FrameRenderer, FrameSnapshot};
use tilefall_ports::timer::{FrameError, FrameTimer};
use tilefall_ports::types::HostTimeMs;

/// Advances a fixed step per frame without waiting.
pub struct FixedStepTimer {
    now: HostTimeMs,
    step: HostTimeMs,
}

impl FixedStepTimer {
    pub fn new(fps: f64) -> Self {
        Self {
            now: 0.0,
            step: 1000.0 / fps,
        }
    }
}

impl FrameTimer for FixedStepTimer {
    fn now(&self) -> HostTimeMs {
        self.now
    }

    fn next_frame(&mut self) -> Result<HostTimeMs, FrameError> {
        self.now += self.step;
        Ok(self.now)
    }
}

/// Sleeps until the next frame boundary of the wall clock.
pub struct WallClockTimer {
    origin: Instant,
    frame: Duration,
    next: Instant,
}

impl WallClockTimer {
    pub fn new(fps: f64) -> Self {
        let origin = Instant::now();
        let frame = Duration::from_secs_f64(1.0 / fps);
        Self {
            origin,
            frame,
            next: origin + frame,
        }
    }
}

impl FrameTimer for WallClockTimer {
    fn now(&self) -> HostTimeMs {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn next_frame(&mut self) -> Result<HostTimeMs, FrameError> {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }
        // a long stall skips frames instead of bursting to catch up
        self.next = Instant::now().max(self.next) + self.frame;
        Ok(self.now())
    }
}

/// Stands in for a canvas: logs the playfield and pulls the synth for each frame's span
/// of audio so cue output can be inspected.
pub struct LogRenderer {
    synth: Arc<SimpleSynth>,
    sample_rate_hz: u32,
    last_song_time_ms: f64,
    frames: u64,
    peak: f32,
    buf_l: Vec<f32>,
    buf_r: Vec<f32>,
}

impl LogRenderer {
    pub fn new(synth: Arc<SimpleSynth>, sample_rate_hz: u32) -> Self {
        Self {
            synth,
            sample_rate_hz,
            last_song_time_ms: 0.0,
            frames: 0,
            peak: 0.0,
            buf_l: Vec::new(),
            buf_r: Vec::new(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.frames += 1;

        let span_ms = (frame.song_time_ms - self.last_song_time_ms).max(0.0);
        self.last_song_time_ms = frame.song_time_ms;
        let samples = (span_ms * self.sample_rate_hz as f64 / 1000.0).round() as usize;
        if samples > 0 {
            self.buf_l.resize(samples, 0.0);
            self.buf_r.resize(samples, 0.0);
            self.synth.render(samples, &mut self.buf_l, &mut self.buf_r);
            let peak = self
                .buf_l
                .iter()
                .chain(self.buf_r.iter())
                .fold(0.0_f32, |acc, s| acc.max(s.abs()));
            self.peak = self.peak.max(peak);
        }

        if self.frames % 60 == 0 {
            let lanes: Vec<String> = frame
                .tiles
                .iter()
                .map(|tile| {
                    format!("{}:{}@{:.0}", tile.lane, lane_color(tile.color_index), tile.y)
                })
                .collect();
            debug!(
                "t={:.0}ms tiles=[{}] voices={}",
                frame.song_time_ms,
                lanes.join(" "),
                self.synth.active_voices()
            );
        }
    }
}
