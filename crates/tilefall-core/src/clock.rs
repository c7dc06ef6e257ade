use tilefall_ports::types::SongTimeMs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

#[derive(Clone, Debug)]
pub struct GameClock {
    state: ClockState,
    song_time_ms: SongTimeMs,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            song_time_ms: 0.0,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn start(&mut self) {
        self.song_time_ms = 0.0;
        self.state = ClockState::Running;
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        if self.state != ClockState::Running {
            return;
        }
        // a host clock stepping backwards or a NaN delta must not rewind song time
        if delta_ms > 0.0 {
            self.song_time_ms += delta_ms;
        }
    }

    pub fn now(&self) -> SongTimeMs {
        self.song_time_ms
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
