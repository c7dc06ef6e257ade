use crate::session::RoundSession;
use log::debug;
use tilefall_ports::render::FrameRenderer;
use tilefall_ports::timer::{FrameError, FrameTimer};
use tilefall_ports::types::HostTimeMs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    last_frame: Option<HostTimeMs>,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&mut self, timestamp: HostTimeMs) {
        self.last_frame = Some(timestamp);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame<R: FrameRenderer + ?Sized>(
        &mut self,
        timestamp: HostTimeMs,
        session: &mut RoundSession,
        renderer: &mut R,
    ) -> FrameControl {
        if !session.is_running() {
            self.last_frame = None;
            return FrameControl::Stop;
        }

        let delta_ms = match self.last_frame {
            Some(previous) => (timestamp - previous).max(0.0),
            None => 0.0,
        };
        self.last_frame = Some(timestamp);
        self.frames += 1;

        session.tick(delta_ms);
        renderer.render(&session.snapshot());

        if session.is_running() {
            FrameControl::Continue
        } else {
            self.last_frame = None;
            FrameControl::Stop
        }
    }

    pub fn run<T, R>(
        &mut self,
        timer: &mut T,
        session: &mut RoundSession,
        renderer: &mut R,
    ) -> Result<(), FrameError>
    where
        T: FrameTimer + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        self.latch(timer.now());
        while session.is_running() {
            let timestamp = timer.next_frame()?;
            if self.frame(timestamp, session, renderer) == FrameControl::Stop {
                break;
            }
        }
        debug!("frame loop stopped after {} frames", self.frames);
        Ok(())
    }
}
