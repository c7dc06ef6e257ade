use crate::frame_driver::{FrameControl, FrameDriver};
use crate::ipc::{Command, Event, RoundState};
use crate::session::{RoundSession, SessionError};
use parking_lot::Mutex;
use std::sync::Arc;
use tilefall_domain_eval::TileHit;
use tilefall_ports::render::FrameRenderer;
use tilefall_ports::types::{HostTimeMs, PointerPoint};

/// Every frame and every pointer event runs under one lock.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<RoundSession>>,
}

impl SharedSession {
    pub fn new(session: RoundSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn handle_command(&self, cmd: Command) -> Result<(), SessionError> {
        self.inner.lock().handle_command(cmd)
    }

    pub fn pointer(&self, points: &[PointerPoint]) -> Vec<TileHit> {
        self.inner.lock().handle_input(points)
    }

    pub fn frame<R: FrameRenderer + ?Sized>(
        &self,
        driver: &mut FrameDriver,
        timestamp: HostTimeMs,
        renderer: &mut R,
    ) -> FrameControl {
        let mut session = self.inner.lock();
        driver.frame(timestamp, &mut session, renderer)
    }

    pub fn state(&self) -> RoundState {
        self.inner.lock().state()
    }

    pub fn score(&self) -> u32 {
        self.inner.lock().score()
    }

    pub fn drain_events(&self) -> Vec<Event> {
        self.inner.lock().drain_events()
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut RoundSession) -> T) -> T {
        let mut session = self.inner.lock();
        f(&mut session)
    }
}
