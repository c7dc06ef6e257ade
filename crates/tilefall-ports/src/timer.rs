use crate::types::HostTimeMs;

#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("host timer stopped: {0}")]
    Stopped(String),
}

/// Host display-refresh primitive: blocks until the next frame and returns its timestamp.
pub trait FrameTimer {
    fn now(&self) -> HostTimeMs;
    fn next_frame(&mut self) -> Result<HostTimeMs, FrameError>;
}
