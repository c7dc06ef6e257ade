pub mod cue;
pub mod render;
pub mod storage;
pub mod timer;
pub mod types;

pub use cue::*;
pub use render::*;
pub use storage::*;
pub use timer::*;
pub use types::*;
