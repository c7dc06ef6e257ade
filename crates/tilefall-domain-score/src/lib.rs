pub mod json_import;
pub mod model;
pub mod pitch;

pub use json_import::*;
pub use model::*;
pub use pitch::*;
