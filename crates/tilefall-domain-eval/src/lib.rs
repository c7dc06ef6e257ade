pub mod geometry;
pub mod hit;
pub mod tile;

pub use geometry::*;
pub use hit::*;
pub use tile::*;
