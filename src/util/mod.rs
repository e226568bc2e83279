pub mod coord;
pub mod format;

pub use coord::{Coordinate, GeoPoint};
pub use format::format_danish;
