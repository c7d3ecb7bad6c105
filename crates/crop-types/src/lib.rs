pub mod geometry;
pub mod orientation;

pub use geometry::{Rect, Vec2, resize_or_move};
pub use orientation::{Orientation, ParseOrientationError};
