pub mod controller;
pub mod handles;

pub use controller::{
    CropCallbacks, CropProps, DragController, DragSession, EventStatus, PointerButton,
};
pub use handles::{HandleKind, HandleSpec, HitTarget, handle_specs, hit_test};

// Re-export types from crop-types for convenience
pub use crop_types::{Orientation, Rect, Vec2};
