//! Geometry wrappers for the salient bindings.
//!
//! [`Circle`] and [`Point`] own a `#[repr(C)]` copy of the matching library
//! struct and expose the position, containment and mouse-state operations.

pub mod circle;
pub mod deprecation;
pub mod point;

pub use circle::{Circle, CircleData};
pub use deprecation::Deprecation;
pub use point::{Point, PointData};

/// Shapes that track whether the mouse hovers or presses them.
pub trait Interactive {
    /// Whether the pixel `(px, py)` lies on the shape.
    fn contains(&self, px: i32, py: i32) -> bool;

    fn set_mouse_state(&mut self, hover: bool, down: bool);

    /// Refresh hover and press flags from the current mouse position.
    fn update_mouse(&mut self, mx: i32, my: i32, pressed: bool) {
        let hover = self.contains(mx, my);
        self.set_mouse_state(hover, hover && pressed);
    }
}
