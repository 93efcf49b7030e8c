//! Circle wrapper.

use crate::deprecation::Deprecation;
use crate::Interactive;

static SET_POS: Deprecation = Deprecation::new("Circle::set_pos", "Circle::set_pos is deprecated, use Circle::set_position");

/// Layout of the library's circle struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircleData {
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub mouse_hover: bool,
    pub mouse_down: bool,
}

/// A circle with mouse interaction flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circle {
    data: CircleData,
}

impl Circle {
    pub fn new(x: i32, y: i32, r: i32, mouse_hover: bool, mouse_down: bool) -> Self {
        Self {
            data: CircleData {
                x,
                y,
                r,
                mouse_hover,
                mouse_down,
            },
        }
    }

    pub fn x(&self) -> i32 {
        self.data.x
    }

    pub fn y(&self) -> i32 {
        self.data.y
    }

    pub fn r(&self) -> i32 {
        self.data.r
    }

    pub fn mouse_hover(&self) -> bool {
        self.data.mouse_hover
    }

    pub fn mouse_down(&self) -> bool {
        self.data.mouse_down
    }

    /// Move the center. Radius and flags are kept.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.data.x = x;
        self.data.y = y;
    }

    #[deprecated(note = "use `set_position`")]
    pub fn set_pos(&mut self, x: i32, y: i32) {
        SET_POS.notice();
        self.set_position(x, y);
    }

    /// The struct handed across the FFI boundary.
    pub fn data(&self) -> &CircleData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut CircleData {
        &mut self.data
    }
}

impl From<CircleData> for Circle {
    fn from(data: CircleData) -> Self {
        Self { data }
    }
}

impl Interactive for Circle {
    /// Inside or on the edge.
    fn contains(&self, px: i32, py: i32) -> bool {
        // Squared differences of i32 extremes overflow i64.
        let dx = i128::from(px) - i128::from(self.data.x);
        let dy = i128::from(py) - i128::from(self.data.y);
        let r = i128::from(self.data.r);
        dx * dx + dy * dy <= r * r
    }

    fn set_mouse_state(&mut self, hover: bool, down: bool) {
        self.data.mouse_hover = hover;
        self.data.mouse_down = down;
    }
}
