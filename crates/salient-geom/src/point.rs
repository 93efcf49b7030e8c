//! Point wrapper.

use crate::deprecation::Deprecation;
use crate::Interactive;

static SET_POS: Deprecation = Deprecation::new("Point::set_pos", "Point::set_pos is deprecated, use Point::set_position");

/// Layout of the library's point struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointData {
    pub x: i32,
    pub y: i32,
    pub mouse_hover: bool,
    pub mouse_down: bool,
}

/// A single pixel with mouse interaction flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    data: PointData,
}

impl Point {
    pub fn new(x: i32, y: i32, mouse_hover: bool, mouse_down: bool) -> Self {
        Self {
            data: PointData {
                x,
                y,
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

    pub fn mouse_hover(&self) -> bool {
        self.data.mouse_hover
    }

    pub fn mouse_down(&self) -> bool {
        self.data.mouse_down
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.data.x = x;
        self.data.y = y;
    }

    #[deprecated(note = "use `set_position`")]
    pub fn set_pos(&mut self, x: i32, y: i32) {
        SET_POS.notice();
        self.set_position(x, y);
    }

    pub fn data(&self) -> &PointData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut PointData {
        &mut self.data
    }
}

impl From<PointData> for Point {
    fn from(data: PointData) -> Self {
        Self { data }
    }
}

impl Interactive for Point {
    fn contains(&self, px: i32, py: i32) -> bool {
        px == self.data.x && py == self.data.y
    }

    fn set_mouse_state(&mut self, hover: bool, down: bool) {
        self.data.mouse_hover = hover;
        self.data.mouse_down = down;
    }
}
