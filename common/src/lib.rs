use serde::{Deserialize, Serialize};

pub mod math;

/// Describes the rectangular region an agent is allowed to move in, with
/// {x,y} being the minimum corner. Unlike a conventional rectangle, `width`
/// and `height` carry the maximum x/y coordinate, not an extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1000.0, 1000.0)
    }
}
