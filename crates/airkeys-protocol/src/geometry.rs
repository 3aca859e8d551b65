use serde::{Deserialize, Serialize};

/// One rectangular, labeled hit-area of the on-screen keyboard.
///
/// Coordinates are rendering-surface pixels, origin top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRegion {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl KeyRegion {
    pub fn new(label: impl Into<String>, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Strict interior test, edges excluded.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.x < px && px < self.x + self.w && self.y < py && py < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True when the two rectangles share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &KeyRegion) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// One hand joint in the detector's native frame coordinates.
///
/// A hand is 21 of these; index 8 is the index fingertip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel size of the image the detector actually analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameShape {
    pub width: f32,
    pub height: f32,
}

impl FrameShape {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A shape we can divide by.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
