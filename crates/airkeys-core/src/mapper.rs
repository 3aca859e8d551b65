//! Detector frame -> rendering surface coordinates.
//!
//! Independent horizontal and vertical scaling only. No flip or rotation is
//! applied: the detector's frame and the displayed video are assumed to share
//! left-right orientation, and any mirroring must happen consistently upstream.

use crate::detection::DetectionResult;
use crate::geometry::{FrameShape, Landmark};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    scale_x: f32,
    scale_y: f32,
}

impl CoordinateMapper {
    /// `None` when either side has a zero or unusable dimension.
    pub fn new(frame: FrameShape, surface: SurfaceSize) -> Option<Self> {
        if !frame.is_usable() || surface.width == 0 || surface.height == 0 {
            return None;
        }
        Some(Self {
            scale_x: surface.width as f32 / frame.width,
            scale_y: surface.height as f32 / frame.height,
        })
    }

    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    pub fn map(&self, lm: Landmark) -> Landmark {
        Landmark::new(lm.x * self.scale_x, lm.y * self.scale_y)
    }

    /// Surface -> detector frame.
    pub fn unmap(&self, lm: Landmark) -> Landmark {
        Landmark::new(lm.x / self.scale_x, lm.y / self.scale_y)
    }

    pub fn map_all(&self, landmarks: &[Landmark]) -> Vec<Landmark> {
        landmarks.iter().map(|&lm| self.map(lm)).collect()
    }
}

/// Landmarks of `result` in surface coordinates.
///
/// `None` when there is nothing to draw or the frame scale is unknown.
pub fn map_detection(result: &DetectionResult, surface: SurfaceSize) -> Option<Vec<Landmark>> {
    if result.landmarks.is_empty() {
        return None;
    }
    let shape = result.frame_shape?;
    let mapper = CoordinateMapper::new(shape, surface)?;
    Some(mapper.map_all(&result.landmarks))
}
