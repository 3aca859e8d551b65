use crate::consts::{FINGERTIP_RADIUS, INDEX_FINGERTIP, KEY_OUTLINE_WIDTH, LANDMARK_RADIUS};
use crate::geometry::{KeyRegion, Landmark};
use crate::layout::KeyboardLayout;
use crate::mapper::SurfaceSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `alpha` in 0.0..=1.0.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self::new(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub key_fill: Rgba,
    pub key_stroke: Rgba,
    pub label: Rgba,
    pub hover_fill: Rgba,
    pub pressed_fill: Rgba,
    pub landmark: Rgba,
    pub fingertip: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            key_fill: Rgba::with_alpha(255, 0, 255, 0.5),
            key_stroke: Rgba::with_alpha(255, 255, 255, 0.7),
            label: Rgba::WHITE,
            hover_fill: Rgba::with_alpha(175, 0, 175, 0.7),
            pressed_fill: Rgba::with_alpha(0, 255, 0, 0.7),
            landmark: Rgba::new(0, 255, 255, 255),
            fingertip: Rgba::new(255, 0, 0, 255),
        }
    }
}

/// A 2-D drawing target.
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Fully transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);

    /// Text centered on `(cx, cy)` both ways.
    fn fill_text(&mut self, text: &str, cx: f32, cy: f32, color: Rgba);
}

/// Per-frame input of [`Renderer::draw`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Already in surface coordinates. Empty when the frame scale is unknown.
    pub landmarks: &'a [Landmark],
    /// Label of the press accepted this frame.
    pub pressed: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub palette: Palette,
    pub landmark_radius: f32,
    pub fingertip_radius: f32,
    pub outline_width: f32,
    /// Fill the key under the index fingertip.
    pub hover: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            landmark_radius: LANDMARK_RADIUS,
            fingertip_radius: FINGERTIP_RADIUS,
            outline_width: KEY_OUTLINE_WIDTH,
            hover: true,
        }
    }
}

impl Renderer {
    /// Paints one frame. Touches nothing but `surface`.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &KeyboardLayout,
        overlay: &Overlay<'_>,
    ) {
        surface.clear();

        for region in layout.regions() {
            self.draw_key(surface, region, self.palette.key_fill);
        }

        let fingertip = overlay.landmarks.get(INDEX_FINGERTIP);

        if self.hover {
            if let Some(region) = fingertip.and_then(|tip| layout.hit_test(tip.x, tip.y)) {
                self.draw_key(surface, region, self.palette.hover_fill);
            }
        }

        for lm in overlay.landmarks {
            surface.fill_circle(lm.x, lm.y, self.landmark_radius, self.palette.landmark);
        }
        if let Some(tip) = fingertip {
            surface.fill_circle(tip.x, tip.y, self.fingertip_radius, self.palette.fingertip);
        }

        // Unknown labels get no highlight.
        if let Some(region) = overlay.pressed.and_then(|label| layout.find(label)) {
            self.draw_key(surface, region, self.palette.pressed_fill);
        }
    }

    fn draw_key<S: Surface + ?Sized>(&self, surface: &mut S, region: &KeyRegion, fill: Rgba) {
        surface.fill_rect(region.x, region.y, region.w, region.h, fill);
        surface.stroke_rect(
            region.x,
            region.y,
            region.w,
            region.h,
            self.outline_width,
            self.palette.key_stroke,
        );
        let (cx, cy) = region.center();
        surface.fill_text(&region.label, cx, cy, self.palette.label);
    }
}
