//! Raster overlay surface backed by an RGBA buffer.
//!
//! Primitives go through `embedded-graphics`; translucency is applied per
//! draw call by [`Layer`], which blends every emitted pixel source-over.

use airkeys_core::capture::Frame;
use airkeys_core::mapper::SurfaceSize;
use airkeys_core::render::{Rgba, Surface};
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{Rgb, RgbImage, Rgba as Px, RgbaImage};
use std::convert::Infallible;

/// One translucent pass over the canvas.
struct Layer<'a> {
    image: &'a mut RgbaImage,
    alpha: u8,
}

fn blend(dst: &mut Px<u8>, src: Rgb888, alpha: u8) {
    let sa = alpha as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Px([0, 0, 0, 0]);
        return;
    }
    let mix = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    *dst = Px([
        mix(src.r(), dst[0]),
        mix(src.g(), dst[1]),
        mix(src.b(), dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

impl OriginDimensions for Layer<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Layer<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.image.width() as i32, self.image.height() as i32);
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            blend(
                self.image.get_pixel_mut(point.x as u32, point.y as u32),
                color,
                self.alpha,
            );
        }
        Ok(())
    }
}

fn rgb(color: Rgba) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

fn px(v: f32) -> i32 {
    v.round() as i32
}

/// Half the advance and height of `FONT_10X20`.
const HALF_GLYPH: (f32, f32) = (5.0, 10.0);

#[derive(Debug, Clone)]
pub struct OverlayCanvas {
    image: RgbaImage,
}

impl OverlayCanvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let p = self.image.get_pixel(x, y);
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    fn layer(&mut self, color: Rgba) -> Layer<'_> {
        Layer {
            image: &mut self.image,
            alpha: color.a,
        }
    }

    fn bounds(&self) -> (f32, f32) {
        (self.image.width() as f32, self.image.height() as f32)
    }

    /// Whether a box can touch any pixel. Non-finite boxes never do.
    fn reaches(&self, left: f32, top: f32, right: f32, bottom: f32) -> bool {
        let (w, h) = self.bounds();
        [left, top, right, bottom].iter().all(|v| v.is_finite())
            && right >= 0.0
            && bottom >= 0.0
            && left <= w
            && top <= h
    }

    /// The part of a rectangle within `pad` pixels of the surface, so
    /// integer geometry downstream stays small.
    fn clip_rect(&self, x: f32, y: f32, w: f32, h: f32, pad: f32) -> Option<Rectangle> {
        if !self.reaches(x - pad, y - pad, x + w + pad, y + h + pad) {
            return None;
        }
        let (sw, sh) = self.bounds();
        let (x0, y0) = (x.max(-pad), y.max(-pad));
        let (x1, y1) = ((x + w).min(sw + pad), (y + h).min(sh + pad));
        Some(Rectangle::new(
            Point::new(px(x0), px(y0)),
            Size::new(
                (x1 - x0).round().max(0.0) as u32,
                (y1 - y0).round().max(0.0) as u32,
            ),
        ))
    }

    /// The overlay laid over `frame`. Areas outside the frame are black.
    pub fn composite(&self, frame: &Frame) -> RgbImage {
        let mut out = RgbImage::new(self.image.width(), self.image.height());
        for (x, y, dst) in out.enumerate_pixels_mut() {
            let base = if x < frame.width && y < frame.height {
                let i = ((y * frame.width + x) * 3) as usize;
                [frame.rgb[i], frame.rgb[i + 1], frame.rgb[i + 2]]
            } else {
                [0, 0, 0]
            };
            let over = self.image.get_pixel(x, y);
            let a = over[3] as f32 / 255.0;
            let mix = |o: u8, b: u8| (o as f32 * a + b as f32 * (1.0 - a)).round() as u8;
            *dst = Rgb([
                mix(over[0], base[0]),
                mix(over[1], base[1]),
                mix(over[2], base[2]),
            ]);
        }
        out
    }
}

impl Surface for OverlayCanvas {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.image.width(), self.image.height())
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Px([0, 0, 0, 0]);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let Some(rect) = self.clip_rect(x, y, w, h, 0.0) else {
            return;
        };
        let _ = rect
            .into_styled(PrimitiveStyle::with_fill(rgb(color)))
            .draw(&mut self.layer(color));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) {
        let stroke = width.round().max(1.0);
        // Clipped edges land outside the surface, so no false border shows.
        let Some(rect) = self.clip_rect(x, y, w, h, stroke + 1.0) else {
            return;
        };
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(rgb(color))
            .stroke_width(stroke as u32)
            .build();
        let _ = rect.into_styled(style).draw(&mut self.layer(color));
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let (w, h) = self.bounds();
        let r = radius.min(w + h);
        if !self.reaches(cx - r, cy - r, cx + r, cy + r) {
            return;
        }
        let diameter = (r * 2.0).round().max(1.0) as u32;
        let _ = Circle::with_center(Point::new(px(cx), px(cy)), diameter)
            .into_styled(PrimitiveStyle::with_fill(rgb(color)))
            .draw(&mut self.layer(color));
    }

    fn fill_text(&mut self, text: &str, cx: f32, cy: f32, color: Rgba) {
        let half_w = text.chars().count() as f32 * HALF_GLYPH.0;
        if !self.reaches(cx - half_w, cy - HALF_GLYPH.1, cx + half_w, cy + HALF_GLYPH.1) {
            return;
        }
        let character_style = MonoTextStyle::new(&FONT_10X20, rgb(color));
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let _ = Text::with_text_style(
            text,
            Point::new(px(cx), px(cy)),
            character_style,
            text_style,
        )
        .draw(&mut self.layer(color));
    }
}
