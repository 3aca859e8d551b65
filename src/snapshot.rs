use crate::canvas::OverlayCanvas;
use crate::error::ClResult;
use airkeys_core::capture::Frame;
use airkeys_core::render::{Rgba, Surface};
use image::RgbImage;
use std::path::Path;
use tracing::debug;

const BANNER_HEIGHT: f32 = 40.0;
const BANNER_FILL: Rgba = Rgba::new(175, 0, 175, 255);
/// Glyph advance of the overlay font.
const GLYPH_WIDTH: u32 = 10;

/// The last characters of `text` that fit in `width` pixels.
pub fn banner_tail(text: &str, width: u32) -> &str {
    let fits = (width / GLYPH_WIDTH).saturating_sub(2) as usize;
    let count = text.chars().count();
    if count <= fits {
        return text;
    }
    match text.char_indices().nth(count - fits) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Frame + overlay + a banner with the typed text along the bottom edge.
pub fn compose(frame: &Frame, overlay: &OverlayCanvas, typed: &str) -> RgbImage {
    let mut canvas = overlay.clone();
    let size = canvas.size();
    let top = (size.height as f32 - BANNER_HEIGHT).max(0.0);
    canvas.fill_rect(0.0, top, size.width as f32, BANNER_HEIGHT, BANNER_FILL);
    canvas.fill_text(
        banner_tail(typed, size.width),
        size.width as f32 / 2.0,
        top + BANNER_HEIGHT / 2.0,
        Rgba::WHITE,
    );
    canvas.composite(frame)
}

pub fn write_png<P: AsRef<Path>>(
    path: P,
    frame: &Frame,
    overlay: &OverlayCanvas,
    typed: &str,
) -> ClResult<()> {
    let path = path.as_ref();
    compose(frame, overlay, typed).save_with_format(path, image::ImageFormat::Png)?;
    debug!("Snapshot written to {}", path.display());
    Ok(())
}
