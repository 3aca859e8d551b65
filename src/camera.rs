//! Replays a directory of still images as the live video source.

use airkeys_core::capture::{Frame, FrameSource};
use airkeys_core::error::{AirKeysError, AkResult};
use airkeys_core::mapper::SurfaceSize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<PathBuf>,
    cursor: usize,
    looping: bool,
    size: SurfaceSize,
}

impl ReplaySource {
    /// Lists frames in lexical order and takes the stream size from the first
    /// one that decodes.
    ///
    /// Fails with `CaptureUnavailable` when no frame decodes. Broken frames
    /// stay in the sequence and fail only their own grab.
    pub fn open<P: AsRef<Path>>(dir: P, looping: bool) -> AkResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AirKeysError::CaptureUnavailable(format!(
                "video source '{}' does not exist or is not a directory",
                dir.display()
            )));
        }

        let frames: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!("Skipping unreadable entry in '{}': {}", dir.display(), err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && is_frame_file(e.path()))
            .map(|e| e.into_path())
            .collect();

        // The stream size comes from the first frame that decodes.
        let size = frames.iter().find_map(|path| match image::image_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                warn!("Skipping undecodable frame '{}': {}", path.display(), e);
                None
            }
        });

        let Some((width, height)) = size else {
            return Err(AirKeysError::CaptureUnavailable(format!(
                "no decodable frames found in '{}'",
                dir.display()
            )));
        };

        info!(
            "📷 Video source: {} frames at {}x{}{}",
            frames.len(),
            width,
            height,
            if looping { " (looping)" } else { "" }
        );

        Ok(Self {
            frames,
            cursor: 0,
            looping,
            size: SurfaceSize::new(width, height),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ReplaySource {
    fn dimensions(&self) -> SurfaceSize {
        self.size
    }

    fn is_active(&self) -> bool {
        self.looping || self.cursor < self.frames.len()
    }

    fn grab(&mut self) -> AkResult<Frame> {
        let path = &self.frames[self.cursor % self.frames.len()];
        self.cursor += 1;
        debug!("Grabbing {}", path.display());

        let img = image::open(path)
            .map_err(|e| AirKeysError::Frame(format!("{}: {}", path.display(), e)))?
            .to_rgb8();

        if img.width() != self.size.width || img.height() != self.size.height {
            return Err(AirKeysError::Frame(format!(
                "{} is {}x{}, stream is {}x{}",
                path.display(),
                img.width(),
                img.height(),
                self.size.width,
                self.size.height
            )));
        }

        Frame::new(img.width(), img.height(), img.into_raw())
    }
}
