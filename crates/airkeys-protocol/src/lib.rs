pub mod geometry;
pub mod wire;

pub use geometry::{FrameShape, KeyRegion, Landmark};
pub use wire::{ProcessFrameRequest, ProcessFrameResponse, PROCESS_FRAME_PATH};
