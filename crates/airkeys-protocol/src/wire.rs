use crate::geometry::{FrameShape, Landmark};
use serde::{Deserialize, Serialize};

/// Path of the detector endpoint, relative to the detector base URL.
pub const PROCESS_FRAME_PATH: &str = "/process_frame";

/// Body of the one POST issued per capture cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessFrameRequest {
    /// `data:image/jpeg;base64,...`
    pub image_data: String,
}

/// Successful detector reply.
///
/// `landmarks` and `img_shape` are required; a body without them does not
/// deserialize. `pressed_key` may be missing or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFrameResponse {
    pub landmarks: Vec<Landmark>,
    pub img_shape: FrameShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressed_key: Option<String>,
}
