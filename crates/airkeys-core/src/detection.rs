use crate::consts::INDEX_FINGERTIP;
use crate::error::{AirKeysError, AkResult};
use crate::geometry::{FrameShape, Landmark};
use crate::wire::{ProcessFrameRequest, ProcessFrameResponse};
use tracing::warn;

/// Normalized outcome of one detector round trip. Never carried across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    pub landmarks: Vec<Landmark>,
    /// Present iff `landmarks` is non-empty.
    pub frame_shape: Option<FrameShape>,
    pub pressed_label: Option<String>,
}

impl DetectionResult {
    /// "No landmarks available": what every failed round trip turns into.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: ProcessFrameResponse) -> AkResult<Self> {
        if let Some(bad) = resp.landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(AirKeysError::Malformed(format!(
                "landmark {} has non-finite coordinates",
                bad
            )));
        }

        let pressed_label = resp.pressed_key.filter(|k| !k.is_empty());

        if resp.landmarks.is_empty() {
            return Ok(Self {
                landmarks: Vec::new(),
                frame_shape: None,
                pressed_label,
            });
        }

        if !resp.img_shape.is_usable() {
            return Err(AirKeysError::Malformed(format!(
                "unusable img_shape {}x{}",
                resp.img_shape.width, resp.img_shape.height
            )));
        }

        Ok(Self {
            landmarks: resp.landmarks,
            frame_shape: Some(resp.img_shape),
            pressed_label,
        })
    }

    /// Parses a 2xx response body.
    pub fn from_body(body: &str) -> AkResult<Self> {
        let resp: ProcessFrameResponse =
            serde_json::from_str(body).map_err(|e| AirKeysError::Malformed(e.to_string()))?;
        Self::from_response(resp)
    }

    pub fn has_landmarks(&self) -> bool {
        !self.landmarks.is_empty()
    }

    pub fn fingertip(&self) -> Option<Landmark> {
        self.landmarks.get(INDEX_FINGERTIP).copied()
    }
}

/// The remote hand-landmark detector.
///
/// One call is one request/response exchange. Implementations return the
/// body of a success reply and map everything else (non-success status,
/// transport failure) to an error.
#[allow(async_fn_in_trait)]
pub trait Detector {
    async fn process_frame(&self, request: &ProcessFrameRequest) -> AkResult<String>;
}

/// Result of [`InferenceClient::infer`]: always renderable.
#[derive(Debug)]
pub struct Inference {
    pub result: DetectionResult,
    /// Why `result` is the empty fallback, if it is one.
    pub failure: Option<AirKeysError>,
}

impl Inference {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

pub struct InferenceClient<D> {
    detector: D,
}

impl<D: Detector> InferenceClient<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub async fn try_infer(&self, image_data: String) -> AkResult<DetectionResult> {
        let request = ProcessFrameRequest { image_data };
        let body = self.detector.process_frame(&request).await?;
        DetectionResult::from_body(&body)
    }

    /// Never fails: any error is logged and replaced by the empty result.
    pub async fn infer(&self, image_data: String) -> Inference {
        match self.try_infer(image_data).await {
            Ok(result) => Inference {
                result,
                failure: None,
            },
            Err(e) => {
                warn!("Detector round trip failed, no landmarks this frame: {}", e);
                Inference {
                    result: DetectionResult::empty(),
                    failure: Some(e),
                }
            }
        }
    }
}
