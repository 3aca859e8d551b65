use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirKeysError {
    /// No usable video source. Fatal at startup.
    #[error("Capture Unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Frame Error: {0}")]
    Frame(String),

    #[error("Encoding Error: {0}")]
    Encode(String),

    #[error("Detector Error: HTTP {status}: {body}")]
    DetectorStatus { status: u16, body: String },

    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("Malformed Response: {0}")]
    Malformed(String),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AirKeysError {
    /// Steady-state failures that degrade one cycle instead of ending the session.
    pub fn is_transient(&self) -> bool {
        !matches!(self, AirKeysError::CaptureUnavailable(_))
    }
}

pub type AkResult<T> = Result<T, AirKeysError>;
