use airkeys_core::error::AirKeysError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP Client Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] AirKeysError),
}

impl ClientError {
    /// Startup failures the user has to fix (camera, permissions).
    pub fn is_capture_unavailable(&self) -> bool {
        matches!(self, ClientError::Core(AirKeysError::CaptureUnavailable(_)))
    }
}

pub type ClResult<T> = Result<T, ClientError>;
