use airkeys_core::capture::{Frame, FrameEncoder};
use airkeys_core::error::{AirKeysError, AkResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Lossy JPEG in a data URI, the payload format the detector expects.
#[derive(Debug, Clone, Copy)]
pub struct JpegDataUriEncoder {
    quality: u8,
}

impl JpegDataUriEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl FrameEncoder for JpegDataUriEncoder {
    fn encode(&self, frame: &Frame) -> AkResult<String> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode(&frame.rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
            .map_err(|e| AirKeysError::Encode(e.to_string()))?;

        let mut uri = String::with_capacity(JPEG_DATA_URI_PREFIX.len() + jpeg.len() * 4 / 3 + 4);
        uri.push_str(JPEG_DATA_URI_PREFIX);
        BASE64.encode_string(&jpeg, &mut uri);
        Ok(uri)
    }
}

/// Bytes behind a base64 data URI. A bare base64 string is accepted too.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let payload = match uri.split_once(',') {
        Some((_, data)) => data,
        None => uri,
    };
    BASE64.decode(payload).ok()
}
