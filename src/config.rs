use crate::error::{ClResult, ClientError};
use airkeys_core::consts::{DEBOUNCE_INTERVAL_MS, DEFAULT_MAX_FPS};
use airkeys_core::layout::LayoutSpec;
use airkeys_core::wire::PROCESS_FRAME_PATH;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DETECTOR_URL: &str = "http://localhost:5000";
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the hand-landmark detector
    #[arg(long, default_value = DEFAULT_DETECTOR_URL)]
    pub detector_url: String,

    /// JPEG quality of submitted frames (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    /// Minimum time between two accepted key presses
    #[arg(long, default_value_t = DEBOUNCE_INTERVAL_MS)]
    pub debounce_ms: u64,

    /// Upper bound on capture cycles per second
    #[arg(long, default_value_t = DEFAULT_MAX_FPS)]
    pub max_fps: u32,

    /// Give up on a detector request after this long. Unset = wait forever
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Do not highlight the key under the index fingertip
    #[arg(long, default_value_t = false)]
    pub no_hover: bool,

    // Only settable from a config file.
    #[arg(skip)]
    pub layout: LayoutSpec,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            detector_url: DEFAULT_DETECTOR_URL.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            debounce_ms: DEBOUNCE_INTERVAL_MS,
            max_fps: DEFAULT_MAX_FPS,
            request_timeout_ms: None,
            no_hover: false,
            layout: LayoutSpec::default(),
        }
    }
}

impl ClientConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ClResult<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            ClientError::Config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields the user typed on the command line; file values win
    /// over clap defaults.
    pub fn merge_from_cli(&mut self, cli: &ClientConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(detector_url);
        update_if_present!(jpeg_quality);
        update_if_present!(debounce_ms);
        update_if_present!(max_fps);
        update_if_present!(request_timeout_ms);
        update_if_present!(no_hover);
    }

    pub fn validate(&self) -> ClResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ClientError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_fps == 0 {
            return Err(ClientError::Config("max_fps must be positive".into()));
        }
        reqwest::Url::parse(&self.detector_url).map_err(|e| {
            ClientError::Config(format!("invalid detector_url '{}': {}", self.detector_url, e))
        })?;
        if self.layout.rows.iter().all(|r| r.is_empty()) {
            return Err(ClientError::Config("layout has no keys".into()));
        }
        Ok(())
    }

    /// Full URL of the frame-processing endpoint.
    pub fn detector_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.detector_url.trim_end_matches('/'),
            PROCESS_FRAME_PATH
        )
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn min_cycle(&self) -> Duration {
        Duration::from_secs(1) / self.max_fps.max(1)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
