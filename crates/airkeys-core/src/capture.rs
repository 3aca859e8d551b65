//! The capture → detect → resolve → render cycle.
//!
//! One logical thread of control. A cycle runs end to end before the next
//! one is scheduled, so frame submissions are never pipelined: a slow
//! detector lowers the frame rate instead of queueing work.

use crate::clock::Clock;
use crate::consts::{DEBOUNCE_INTERVAL_MS, DEFAULT_MAX_FPS};
use crate::detection::{DetectionResult, Detector, InferenceClient};
use crate::error::{AirKeysError, AkResult};
use crate::layout::KeyboardLayout;
use crate::mapper::{map_detection, SurfaceSize};
use crate::press::{OutputBuffer, PressOutcome, PressResolver, PressState};
use crate::render::{Overlay, Renderer, Surface};
use serde::Serialize;
use std::time::Duration;
use strum::Display;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// One RGB8 video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> AkResult<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(AirKeysError::Frame(format!(
                "{}x{} frame needs {} bytes, got {}",
                width,
                height,
                expected,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// The live video.
pub trait FrameSource {
    /// Native resolution; sizes the rendering surface once at startup.
    fn dimensions(&self) -> SurfaceSize;

    /// False once paused or ended. Terminal for the capture loop.
    fn is_active(&self) -> bool;

    fn grab(&mut self) -> AkResult<Frame>;
}

/// Frame → detector payload (a data URI).
pub trait FrameEncoder {
    fn encode(&self, frame: &Frame) -> AkResult<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub cycles: u64,
    pub rendered: u64,
    pub degraded: u64,
    pub accepted: u64,
    pub debounced: u64,
}

/// Everything that outlives a single cycle. Single owner, threaded through
/// each cycle by `&mut`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub press: PressState,
    pub output: OutputBuffer,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            press: PressState::new(),
            output: OutputBuffer::new(),
            stats: SessionStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CycleStatus {
    Rendered,
    /// Something failed; the default keyboard was drawn instead.
    Degraded,
    /// The source was paused or ended. Nothing was drawn.
    SourceInactive,
}

#[derive(Debug)]
pub struct CycleReport {
    pub status: CycleStatus,
    pub frame: Option<Frame>,
    pub detection: DetectionResult,
    pub press: PressOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct LoopOptions {
    /// Floor on the time between cycle starts.
    #[builder(default = Duration::from_secs(1) / DEFAULT_MAX_FPS)]
    pub min_cycle: Duration,
    /// Stop after this many cycles.
    #[builder(default, setter(strip_option))]
    pub max_cycles: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct CaptureLoop<S, E, D, C, R> {
    source: S,
    encoder: E,
    client: InferenceClient<D>,
    clock: C,
    surface: R,
    layout: KeyboardLayout,
    resolver: PressResolver,
    renderer: Renderer,
    options: LoopOptions,
}

impl<S, E, D, C, R> CaptureLoop<S, E, D, C, R>
where
    S: FrameSource,
    E: FrameEncoder,
    D: Detector,
    C: Clock,
    R: Surface,
{
    pub fn new(
        source: S,
        encoder: E,
        detector: D,
        clock: C,
        surface: R,
        layout: KeyboardLayout,
    ) -> Self {
        let resolver = PressResolver::new(
            Duration::from_millis(DEBOUNCE_INTERVAL_MS),
            layout.delete_label().to_string(),
        );
        Self {
            source,
            encoder,
            client: InferenceClient::new(detector),
            clock,
            surface,
            layout,
            resolver,
            renderer: Renderer::default(),
            options: LoopOptions::default(),
        }
    }

    pub fn with_debounce(mut self, interval: Duration) -> Self {
        self.resolver = PressResolver::new(interval, self.layout.delete_label().to_string());
        self
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_options(mut self, options: LoopOptions) -> Self {
        self.options = options;
        self
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn resolver(&self) -> &PressResolver {
        &self.resolver
    }

    /// Grabs and encodes one frame. Any failure here skips the round trip.
    fn capture(&mut self) -> (Option<Frame>, AkResult<String>) {
        match self.source.grab() {
            Ok(frame) => {
                let payload = self.encoder.encode(&frame);
                (Some(frame), payload)
            }
            Err(e) => (None, Err(e)),
        }
    }

    /// One full cycle. Never fails: every steady-state error degrades to a
    /// landmark-free keyboard.
    pub async fn run_cycle(&mut self, session: &mut Session) -> CycleReport {
        if !self.source.is_active() {
            return CycleReport {
                status: CycleStatus::SourceInactive,
                frame: None,
                detection: DetectionResult::empty(),
                press: PressOutcome::NoPress,
            };
        }
        session.stats.cycles += 1;

        let (frame, payload) = self.capture();
        let (detection, degraded) = match payload {
            Ok(image_data) => {
                let inference = self.client.infer(image_data).await;
                let degraded = inference.is_degraded();
                (inference.result, degraded)
            }
            Err(e) => {
                warn!("Capture failed, drawing bare keyboard: {}", e);
                (DetectionResult::empty(), true)
            }
        };

        let mapped = map_detection(&detection, self.surface.size()).unwrap_or_default();

        let press = self.resolver.resolve(
            detection.pressed_label.as_deref(),
            self.clock.now(),
            &mut session.press,
            &mut session.output,
        );
        match &press {
            PressOutcome::Accepted(_) => session.stats.accepted += 1,
            PressOutcome::Debounced { .. } => session.stats.debounced += 1,
            PressOutcome::NoPress => {}
        }

        let overlay = Overlay {
            landmarks: &mapped,
            pressed: press.accepted().map(|p| p.label.as_str()),
        };
        self.renderer.draw(&mut self.surface, &self.layout, &overlay);

        let status = if degraded {
            session.stats.degraded += 1;
            CycleStatus::Degraded
        } else {
            session.stats.rendered += 1;
            CycleStatus::Rendered
        };

        CycleReport {
            status,
            frame,
            detection,
            press,
        }
    }

    /// Runs cycles until the source goes inactive or `max_cycles` is reached.
    /// `on_cycle` sees each finished cycle before the next is scheduled.
    pub async fn run_with<F>(&mut self, session: &mut Session, mut on_cycle: F) -> SessionStats
    where
        F: FnMut(&CycleReport, &R, &Session),
    {
        info!("🎥 Capture loop started (session {})", session.id);
        loop {
            if let Some(max) = self.options.max_cycles {
                if session.stats.cycles >= max {
                    info!("Reached {} cycles, stopping", max);
                    break;
                }
            }

            let started = tokio::time::Instant::now();
            let report = self.run_cycle(session).await;
            if report.status == CycleStatus::SourceInactive {
                info!("Video source inactive, capture loop stopped");
                break;
            }
            on_cycle(&report, &self.surface, session);

            let spent = started.elapsed();
            if spent < self.options.min_cycle {
                tokio::time::sleep(self.options.min_cycle - spent).await;
            } else {
                tokio::task::yield_now().await;
            }
        }
        session.stats.clone()
    }

    pub async fn run(&mut self, session: &mut Session) -> SessionStats {
        self.run_with(session, |_, _, _| {}).await
    }
}
