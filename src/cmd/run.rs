use crate::reports;
use airkeys::camera::ReplaySource;
use airkeys::canvas::OverlayCanvas;
use airkeys::config::ClientConfig;
use airkeys::detector::HttpDetector;
use airkeys::encode::JpegDataUriEncoder;
use airkeys::error::ClResult;
use airkeys::snapshot;
use airkeys_core::capture::{CaptureLoop, CycleReport, FrameSource, LoopOptions, Session};
use airkeys_core::clock::SystemClock;
use airkeys_core::layout::KeyboardLayout;
use airkeys_core::render::Renderer;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub client: ClientConfig,

    /// Directory of images played back as the camera feed
    #[arg(long)]
    pub frames: PathBuf,

    /// Start over after the last frame instead of stopping
    #[arg(long, default_value_t = false)]
    pub loop_frames: bool,

    /// Keep a PNG of the latest composited frame here
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Stop after this many capture cycles
    #[arg(long)]
    pub max_frames: Option<u64>,
}

pub async fn run(args: &RunArgs, config: ClientConfig) -> ClResult<()> {
    let session_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let mut session = Session::new(session_id);

    let source = ReplaySource::open(&args.frames, args.loop_frames)?;
    let surface = OverlayCanvas::new(source.dimensions());

    let layout = KeyboardLayout::generate(&config.layout);
    if let Some((a, b)) = layout.first_overlap() {
        warn!("⚠️  Keys '{}' and '{}' overlap", a.label, b.label);
    }
    let (right, bottom) = layout.extent();
    let size = source.dimensions();
    if right > size.width as f32 || bottom > size.height as f32 {
        warn!(
            "⚠️  Keyboard spans {}x{} but the surface is only {}x{}",
            right, bottom, size.width, size.height
        );
    }

    let detector = HttpDetector::new(config.detector_endpoint(), config.request_timeout())?;
    info!("🛰️  Detector: {}", detector.endpoint());

    let renderer = Renderer {
        hover: !config.no_hover,
        ..Renderer::default()
    };
    let options = LoopOptions {
        min_cycle: config.min_cycle(),
        max_cycles: args.max_frames,
    };

    let mut capture = CaptureLoop::new(
        source,
        JpegDataUriEncoder::new(config.jpeg_quality),
        detector,
        SystemClock::new(),
        surface,
        layout,
    )
    .with_debounce(config.debounce())
    .with_renderer(renderer)
    .with_options(options);

    let snapshot_path = args.snapshot.clone();
    let on_cycle = |report: &CycleReport, surface: &OverlayCanvas, session: &Session| {
        let (Some(path), Some(frame)) = (&snapshot_path, &report.frame) else {
            return;
        };
        if let Err(e) = snapshot::write_png(path, frame, surface, session.output.as_str()) {
            warn!("Snapshot failed: {}", e);
        }
    };

    tokio::select! {
        _ = capture.run_with(&mut session, on_cycle) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Interrupted, shutting down");
        }
    }

    info!(
        "Session {} finished after {} cycles",
        session.id, session.stats.cycles
    );
    reports::print_session_summary(&session.id, &session.stats);
    println!("\nTyped: {}", session.output);
    Ok(())
}
