#![allow(dead_code)]

use airkeys_core::capture::{Frame, FrameEncoder, FrameSource};
use airkeys_core::clock::Clock;
use airkeys_core::detection::Detector;
use airkeys_core::error::{AirKeysError, AkResult};
use airkeys_core::mapper::SurfaceSize;
use airkeys_core::render::{Rgba, Surface};
use airkeys_core::wire::ProcessFrameRequest;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Clock the test moves by hand. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn set(&self, t: Duration) {
        self.0.set(t);
    }

    pub fn advance(&self, d: Duration) {
        self.0.set(self.0.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    StrokeRect { x: f32, y: f32, w: f32, h: f32 },
    Circle { cx: f32, cy: f32, r: f32, color: Rgba },
    Text { text: String, cx: f32, cy: f32 },
}

/// Surface that keeps the draw calls of the last frame.
pub struct RecordingSurface {
    pub size: SurfaceSize,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn circles(&self) -> Vec<&DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).collect()
    }

    pub fn fills_with(&self, color: Rgba) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { color: c, .. } if *c == color))
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ops.push(DrawOp::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _width: f32, _color: Rgba) {
        self.ops.push(DrawOp::StrokeRect { x, y, w, h });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            r: radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, cx: f32, cy: f32, _color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            cx,
            cy,
        });
    }
}

/// Source yielding `remaining` blank frames, then going inactive.
/// With a clock attached, each grab moves time forward by `step` afterwards.
pub struct ScriptedSource {
    pub size: SurfaceSize,
    pub remaining: usize,
    pub grabs: usize,
    pub fail_on: Vec<usize>,
    clock: Option<(ManualClock, Duration)>,
}

impl ScriptedSource {
    pub fn new(frames: usize, width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            remaining: frames,
            grabs: 0,
            fail_on: Vec::new(),
            clock: None,
        }
    }

    pub fn with_clock(mut self, clock: ManualClock, step: Duration) -> Self {
        self.clock = Some((clock, step));
        self
    }

    pub fn failing_on(mut self, grab_index: usize) -> Self {
        self.fail_on.push(grab_index);
        self
    }
}

impl FrameSource for ScriptedSource {
    fn dimensions(&self) -> SurfaceSize {
        self.size
    }

    fn is_active(&self) -> bool {
        self.remaining > 0
    }

    fn grab(&mut self) -> AkResult<Frame> {
        let index = self.grabs;
        self.grabs += 1;
        self.remaining = self.remaining.saturating_sub(1);
        if let Some((clock, step)) = &self.clock {
            if index > 0 {
                clock.advance(*step);
            }
        }
        if self.fail_on.contains(&index) {
            return Err(AirKeysError::Frame(format!("grab {} dropped", index)));
        }
        let (w, h) = (self.size.width, self.size.height);
        Frame::new(w, h, vec![0; w as usize * h as usize * 3])
    }
}

/// Encoder that tags the payload with the frame size.
pub struct TagEncoder;

impl FrameEncoder for TagEncoder {
    fn encode(&self, frame: &Frame) -> AkResult<String> {
        Ok(format!("data:image/jpeg;base64,{}x{}", frame.width, frame.height))
    }
}

pub struct FailingEncoder;

impl FrameEncoder for FailingEncoder {
    fn encode(&self, _frame: &Frame) -> AkResult<String> {
        Err(AirKeysError::Encode("encoder offline".into()))
    }
}

/// Detector replaying canned outcomes; an empty hand once the script runs out.
#[derive(Default)]
pub struct ScriptedDetector {
    pub replies: RefCell<VecDeque<AkResult<String>>>,
    pub requests: RefCell<Vec<String>>,
}

impl ScriptedDetector {
    pub fn new(replies: Vec<AkResult<String>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn repeating(body: String, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(body.clone())).collect())
    }
}

impl Detector for ScriptedDetector {
    async fn process_frame(&self, request: &ProcessFrameRequest) -> AkResult<String> {
        self.requests.borrow_mut().push(request.image_data.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(empty_body()))
    }
}

impl Detector for &ScriptedDetector {
    async fn process_frame(&self, request: &ProcessFrameRequest) -> AkResult<String> {
        (**self).process_frame(request).await
    }
}

/// Answers with an empty hand after `latency` of tokio time.
pub struct SlowDetector {
    pub latency: Duration,
}

impl Detector for SlowDetector {
    async fn process_frame(&self, _request: &ProcessFrameRequest) -> AkResult<String> {
        tokio::time::sleep(self.latency).await;
        Ok(empty_body())
    }
}

/// 21 landmarks on a diagonal with the fingertip at `tip`, in a `w`x`h` frame.
pub fn hand_body(tip: (f32, f32), w: f32, h: f32, pressed: Option<&str>) -> String {
    let landmarks: Vec<_> = (0..21)
        .map(|i| {
            if i == 8 {
                json!({ "x": tip.0, "y": tip.1 })
            } else {
                json!({ "x": i as f32, "y": i as f32 })
            }
        })
        .collect();
    json!({
        "landmarks": landmarks,
        "img_shape": { "width": w, "height": h },
        "pressed_key": pressed,
    })
    .to_string()
}

pub fn empty_body() -> String {
    json!({
        "landmarks": [],
        "img_shape": { "width": 640, "height": 480 },
        "pressed_key": null,
    })
    .to_string()
}
