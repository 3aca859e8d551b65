/// Minimum time between two accepted key presses, in milliseconds.
/// Longer than a detector round trip so one physical press is not counted twice.
pub const DEBOUNCE_INTERVAL_MS: u64 = 500;

/// Landmarks per detected hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark index of the index fingertip.
pub const INDEX_FINGERTIP: usize = 8;

/// Label of the key that removes the last typed character.
pub const DELETE_LABEL: &str = "<-";

// Key grid geometry, in surface pixels.
pub const KEY_WIDTH: f32 = 85.0;
pub const KEY_HEIGHT: f32 = 85.0;
pub const DELETE_KEY_WIDTH: f32 = 120.0;
pub const KEY_MARGIN_X: f32 = 15.0;
pub const KEY_MARGIN_Y: f32 = 15.0;
pub const GRID_START_X: f32 = 50.0;
pub const GRID_START_Y: f32 = 50.0;

// Marker sizes, in surface pixels.
pub const LANDMARK_RADIUS: f32 = 5.0;
pub const FINGERTIP_RADIUS: f32 = 8.0;
pub const KEY_OUTLINE_WIDTH: f32 = 2.0;

/// Upper bound on capture cycles per second (one per display refresh).
pub const DEFAULT_MAX_FPS: u32 = 60;
