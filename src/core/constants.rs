//! Engine-wide defaults kept in a single place.

/// Frame rate the engine assumes when no profile overrides it.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Largest delta a single frame may contribute, in milliseconds.
/// A stalled event loop must not make every tween jump to its end.
pub const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Capacity of each event subscriber channel.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Degrees in a full turn.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Back easing overshoot constant.
pub const BACK_OVERSHOOT: f64 = 1.70158;

/// Bounce easing constants.
pub const BOUNCE_N1: f64 = 7.5625;
pub const BOUNCE_D1: f64 = 2.75;
