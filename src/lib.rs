//! # tweenkit
//!
//! A frame-driven tweening engine.
//!
//! The engine interpolates scalar, color, point, angle and transform
//! properties of caller-owned targets over time, shaped by an easing curve.
//! Tweens can be composed into serial or parallel sequences, cancelled
//! individually, per target, or all at once.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use tweenkit::prelude::*;
//!
//! let view = Rc::new(RefCell::new(ViewState::default()));
//! let mut engine = TweenEngine::new();
//!
//! engine
//!     .start(
//!         TweenSpec::new(&view)
//!             .to(PropertyKey::Top, 80.0)
//!             .duration_ms(1000)
//!             .easing(Easing::OutBounce),
//!     )
//!     .unwrap();
//!
//! for _ in 0..100 {
//!     engine.tick(10.0);
//! }
//! assert_eq!(view.borrow().top, 80.0);
//! ```

pub mod animation;
pub mod core;
pub mod engine;
pub mod prelude;
pub mod target;

pub use crate::core::{
    color::Color,
    config::{EngineOptions, EngineProfile},
    geo::Point,
    transform::Transform,
    value::{Value, ValueKind},
};

pub use animation::{
    easing::Easing,
    interpolation::RotationDirection,
    sequence::{SequenceMode, SequenceSpec, Step},
    tweening::{TweenSpec, TweenState},
};

pub use engine::{
    events::{AnimationEvent, Completion, Outcome},
    Handle, SequenceId, TweenEngine, TweenId,
};

pub use target::{Animatable, PropertyKey, ViewState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TweenError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum TweenError {
    #[error("Unknown easing kind: {0}")]
    UnknownEasingKind(String),

    #[error("Unsupported value kind for {key}: expected {expected}, found {found}")]
    UnsupportedValueKind {
        key: PropertyKey,
        expected: ValueKind,
        found: String,
    },

    #[error("Invalid duration: {0}ms")]
    InvalidDuration(u64),

    #[error("Target is no longer alive")]
    StaleTarget,

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Target is already borrowed")]
    TargetBusy,

    #[error("Target does not expose property {0}")]
    UnsupportedProperty(PropertyKey),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = TweenError;

/// Install an `env_logger` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
