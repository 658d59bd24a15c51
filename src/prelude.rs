//! Prelude module for common tweenkit types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tweenkit::prelude::*;`

pub use crate::core::{
    color::Color,
    config::{DiagnosticsConfig, EngineOptions, EngineProfile, FrameTimingConfig, TweenDefaults},
    geo::Point,
    transform::Transform,
    value::{Value, ValueKind},
};

pub use crate::animation::{
    easing::Easing,
    interpolation::{Interpolatable, RotationDirection},
    sequence::{SequenceMode, SequenceSpec, Step},
    tweening::{TweenSpec, TweenState},
};

pub use crate::engine::{
    events::{AnimationEvent, Completion, Outcome},
    registry::TargetId,
    scheduler::FrameClock,
    Handle, SequenceId, TweenEngine, TweenId,
};

pub use crate::target::{Animatable, PropertyKey, ViewState};

pub use crate::{Error as TweenError, Result};

pub use std::{cell::RefCell, rc::Rc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
