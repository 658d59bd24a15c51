pub mod easing;
pub mod interpolation;
pub mod sequence;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use easing::Easing;
pub use interpolation::{interpolate, Interpolatable, Interpolation, RotationDirection};
pub use sequence::{SequenceMode, SequenceSpec, Step};
pub use tweening::{
    CompletionCallback, EasingSelector, PropertyDescriptor, PropertySelector, Tween, TweenSpec,
    TweenState, UpdateCallback,
};
