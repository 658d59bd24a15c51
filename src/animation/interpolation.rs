use serde::{Deserialize, Serialize};

use crate::core::{
    color::Color, constants::FULL_TURN_DEG, geo::Point, transform::Transform, value::Value,
    value::ValueKind,
};
use crate::target::PropertyKey;
use crate::{Result, TweenError};

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Which way an angle travels between its start and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationDirection {
    /// Take the short way round, never more than half a turn.
    #[default]
    Shortest,
    /// Always increase the angle.
    Clockwise,
    /// Always decrease the angle.
    CounterClockwise,
    /// Plain numeric blend; `0 -> 720` spins twice.
    Direct,
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Interpolate an angle in degrees along `direction`
    pub fn angle(start: f64, end: f64, t: f64, direction: RotationDirection) -> f64 {
        start + Self::angle_delta(start, end, direction) * t
    }

    /// Signed travel in degrees from `start` to `end`
    pub fn angle_delta(start: f64, end: f64, direction: RotationDirection) -> f64 {
        let raw = end - start;
        let wrapped = raw.rem_euclid(FULL_TURN_DEG);
        match direction {
            RotationDirection::Direct => raw,
            RotationDirection::Shortest => {
                if wrapped > FULL_TURN_DEG / 2.0 {
                    wrapped - FULL_TURN_DEG
                } else {
                    wrapped
                }
            }
            RotationDirection::Clockwise => wrapped,
            RotationDirection::CounterClockwise => {
                if wrapped == 0.0 {
                    0.0
                } else {
                    wrapped - FULL_TURN_DEG
                }
            }
        }
    }
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}

impl Interpolatable for Color {
    /// Per-channel blend, clamped so overshooting curves stay valid.
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Color::rgba(
            self.r.lerp(&other.r, t),
            self.g.lerp(&other.g, t),
            self.b.lerp(&other.b, t),
            self.a.lerp(&other.a, t),
        )
        .clamped()
    }
}

impl Interpolatable for Transform {
    /// Channels blend independently; rotation takes the shortest path.
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Transform {
            scale_x: self.scale_x.lerp(&other.scale_x, t),
            scale_y: self.scale_y.lerp(&other.scale_y, t),
            rotation: Interpolation::angle(
                self.rotation,
                other.rotation,
                t,
                RotationDirection::Shortest,
            ),
            translation: self.translation.lerp(&other.translation, t),
        }
    }
}

/// Blend two property values of the given kind.
///
/// At `progress == 1.0` the end value is returned verbatim so completed
/// tweens carry no floating residue.
pub fn interpolate(
    key: PropertyKey,
    kind: ValueKind,
    start: &Value,
    end: &Value,
    progress: f64,
    direction: RotationDirection,
) -> Result<Value> {
    for value in [start, end] {
        if !value.fits(kind) {
            return Err(TweenError::UnsupportedValueKind {
                key,
                expected: kind,
                found: value.type_name().to_string(),
            });
        }
    }

    if progress == 1.0 {
        return Ok(*end);
    }

    let value = match (kind, start, end) {
        (ValueKind::Scalar, _, Value::Integer(_)) => {
            let v = scalar_pair(start, end).map(|(a, b)| a.lerp(&b, progress));
            Value::Integer(v.unwrap_or_default().round() as i64)
        }
        (ValueKind::Scalar, _, _) => {
            let (a, b) = scalar_pair(start, end).unwrap_or_default();
            Value::Scalar(a.lerp(&b, progress))
        }
        (ValueKind::Angle, _, _) => {
            let (a, b) = scalar_pair(start, end).unwrap_or_default();
            let degrees = Interpolation::angle(a, b, progress, direction);
            match end {
                Value::Integer(_) => Value::Integer(degrees.round() as i64),
                _ => Value::Scalar(degrees),
            }
        }
        (ValueKind::Color, Value::Color(a), Value::Color(b)) => Value::Color(a.lerp(b, progress)),
        (ValueKind::Point2, Value::Point(a), Value::Point(b)) => Value::Point(a.lerp(b, progress)),
        (ValueKind::Transform, Value::Transform(a), Value::Transform(b)) => {
            Value::Transform(a.lerp(b, progress))
        }
        _ => {
            return Err(TweenError::UnsupportedValueKind {
                key,
                expected: kind,
                found: format!("{}/{}", start.type_name(), end.type_name()),
            })
        }
    };

    Ok(value)
}

fn scalar_pair(start: &Value, end: &Value) -> Option<(f64, f64)> {
    Some((start.as_f64()?, end.as_f64()?))
}
