//! The closed set of animatable values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{color::Color, geo::Point, transform::Transform};

/// How a property's values are blended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Scalar,
    Color,
    Point2,
    /// Degrees; blended along a rotation direction.
    Angle,
    Transform,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Color => "color",
            ValueKind::Point2 => "point2",
            ValueKind::Angle => "angle",
            ValueKind::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// A concrete property value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Scalar(f64),
    /// Integer-valued scalar; blended as `f64` and rounded when applied.
    Integer(i64),
    Color(Color),
    Point(Point),
    Transform(Transform),
}

impl Value {
    /// Short name of the stored representation, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Integer(_) => "integer",
            Value::Color(_) => "color",
            Value::Point(_) => "point",
            Value::Transform(_) => "transform",
        }
    }

    /// Numeric view of scalar and integer values.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Scalar(v) => Some(v),
            Value::Integer(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match *self {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<Transform> {
        match *self {
            Value::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this value can be blended as `kind`.
    pub fn fits(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Scalar | ValueKind::Angle => self.as_f64().is_some(),
            ValueKind::Color => matches!(self, Value::Color(_)),
            ValueKind::Point2 => matches!(self, Value::Point(_)),
            ValueKind::Transform => matches!(self, Value::Transform(_)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<[f64; 2]> for Value {
    fn from(p: [f64; 2]) -> Self {
        Value::Point(p.into())
    }
}

impl From<Transform> for Value {
    fn from(t: Transform) -> Self {
        Value::Transform(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_fits_kind() {
        assert!(Value::Scalar(1.0).fits(ValueKind::Scalar));
        assert!(Value::Integer(3).fits(ValueKind::Angle));
        assert!(!Value::Scalar(1.0).fits(ValueKind::Color));
        assert!(Value::from([0.0, 1.0]).fits(ValueKind::Point2));
        assert!(Value::from(Transform::IDENTITY).fits(ValueKind::Transform));
    }
}
