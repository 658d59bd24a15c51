use serde::{Deserialize, Serialize};

use crate::core::geo::Point;

/// A 2-D affine transform kept in decomposed form
///
/// Animating the decomposed channels keeps scale, rotation and translation
/// independent of each other; a matrix is only built on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    pub translation: Point,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        translation: Point { x: 0.0, y: 0.0 },
    };

    pub fn new(scale_x: f64, scale_y: f64, rotation: f64, translation: Point) -> Self {
        Self {
            scale_x,
            scale_y,
            rotation,
            translation,
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..Self::IDENTITY
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translation: Point::new(x, y),
            ..Self::IDENTITY
        }
    }

    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale_x = sx;
        self.scale_y = sy;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_translation(mut self, x: f64, y: f64) -> Self {
        self.translation = Point::new(x, y);
        self
    }

    /// Recompose into a row-major 2x3 affine matrix `[a, b, c, d, tx, ty]`
    /// (scale, then rotate, then translate).
    pub fn to_matrix(&self) -> [f64; 6] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        [
            cos * self.scale_x,
            sin * self.scale_x,
            -sin * self.scale_y,
            cos * self.scale_y,
            self.translation.x,
            self.translation.y,
        ]
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.to_matrix();
        Point::new(a * p.x + c * p.y + tx, b * p.x + d * p.y + ty)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
