use serde::{Deserialize, Serialize};

/// A point in view coordinates, also used for anchor points in unit space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Anchor point of a view's center in unit space.
    pub fn center_anchor() -> Point {
        Point::new(0.5, 0.5)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_math() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.add(&b), Point::new(5.0, 8.0));
        assert_eq!(b.subtract(&a), Point::new(3.0, 4.0));
        assert_eq!(a.multiply(2.0), Point::new(2.0, 4.0));
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_point_from_array() {
        let p: Point = [0.0, 1.0].into();
        assert_eq!(p, Point::new(0.0, 1.0));
    }
}
