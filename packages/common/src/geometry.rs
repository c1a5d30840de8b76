use serde::{Deserialize, Serialize};

/// A point in the selection container's local coordinate space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle (origin at the top-left corner)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two corner points, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self {
            x: left,
            y: top,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical center line
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Vertical distance from `y` to this rectangle (0 when `y` falls inside it)
    pub fn vertical_distance(&self, y: f32) -> f32 {
        if y < self.top() {
            self.top() - y
        } else if y > self.bottom() {
            y - self.bottom()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let rect = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(rect.right(), 50.0);
        assert_eq!(rect.bottom(), 80.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 100.0, 20.0);
        let below = Rect::new(0.0, 20.0, 100.0, 20.0);
        let inside = Rect::new(10.0, 5.0, 5.0, 5.0);
        let far = Rect::new(200.0, 200.0, 10.0, 10.0);

        assert!(!a.intersects(&below));
        assert!(!below.intersects(&a));
        assert!(a.intersects(&inside));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_vertical_distance() {
        let rect = Rect::new(0.0, 100.0, 50.0, 40.0);
        assert_eq!(rect.vertical_distance(90.0), 10.0);
        assert_eq!(rect.vertical_distance(120.0), 0.0);
        assert_eq!(rect.vertical_distance(150.0), 10.0);
        assert_eq!(rect.mid_y(), 120.0);
    }

    #[test]
    fn test_rect_serialization() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&rect).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, back);
    }
}
