use std::fmt;

use crate::track::errors::TrackerError;
use crate::utils::{euclidean_distance, Point};

/// Axis-aligned bounding box in integer pixel coordinates.
///
/// Input coordinates are rounded at construction and never mutated
/// afterwards. Width and height must be non-negative. Equality and
/// hashing are structural over `(x, y, width, height)`.
///
/// Basic usage:
///
/// ```
/// use retrack_rs::track::BoundingBox;
/// let bbox = BoundingBox::new(10.0, 20.0, 300.0, 400.0).unwrap();
/// assert_eq!(bbox.x2(), 310);
/// assert_eq!(bbox.y2(), 420);
/// assert_eq!(bbox.center(), retrack_rs::utils::Point::new(160.0, 220.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, TrackerError> {
        if width < 0.0 || height < 0.0 {
            return Err(TrackerError::InvalidBoxSize { width, height });
        }
        Ok(BoundingBox {
            x: x.round() as i32,
            y: y.round() as i32,
            width: width.round() as i32,
            height: height.round() as i32,
        })
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
    #[inline]
    pub fn x1(&self) -> i32 {
        self.x
    }
    #[inline]
    pub fn y1(&self) -> i32 {
        self.y
    }
    #[inline]
    pub fn x2(&self) -> i32 {
        self.x + self.width
    }
    #[inline]
    pub fn y2(&self) -> i32 {
        self.y + self.height
    }

    /// Center of the box in fractional pixel coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Area of overlap with `other`; `0.0` when the boxes do not overlap
    /// on either axis.
    pub fn intersection(&self, other: &BoundingBox) -> f64 {
        if self.x2() < other.x1() || other.x2() < self.x1() {
            // No intersection in x
            return 0.0;
        }
        if self.y2() < other.y1() || other.y2() < self.y1() {
            // No intersection in y
            return 0.0;
        }
        let min_x = i32::max(self.x1(), other.x1());
        let min_y = i32::max(self.y1(), other.y1());
        let max_x = i32::min(self.x2(), other.x2());
        let max_y = i32::min(self.y2(), other.y2());
        (i32::max(0, max_x - min_x) as f64) * (i32::max(0, max_y - min_y) as f64)
    }

    /// Area of the smallest envelope enclosing both boxes. This is the
    /// union convention the IoU here is built on, not the true union area.
    pub fn union(&self, other: &BoundingBox) -> f64 {
        let span_x = (i32::max(other.x2(), self.x2()) - i32::min(other.x1(), self.x1())) as f64;
        let span_y = (i32::max(other.y2(), self.y2()) - i32::min(other.y1(), self.y1())) as f64;
        span_x * span_y
    }

    /// Intersection over union ratio with `other`; `0.0` when the
    /// enclosing envelope is degenerate.
    ///
    /// Basic usage:
    ///
    /// ```
    /// use retrack_rs::track::BoundingBox;
    /// let a = BoundingBox::new(10.0, 10.0, 10.0, 10.0).unwrap();
    /// let b = BoundingBox::new(19.0, 10.0, 10.0, 10.0).unwrap();
    /// assert!((a.iou(&b) - 0.0526).abs() < 1e-3);
    /// ```
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let union = self.union(other);
        if union == 0.0 {
            return 0.0;
        }
        self.intersection(other) / union
    }

    /// Euclidean distance between the two box centers.
    pub fn distance_to(&self, other: &BoundingBox) -> f64 {
        euclidean_distance(&self.center(), &other.center())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}
