//! Bounding regions owned by grid nodes
//!
//! A [`Region`] is the extent a node covers. The grid never looks inside a
//! region beyond this trait, so callers can plug their own rectangle type in
//! as long as it tiles correctly when split into quadrants.

use crate::foundation::math::{colors, Color, Point2, Vec2};

/// Axis-aligned region capability required by the grid
///
/// `position()` is the top-left corner (minimum x and y) in screen space,
/// with y growing downward. Quadrants are built by
/// [`Region::from_position_size`] from offsets of that corner, so an
/// implementation must report back exactly the geometry it was built with.
pub trait Region: Clone {
    /// Build a region from its top-left corner and dimensions
    fn from_position_size(position: Point2, width: f64, height: f64) -> Self;

    /// Top-left corner of the region
    fn position(&self) -> Point2;

    /// Width of the region
    fn width(&self) -> f64;

    /// Height of the region
    fn height(&self) -> f64;

    /// Check if this region overlaps another region
    fn intersects(&self, other: &Self) -> bool;

    /// Check if this region contains a point
    fn contains_point(&self, point: &Point2) -> bool;

    /// Color used when the region is drawn for debugging
    fn color(&self) -> Color {
        colors::green()
    }

    /// Whether the region is drawn filled or as an outline
    fn filled(&self) -> bool {
        false
    }
}

/// Screen-space rectangle with optional debug drawing attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub position: Point2,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
    /// Debug draw color
    pub color: Color,
    /// Debug draw fill flag
    pub filled: bool,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            width,
            height,
            color: colors::green(),
            filled: false,
        }
    }

    /// Create a rectangle centered on a point with given half-extents
    pub fn from_center_extents(center: Point2, extents: Vec2) -> Self {
        Self::new(
            center.x - extents.x,
            center.y - extents.y,
            extents.x * 2.0,
            extents.y * 2.0,
        )
    }

    /// Set the debug draw color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the debug draw fill flag
    #[must_use]
    pub fn with_filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Minimum corner
    pub fn min(&self) -> Point2 {
        self.position
    }

    /// Maximum corner
    pub fn max(&self) -> Point2 {
        Point2::new(self.position.x + self.width, self.position.y + self.height)
    }

    /// Center point
    pub fn center(&self) -> Point2 {
        Point2::new(
            self.position.x + self.width * 0.5,
            self.position.y + self.height * 0.5,
        )
    }

    /// Half-extents along each axis
    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// A rect with zero or negative size covers nothing
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl Region for Rect {
    fn from_position_size(position: Point2, width: f64, height: f64) -> Self {
        Self::new(position.x, position.y, width, height)
    }

    fn position(&self) -> Point2 {
        self.position
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    // Closed intervals: rects sharing an edge intersect.
    fn intersects(&self, other: &Self) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x &&
        a_min.y <= b_max.y && a_max.y >= b_min.y
    }

    fn contains_point(&self, point: &Point2) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y
    }

    fn color(&self) -> Color {
        self.color
    }

    fn filled(&self) -> bool {
        self.filled
    }
}
