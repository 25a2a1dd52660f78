//! Element capability
//!
//! Anything stored in the grid must report whether its footprint touches a
//! region. Equality (`PartialEq`) identifies an element for removal and
//! de-duplication, so game objects usually compare by id rather than by
//! geometry.

use std::rc::Rc;
use std::sync::Arc;

use crate::foundation::math::{utils, Point2};
use crate::region::{Rect, Region};

/// An element with a boundable footprint
pub trait Bounded<R: Region> {
    /// Check if this element's footprint intersects a region
    fn intersects(&self, region: &R) -> bool;
}

impl<R: Region, T: Bounded<R> + ?Sized> Bounded<R> for &T {
    fn intersects(&self, region: &R) -> bool {
        (**self).intersects(region)
    }
}

impl<R: Region, T: Bounded<R> + ?Sized> Bounded<R> for Box<T> {
    fn intersects(&self, region: &R) -> bool {
        (**self).intersects(region)
    }
}

impl<R: Region, T: Bounded<R> + ?Sized> Bounded<R> for Rc<T> {
    fn intersects(&self, region: &R) -> bool {
        (**self).intersects(region)
    }
}

impl<R: Region, T: Bounded<R> + ?Sized> Bounded<R> for Arc<T> {
    fn intersects(&self, region: &R) -> bool {
        (**self).intersects(region)
    }
}

impl<R: Region> Bounded<R> for Point2 {
    fn intersects(&self, region: &R) -> bool {
        region.contains_point(self)
    }
}

impl Bounded<Rect> for Rect {
    fn intersects(&self, region: &Rect) -> bool {
        Region::intersects(region, self)
    }
}

/// Circle footprint, the usual shape for moving bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the circle
    pub center: Point2,
    /// Radius of the circle
    pub radius: f64,
}

impl Circle {
    /// Create a new circle
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Bounded<Rect> for Circle {
    fn intersects(&self, region: &Rect) -> bool {
        if region.is_degenerate() || self.radius < 0.0 {
            return false;
        }
        let (min, max) = (region.min(), region.max());
        let closest = Point2::new(
            utils::clamp(self.center.x, min.x, max.x),
            utils::clamp(self.center.y, min.y, max.y),
        );
        (closest - self.center).norm_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_footprint() {
        let region = Rect::new(0.0, 0.0, 50.0, 50.0);

        assert!(Point2::new(10.0, 10.0).intersects(&region));
        assert!(!Point2::new(80.0, 80.0).intersects(&region));
    }

    #[test]
    fn test_circle_footprint() {
        let region = Rect::new(0.0, 0.0, 50.0, 50.0);

        assert!(Circle::new(Point2::new(55.0, 25.0), 6.0).intersects(&region));
        assert!(!Circle::new(Point2::new(60.0, 60.0), 5.0).intersects(&region));
        // Corner distance is sqrt(50), just over 7
        assert!(!Circle::new(Point2::new(55.0, 55.0), 7.0).intersects(&region));
        assert!(Circle::new(Point2::new(55.0, 55.0), 7.1).intersects(&region));
    }

    #[test]
    fn test_reference_forms_match_values() {
        let region = Rect::new(0.0, 0.0, 50.0, 50.0);
        let inside = Rect::new(10.0, 10.0, 5.0, 5.0);
        let outside = Rect::new(60.0, 60.0, 5.0, 5.0);

        for rect in [inside, outside] {
            let by_value = Bounded::intersects(&rect, &region);
            assert_eq!(Bounded::intersects(&&rect, &region), by_value);
            assert_eq!(Bounded::intersects(&Box::new(rect), &region), by_value);
            assert_eq!(Bounded::intersects(&Rc::new(rect), &region), by_value);
            assert_eq!(Bounded::intersects(&Arc::new(rect), &region), by_value);
        }
    }
}
