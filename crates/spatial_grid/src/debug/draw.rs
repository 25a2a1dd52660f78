//! Debug drawing primitives and system
//!
//! The grid has no renderer of its own. It walks its nodes and hands each
//! node's bounds to a [`DrawSurface`]; [`DebugDrawSystem`] is a surface that
//! records shapes so a host renderer (or a test) can consume them.

use std::collections::HashMap;

use crate::foundation::math::{Color, Point2};
use crate::region::Rect;

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Target that node bounds are drawn onto
pub trait DrawSurface<R> {
    /// Draw one region with the given color and fill mode
    fn draw(&mut self, bounds: &R, color: Color, filled: bool);
}

/// Order in which a tree visits nodes when drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// Each node before its children
    #[default]
    DepthFirst,
    /// Children before their parent, so leaves come out first
    LeavesFirst,
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Axis-aligned rectangle
    Rect {
        bounds: Rect,
        color: Color,
        filled: bool,
        duration: f32,
    },

    /// Circle at center with radius
    Circle {
        center: Point2,
        radius: f64,
        color: Color,
        duration: f32,
    },

    /// Point at position
    Point {
        position: Point2,
        color: Color,
        size: f32,
        duration: f32,
    },
}

impl DebugShape {
    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = match self {
            DebugShape::Rect { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Point { duration, .. } => duration,
        };
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Debug drawing system for recording debug shapes
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Lifetime given to shapes drawn through [`DrawSurface`]
    pub surface_duration: f32,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            surface_duration: 0.0,
            enabled: true,
        }
    }

    /// Draw a rectangle (temporary)
    pub fn draw_rect(&mut self, bounds: Rect, color: Color, filled: bool, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::Rect {
            bounds,
            color,
            filled,
            duration,
        });
    }

    /// Draw a circle (temporary)
    pub fn draw_circle(&mut self, center: Point2, radius: f64, color: Color, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::Circle {
            center,
            radius,
            color,
            duration,
        });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Point2, color: Color, size: f32, duration: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Temporary shapes in the order they were drawn
    pub fn temporary_shapes(&self) -> &[DebugShape] {
        &self.temporary_shapes
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface<Rect> for DebugDrawSystem {
    fn draw(&mut self, bounds: &Rect, color: Color, filled: bool) {
        self.draw_rect(*bounds, color, filled, self.surface_duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::colors;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();

        system.draw_circle(Point2::origin(), 1.0, colors::red(), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        // Total 1.1 seconds
        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_persistent_shapes() {
        let mut system = DebugDrawSystem::new();

        system.draw_persistent(
            "world",
            DebugShape::Rect {
                bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
                color: colors::white(),
                filled: false,
                duration: f32::INFINITY,
            },
        );

        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.shape_count(), 1);

        system.clear();
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_records_nothing() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;

        system.draw_point(Point2::new(1.0, 1.0), colors::cyan(), 2.0, 1.0);
        DrawSurface::draw(&mut system, &Rect::new(0.0, 0.0, 1.0, 1.0), colors::green(), true);

        assert_eq!(system.shape_count(), 0);
        assert!(system.get_shapes().is_empty());
    }

    #[test]
    fn test_surface_draw_records_rect() {
        let mut system = DebugDrawSystem::new();
        system.surface_duration = 2.0;
        let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);

        DrawSurface::draw(&mut system, &bounds, colors::green(), true);

        assert_eq!(
            system.temporary_shapes(),
            &[DebugShape::Rect { bounds, color: colors::green(), filled: true, duration: 2.0 }]
        );
    }
}
