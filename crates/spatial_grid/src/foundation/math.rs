//! Math utilities and types
//!
//! Grid geometry is computed in `f64` screen space (x right, y down).
//! Debug colors stay in `f32` RGBA like the rest of the drawing code.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f64>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// RGBA color used by debug drawing
pub type Color = Vec4;

/// Named debug colors
pub mod colors {
    use super::Color;

    /// Opaque white
    pub fn white() -> Color {
        Color::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Opaque green, the default node outline color
    pub fn green() -> Color {
        Color::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Semi-transparent red
    pub fn red() -> Color {
        Color::new(1.0, 0.0, 0.0, 0.5)
    }

    /// Transparent cyan
    pub fn cyan() -> Color {
        Color::new(0.0, 1.0, 1.0, 0.2)
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        if value < min { min } else if value > max { max } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_relative_eq!(utils::clamp(5.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(utils::clamp(-5.0, 0.0, 1.0), 0.0);
        assert_relative_eq!(utils::clamp(0.25, 0.0, 1.0), 0.25);
    }
}
