//! # Spatial Grid
//!
//! An adaptive quadrant tree for region and point queries over a changing
//! set of bounded 2D game objects.
//!
//! ## Features
//!
//! - **Adaptive subdivision**: crowded leaves split into four quadrants
//! - **Merge-back**: sparse sibling leaves collapse into their parent
//! - **Generic elements**: anything implementing [`Bounded`] and `PartialEq`
//! - **Per-tree configuration**: no global tuning state
//! - **Debug drawing**: node bounds rendered through a pluggable surface
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_grid::prelude::*;
//!
//! let mut grid = SpatialNode::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! grid.add(Point2::new(10.0, 10.0));
//! grid.add(Point2::new(20.0, 20.0));
//! grid.add(Point2::new(80.0, 80.0));
//!
//! assert_eq!(grid.height(), 1);
//! let near_origin = grid.query(&Rect::new(0.0, 0.0, 25.0, 25.0));
//! assert_eq!(near_origin.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod debug;
pub mod element;
pub mod error;
pub mod region;
pub mod spatial;

/// Common imports for grid users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, GridConfig},
        debug::{DebugDrawSystem, DebugShape, DrawOrder, DrawSurface},
        element::{Bounded, Circle},
        foundation::math::{Color, Point2, Vec2},
        region::{Rect, Region},
        spatial::{NodePath, Quadrant, SharedGrid, SpatialNode},
    };
}
