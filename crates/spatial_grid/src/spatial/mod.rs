//! Spatial partitioning data structures
//!
//! Provides an adaptive quadrant tree for region and point queries over
//! bounded 2D game objects.

mod node;
mod quadrant;
mod shared;

#[cfg(test)]
mod tests;

pub use node::SpatialNode;
pub use quadrant::{NodePath, Quadrant};
pub use shared::SharedGrid;
