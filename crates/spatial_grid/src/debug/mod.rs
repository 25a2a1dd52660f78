//! Debug module for visualization of grid structure
//!
//! Node bounds are drawn through [`DrawSurface`]; [`DebugDrawSystem`]
//! records them for a host renderer.

pub mod draw;

pub use draw::{DebugShape, DebugDrawSystem, DebugShapeId, DrawOrder, DrawSurface};
