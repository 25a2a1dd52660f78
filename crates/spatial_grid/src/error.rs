//! Grid error types
//!
//! These never reach callers of `add`/`remove`; subdivision catches them,
//! logs, and rolls the node back to a leaf.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::spatial::{NodePath, Quadrant};

/// Errors raised while building a node's quadrants
#[derive(Error, Debug)]
pub enum GridError {
    /// Storage for a child's elements could not be reserved
    #[error("Allocation failed for quadrant storage: {0}")]
    Allocation(#[from] TryReserveError),

    /// A child region does not tile its parent
    #[error("Invalid {quadrant:?} quadrant under {path}: {reason}")]
    InvalidQuadrant {
        /// Node that was being subdivided
        path: NodePath,
        /// Offending quadrant
        quadrant: Quadrant,
        /// What was wrong with the child region
        reason: String,
    },
}
