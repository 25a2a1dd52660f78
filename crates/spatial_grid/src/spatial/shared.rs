//! Lock-guarded grid for multi-threaded hosts
//!
//! Subdivision and merging rewrite node links in several steps, so readers
//! must never overlap a writer. One `RwLock` guards the whole tree and is
//! held for the full duration of each public operation.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::element::Bounded;
use crate::foundation::math::Point2;
use crate::region::{Rect, Region};
use crate::spatial::SpatialNode;

/// Cloneable handle to a tree shared between threads
pub struct SharedGrid<T, R = Rect> {
    root: Arc<RwLock<SpatialNode<T, R>>>,
}

impl<T, R> Clone for SharedGrid<T, R> {
    fn clone(&self) -> Self {
        Self { root: Arc::clone(&self.root) }
    }
}

impl<T, R> SharedGrid<T, R>
where
    T: Bounded<R> + PartialEq + Clone,
    R: Region,
{
    /// Wrap a root node
    pub fn new(root: SpatialNode<T, R>) -> Self {
        Self { root: Arc::new(RwLock::new(root)) }
    }

    fn read(&self) -> RwLockReadGuard<'_, SpatialNode<T, R>> {
        self.root.read().unwrap_or_else(|poisoned| {
            warn!("Grid lock poisoned by a panicked writer, continuing with current state");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, SpatialNode<T, R>> {
        self.root.write().unwrap_or_else(|poisoned| {
            warn!("Grid lock poisoned by a panicked writer, continuing with current state");
            poisoned.into_inner()
        })
    }

    /// Run a read-only closure against the tree
    pub fn with<U>(&self, f: impl FnOnce(&SpatialNode<T, R>) -> U) -> U {
        f(&self.read())
    }

    /// Run a mutating closure against the tree
    pub fn with_mut<U>(&self, f: impl FnOnce(&mut SpatialNode<T, R>) -> U) -> U {
        f(&mut self.write())
    }

    /// See [`SpatialNode::add`]
    pub fn add(&self, element: T) -> bool {
        self.write().add(element)
    }

    /// See [`SpatialNode::remove`]
    pub fn remove(&self, element: &T) -> bool {
        self.write().remove(element)
    }

    /// See [`SpatialNode::update`]
    pub fn update(&self, element: T) -> bool {
        self.write().update(element)
    }

    /// See [`SpatialNode::query`]
    pub fn query(&self, region: &R) -> Vec<T> {
        self.read().query(region)
    }

    /// See [`SpatialNode::query_point`]
    pub fn query_point(&self, point: &Point2) -> Vec<T> {
        self.read().query_point(point)
    }

    /// See [`SpatialNode::element_count`]
    pub fn element_count(&self) -> usize {
        self.read().element_count()
    }

    /// See [`SpatialNode::clear`]
    pub fn clear(&self) {
        self.write().clear();
    }
}
