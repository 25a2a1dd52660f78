//! Quadrant tree node
//!
//! Divides a 2D region into hierarchical quadrants for fast region and point
//! queries. A leaf holds elements directly; once it holds more than
//! `max_elements_per_node` it subdivides into four children. When a removal
//! leaves four leaf children nearly empty, they are merged back.
//!
//! An element whose footprint spans a quadrant boundary is stored in every
//! leaf it touches. Reads de-duplicate by equality, and removal visits every
//! overlapping leaf.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::{Config, GridConfig};
use crate::debug::{DrawOrder, DrawSurface};
use crate::element::Bounded;
use crate::error::GridError;
use crate::foundation::math::Point2;
use crate::region::{Rect, Region};
use crate::spatial::{NodePath, Quadrant};

/// Relative tolerance when checking that a child region tiles its parent
const TILING_EPSILON: f64 = 1e-9;

/// Single node in the grid hierarchy; the root node is the tree
#[derive(Debug, Clone)]
pub struct SpatialNode<T, R = Rect> {
    /// Region this node covers
    bounds: R,

    /// Elements held directly (leaves only, at rest)
    elements: Vec<T>,

    /// Child nodes (4 quadrants), None if this is a leaf
    children: Option<Box<[SpatialNode<T, R>; 4]>>,

    /// Address of this node from the root
    path: NodePath,

    /// Tuning shared by every node of one tree
    config: Arc<GridConfig>,
}

impl<T, R> SpatialNode<T, R>
where
    T: Bounded<R> + PartialEq + Clone,
    R: Region,
{
    /// Create an empty root with default configuration
    pub fn new(bounds: R) -> Self {
        Self::with_config(bounds, GridConfig::default())
    }

    /// Create an empty root with the given configuration
    ///
    /// A configuration that fails [`Config::validate`] is replaced by the
    /// defaults, with a warning.
    pub fn with_config(bounds: R, config: GridConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("Invalid grid configuration ({err}), using defaults");
                GridConfig::default()
            }
        };
        Self::from_parts(bounds, NodePath::root(), Arc::new(config))
    }

    /// Create a root and [`add`](Self::add) each element in turn
    ///
    /// Elements outside `bounds` are rejected exactly as `add` rejects them.
    pub fn with_elements(bounds: R, config: GridConfig, elements: impl IntoIterator<Item = T>) -> Self {
        let mut root = Self::with_config(bounds, config);
        for element in elements {
            root.add(element);
        }
        root
    }

    fn from_parts(bounds: R, path: NodePath, config: Arc<GridConfig>) -> Self {
        Self {
            bounds,
            elements: Vec::new(),
            children: None,
            path,
            config,
        }
    }

    /// Region covered by this node
    pub fn bounds(&self) -> &R {
        &self.bounds
    }

    /// Elements held directly by this node
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    /// Child nodes in quadrant order, None for a leaf
    pub fn children(&self) -> Option<&[SpatialNode<T, R>; 4]> {
        self.children.as_deref()
    }

    /// Child in the given quadrant
    pub fn child(&self, quadrant: Quadrant) -> Option<&SpatialNode<T, R>> {
        self.children.as_ref().map(|children| &children[quadrant.index()])
    }

    /// Address of this node from the root
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Configuration of the tree this node belongs to
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Insert an element
    ///
    /// Returns false without touching the tree when the element's footprint
    /// misses this node. An internal node offers the element to all four
    /// children and reports whether any accepted it.
    pub fn add(&mut self, element: T) -> bool {
        if !element.intersects(&self.bounds) {
            return false;
        }

        if let Some(children) = self.children.as_mut() {
            let mut accepted = false;
            for child in children.iter_mut() {
                if element.intersects(&child.bounds) {
                    accepted |= child.add(element.clone());
                }
            }
            return accepted;
        }

        self.elements.push(element);
        if self.elements.len() > self.config.max_elements_per_node {
            self.subdivide();
        }
        true
    }

    /// Remove every stored copy of an element
    ///
    /// Subtrees the element's footprint misses are skipped. Returns true
    /// only if at least one copy was erased. Internal nodes whose children
    /// end up sparse are merged back into leaves on the way out.
    pub fn remove(&mut self, element: &T) -> bool {
        if !element.intersects(&self.bounds) {
            return false;
        }
        self.remove_matching(element, true)
    }

    /// Remove every stored copy of an element, searching the whole subtree
    ///
    /// Unlike [`remove`](Self::remove) this does not rely on the element's
    /// current footprint, so it also finds copies left behind in leaves the
    /// element has since moved out of.
    pub fn remove_stale(&mut self, element: &T) -> bool {
        self.remove_matching(element, false)
    }

    /// Re-insert an element whose footprint has changed
    ///
    /// Every old copy is removed, then the element is added at its new
    /// footprint. Returns true only if both steps succeed; an element that
    /// was not stored is left out of the tree.
    pub fn update(&mut self, element: T) -> bool {
        self.remove_stale(&element) && self.add(element)
    }

    fn remove_matching(&mut self, element: &T, prune: bool) -> bool {
        let before = self.elements.len();
        self.elements.retain(|stored| stored != element);
        let mut removed = self.elements.len() != before;

        if let Some(children) = self.children.as_mut() {
            // Every overlapping child may hold a copy, so no short-circuit.
            for child in children.iter_mut() {
                if prune && !element.intersects(&child.bounds) {
                    continue;
                }
                removed |= child.remove_matching(element, prune);
            }
            self.try_merge();
        }

        removed
    }

    fn can_subdivide(&self) -> bool {
        let half_width = self.bounds.width() * 0.5;
        let half_height = self.bounds.height() * 0.5;
        let min_size = self.config.min_node_size;

        if half_width <= min_size || half_height <= min_size {
            trace!(
                "Node {} at minimum size ({half_width}x{half_height}), staying a leaf",
                self.path
            );
            return false;
        }
        if self.path.depth() >= self.config.max_depth as usize {
            trace!("Node {} at maximum depth, staying a leaf", self.path);
            return false;
        }
        true
    }

    /// Subdivide this node into 4 children and redistribute its elements
    fn subdivide(&mut self) {
        if self.children.is_some() || !self.can_subdivide() {
            return;
        }

        // Children are built off to the side and only committed once whole.
        let mut quadrants = match self.build_quadrants() {
            Ok(quadrants) => quadrants,
            Err(err) => {
                warn!("Subdivision of node {} rolled back: {err}", self.path);
                return;
            }
        };

        let mut retained = Vec::new();
        for element in self.elements.drain(..) {
            let mut accepted = false;
            for child in quadrants.iter_mut() {
                if element.intersects(&child.bounds) {
                    accepted |= child.add(element.clone());
                }
            }
            if !accepted {
                warn!("Element fits no quadrant of node {}, keeping it at the parent", self.path);
                retained.push(element);
            }
        }

        self.elements = retained;
        self.children = Some(quadrants);
        debug!("Subdivided node {} at depth {}", self.path, self.path.depth());
    }

    fn build_quadrants(&self) -> Result<Box<[SpatialNode<T, R>; 4]>, GridError> {
        let origin = self.bounds.position();
        let half_width = self.bounds.width() * 0.5;
        let half_height = self.bounds.height() * 0.5;
        let capacity = self.config.max_elements_per_node + 1;

        let build = |quadrant: Quadrant| -> Result<SpatialNode<T, R>, GridError> {
            let (dx, dy) = quadrant.offset();
            let position = Point2::new(origin.x + half_width * dx, origin.y + half_height * dy);
            let bounds = R::from_position_size(position, half_width, half_height);
            self.check_quadrant(quadrant, &bounds, position, half_width, half_height)?;

            let mut node = SpatialNode::from_parts(
                bounds,
                self.path.child(quadrant),
                Arc::clone(&self.config),
            );
            node.elements.try_reserve(capacity)?;
            Ok(node)
        };

        Ok(Box::new([
            build(Quadrant::UpperLeft)?,
            build(Quadrant::UpperRight)?,
            build(Quadrant::LowerLeft)?,
            build(Quadrant::LowerRight)?,
        ]))
    }

    fn check_quadrant(
        &self,
        quadrant: Quadrant,
        bounds: &R,
        position: Point2,
        width: f64,
        height: f64,
    ) -> Result<(), GridError> {
        let invalid = |reason: String| GridError::InvalidQuadrant {
            path: self.path.clone(),
            quadrant,
            reason,
        };

        if !(position.x.is_finite() && position.y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(invalid(format!("non-finite geometry {position} {width}x{height}")));
        }

        let close = |a: f64, b: f64| (a - b).abs() <= TILING_EPSILON * a.abs().max(b.abs()).max(1.0);
        let actual = bounds.position();
        if !(close(actual.x, position.x)
            && close(actual.y, position.y)
            && close(bounds.width(), width)
            && close(bounds.height(), height))
        {
            return Err(invalid(format!(
                "region built as {actual} {}x{}, expected {position} {width}x{height}",
                bounds.width(),
                bounds.height()
            )));
        }
        Ok(())
    }

    /// Collapse four sparse leaf children back into this node
    fn try_merge(&mut self) -> bool {
        let Some(children) = self.children.as_ref() else {
            return false;
        };
        if !children.iter().all(SpatialNode::is_leaf) {
            return false;
        }

        let mut distinct: Vec<&T> = self.elements.iter().collect();
        for element in children.iter().flat_map(|child| child.elements.iter()) {
            if !distinct.contains(&element) {
                distinct.push(element);
            }
        }
        if distinct.len() >= self.config.max_elements_per_node {
            return false;
        }

        if let Some(children) = self.children.take() {
            let children: [SpatialNode<T, R>; 4] = *children;
            for child in children {
                for element in child.elements {
                    if !self.elements.contains(&element) {
                        self.elements.push(element);
                    }
                }
            }
        }
        debug!("Merged children of node {} ({} elements)", self.path, self.elements.len());
        true
    }

    /// Collect elements from every node whose bounds intersect `region`
    ///
    /// Whole leaves are returned without per-element checks, so the result
    /// may include elements near a leaf's edge that miss `region` itself.
    /// Use [`query_exact`](Self::query_exact) when that matters. Each
    /// element appears once.
    ///
    /// De-duplication compares by `PartialEq` against the results gathered
    /// so far, so the cost is quadratic in the number of distinct results.
    /// Keep query regions small relative to the world on large trees.
    pub fn query(&self, region: &R) -> Vec<T> {
        let mut results = Vec::new();
        self.collect_in_region(region, &mut results);
        results
    }

    /// Like [`query`](Self::query), filtered to elements that intersect `region`
    pub fn query_exact(&self, region: &R) -> Vec<T> {
        let mut results = self.query(region);
        results.retain(|element| element.intersects(region));
        results
    }

    /// Collect elements from every leaf whose bounds contain `point`
    pub fn query_point(&self, point: &Point2) -> Vec<T> {
        let mut results = Vec::new();
        for node in self.nodes_by_location(point) {
            push_distinct(&mut results, &node.elements);
        }
        results
    }

    fn collect_in_region(&self, region: &R, results: &mut Vec<T>) {
        if !self.bounds.intersects(region) {
            return;
        }

        push_distinct(results, &self.elements);

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_in_region(region, results);
            }
        }
    }

    /// Every distinct element in the subtree
    ///
    /// Quadratic in the element count, see [`query`](Self::query).
    pub fn all_elements(&self) -> Vec<T> {
        let mut results = Vec::new();
        self.collect_all(&mut results);
        results
    }

    fn collect_all(&self, results: &mut Vec<T>) {
        push_distinct(results, &self.elements);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_all(results);
            }
        }
    }

    /// Number of distinct elements in the subtree
    ///
    /// Collects [`all_elements`](Self::all_elements), so it carries the same cost.
    pub fn element_count(&self) -> usize {
        self.all_elements().len()
    }

    /// Longest path from this node down to a leaf (0 for a leaf)
    pub fn height(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |children| 1 + children.iter().map(SpatialNode::height).max().unwrap_or(0))
    }

    /// Number of child slots created by subdivision (4 per internal node)
    pub fn divisions(&self) -> usize {
        self.children.as_ref().map_or(0, |children| {
            GridConfig::MAX_CHILDREN + children.iter().map(SpatialNode::divisions).sum::<usize>()
        })
    }

    /// Total number of nodes in the subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.divisions()
    }

    /// Number of leaves in the subtree
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// All leaf nodes in quadrant order
    pub fn leaves(&self) -> Vec<&SpatialNode<T, R>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a SpatialNode<T, R>>) {
        match self.children.as_ref() {
            None => leaves.push(self),
            Some(children) => {
                for child in children.iter() {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// Empty the subtree and collapse it into a single leaf
    ///
    /// Safe to call repeatedly.
    pub fn clear(&mut self) {
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.clear();
            }
        }
        self.children = None;
        self.elements.clear();
    }

    /// Clear the subtree at `path`; false if the path does not resolve
    pub fn clear_at(&mut self, path: &NodePath) -> bool {
        match self.node_mut(path) {
            Some(node) => {
                node.clear();
                true
            }
            None => false,
        }
    }

    /// Replace this node's region and re-insert everything it held
    ///
    /// Returns the elements that no longer fit.
    pub fn set_bounds(&mut self, bounds: R) -> Vec<T> {
        let elements = self.all_elements();
        self.clear();
        self.bounds = bounds;

        let mut rejected = Vec::new();
        for element in elements {
            if !self.add(element.clone()) {
                rejected.push(element);
            }
        }
        if !rejected.is_empty() {
            debug!("{} elements fell outside the new bounds of node {}", rejected.len(), self.path);
        }
        rejected
    }

    /// Resolve a node address within this subtree
    pub fn node(&self, path: &NodePath) -> Option<&SpatialNode<T, R>> {
        let mut node = self;
        for quadrant in path.strip_prefix(&self.path)? {
            node = node.child(*quadrant)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut SpatialNode<T, R>> {
        let steps = path.strip_prefix(&self.path)?.to_vec();
        let mut node = self;
        for quadrant in steps {
            node = &mut node.children.as_mut()?[quadrant.index()];
        }
        Some(node)
    }

    /// Nodes holding an element equal to `element`
    pub fn nodes_by_element(&self, element: &T) -> Vec<&SpatialNode<T, R>> {
        let mut nodes = Vec::new();
        self.collect_by_element(element, &mut nodes);
        nodes
    }

    fn collect_by_element<'a>(&'a self, element: &T, nodes: &mut Vec<&'a SpatialNode<T, R>>) {
        if self.elements.contains(element) {
            nodes.push(self);
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_by_element(element, nodes);
            }
        }
    }

    /// Leaves whose bounds contain `point`
    pub fn nodes_by_location(&self, point: &Point2) -> Vec<&SpatialNode<T, R>> {
        let mut nodes = Vec::new();
        self.collect_by_location(point, &mut nodes);
        nodes
    }

    fn collect_by_location<'a>(&'a self, point: &Point2, nodes: &mut Vec<&'a SpatialNode<T, R>>) {
        if !self.bounds.contains_point(point) {
            return;
        }
        match self.children.as_ref() {
            None => nodes.push(self),
            Some(children) => {
                for child in children.iter() {
                    child.collect_by_location(point, nodes);
                }
            }
        }
    }

    /// The node at `path` together with its siblings
    ///
    /// Returns the parent's four children, or the node alone when it is
    /// this subtree's root. Empty when the path no longer resolves.
    pub fn siblings(&self, path: &NodePath) -> Vec<&SpatialNode<T, R>> {
        if *path == self.path {
            return vec![self];
        }
        let Some(parent) = path.parent().and_then(|parent| self.node(&parent)) else {
            return Vec::new();
        };
        parent
            .children()
            .map(|children| children.iter().collect())
            .unwrap_or_default()
    }

    /// Draw every node's bounds onto a surface
    pub fn draw<S>(&self, surface: &mut S, order: DrawOrder)
    where
        S: DrawSurface<R> + ?Sized,
    {
        if order == DrawOrder::DepthFirst {
            surface.draw(&self.bounds, self.bounds.color(), self.bounds.filled());
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.draw(surface, order);
            }
        }
        if order == DrawOrder::LeavesFirst {
            surface.draw(&self.bounds, self.bounds.color(), self.bounds.filled());
        }
    }
}

fn push_distinct<T: PartialEq + Clone>(results: &mut Vec<T>, items: &[T]) {
    for item in items {
        if !results.contains(item) {
            results.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_basic_insertion() {
        let mut grid = SpatialNode::new(world());

        assert!(grid.add(Point2::new(10.0, 10.0)));
        assert_eq!(grid.element_count(), 1);
        assert!(grid.is_leaf());
    }

    #[test]
    fn test_rejects_outside_element() {
        let mut grid = SpatialNode::new(world());

        assert!(!grid.add(Point2::new(150.0, 10.0)));
        assert_eq!(grid.element_count(), 0);
        assert!(grid.elements().is_empty());
    }

    #[test]
    fn test_subdivision() {
        let mut grid = SpatialNode::new(world());
        grid.add(Point2::new(10.0, 10.0));
        grid.add(Point2::new(20.0, 20.0));
        assert!(grid.is_leaf());

        grid.add(Point2::new(80.0, 80.0));

        assert!(!grid.is_leaf());
        assert!(grid.elements().is_empty());
        assert_eq!(grid.divisions(), 4);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.node_count(), 5);
        assert_eq!(grid.leaf_count(), 4);
    }

    #[test]
    fn test_boundary_element_is_stored_in_each_touching_leaf() {
        let spanning = Rect::new(40.0, 40.0, 20.0, 20.0);
        let mut rect_grid: SpatialNode<Rect> = SpatialNode::new(world());
        rect_grid.add(Rect::new(5.0, 5.0, 1.0, 1.0));
        rect_grid.add(Rect::new(90.0, 5.0, 1.0, 1.0));
        rect_grid.add(Rect::new(5.0, 90.0, 1.0, 1.0));
        assert!(rect_grid.add(spanning));

        assert_eq!(rect_grid.nodes_by_element(&spanning).len(), 4);
        assert_eq!(rect_grid.element_count(), 4);
        assert_eq!(rect_grid.all_elements().iter().filter(|r| **r == spanning).count(), 1);
    }

    #[test]
    fn test_remove_reports_accurately_at_internal_nodes() {
        let mut grid = SpatialNode::new(world());
        for x in [10.0, 20.0, 80.0] {
            grid.add(Point2::new(x, x));
        }
        assert!(!grid.is_leaf());

        assert!(!grid.remove(&Point2::new(30.0, 70.0)));
        assert!(!grid.is_leaf());
        assert!(grid.remove(&Point2::new(80.0, 80.0)));
        assert!(!grid.remove(&Point2::new(80.0, 80.0)));
    }

    #[test]
    fn test_remove_outside_bounds_is_rejected() {
        let mut grid = SpatialNode::new(world());
        grid.add(Point2::new(10.0, 10.0));

        assert!(!grid.remove(&Point2::new(-10.0, 10.0)));
        assert_eq!(grid.element_count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut grid = SpatialNode::new(world());
        for x in [10.0, 20.0, 80.0, 60.0] {
            grid.add(Point2::new(x, x));
        }

        grid.clear();
        assert!(grid.is_leaf());
        assert_eq!(grid.element_count(), 0);

        grid.clear();
        assert!(grid.is_leaf());
        assert_eq!(grid.element_count(), 0);
        assert_eq!(grid.height(), 0);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = GridConfig { max_elements_per_node: 0, ..GridConfig::default() };
        let mut grid = SpatialNode::with_config(world(), config);
        assert_eq!(grid.config(), &GridConfig::default());

        let points = [Point2::new(10.0, 10.0), Point2::new(20.0, 20.0), Point2::new(80.0, 80.0)];
        for point in &points {
            grid.add(*point);
        }
        assert_eq!(grid.height(), 1);

        for point in &points {
            assert!(grid.remove(point));
        }
        assert!(grid.is_leaf());
        assert_eq!(grid.element_count(), 0);
    }

    #[test]
    fn test_query_dedups_across_many_leaves() {
        let mut grid: SpatialNode<Rect> = SpatialNode::new(world());
        let spanning = Rect::new(30.0, 30.0, 40.0, 40.0);
        for i in 0..40 {
            let offset = f64::from(i) * 2.4;
            grid.add(Rect::new(offset, 1.0, 1.0, 1.0));
            grid.add(Rect::new(offset, 98.0, 1.0, 1.0));
        }
        grid.add(spanning);

        assert!(grid.nodes_by_element(&spanning).len() > 1);
        let everything = grid.query(&world());
        assert_eq!(everything.len(), 81);
        assert_eq!(everything.iter().filter(|r| **r == spanning).count(), 1);
        assert_eq!(grid.element_count(), 81);
    }

    #[test]
    fn test_set_bounds_reinserts() {
        let mut grid = SpatialNode::new(world());
        for x in [10.0, 20.0, 80.0] {
            grid.add(Point2::new(x, x));
        }

        let rejected = grid.set_bounds(Rect::new(0.0, 0.0, 50.0, 50.0));

        assert_eq!(rejected, vec![Point2::new(80.0, 80.0)]);
        assert_eq!(grid.element_count(), 2);
        assert!(grid.is_leaf());
    }
}
