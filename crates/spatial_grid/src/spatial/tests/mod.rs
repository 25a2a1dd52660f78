//! Scenario and invariant tests for the grid
//!
//! Shared fixtures live here; the test modules below exercise whole-tree
//! behaviour rather than single methods.


use std::fmt::Debug;

use approx::assert_relative_eq;

use crate::element::Bounded;
use crate::region::{Rect, Region};
use crate::spatial::{Quadrant, SpatialNode};

/// Game object compared by id, so its footprint can move
#[derive(Debug, Clone)]
pub(super) struct Body {
    pub id: u32,
    pub footprint: Rect,
}

impl Body {
    pub fn new(id: u32, x: f64, y: f64, size: f64) -> Self {
        Self { id, footprint: Rect::new(x, y, size, size) }
    }

    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        Self::new(self.id, x, y, self.footprint.width)
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Bounded<Rect> for Body {
    fn intersects(&self, region: &Rect) -> bool {
        Region::intersects(region, &self.footprint)
    }
}

pub(super) fn world() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 100.0)
}

/// Walk the subtree checking containment, exclusivity and quadrant tiling
///
/// A partial child set cannot be represented (`Option<Box<[_; 4]>>`), so
/// exclusivity reduces to internal nodes holding no elements.
pub(super) fn assert_invariants<T>(node: &SpatialNode<T>)
where
    T: Bounded<Rect> + PartialEq + Clone + Debug,
{
    for element in node.elements() {
        assert!(
            element.intersects(node.bounds()),
            "{element:?} stored in {} does not intersect its bounds",
            node.path()
        );
    }

    let Some(children) = node.children() else {
        return;
    };
    assert!(node.elements().is_empty(), "internal node {} holds elements", node.path());

    let parent = node.bounds();
    for (quadrant, child) in Quadrant::ALL.iter().zip(children.iter()) {
        let (dx, dy) = quadrant.offset();
        assert_eq!(child.path(), &node.path().child(*quadrant));
        assert_relative_eq!(child.bounds().width, parent.width * 0.5);
        assert_relative_eq!(child.bounds().height, parent.height * 0.5);
        assert_relative_eq!(child.bounds().position.x, parent.position.x + parent.width * 0.5 * dx);
        assert_relative_eq!(child.bounds().position.y, parent.position.y + parent.height * 0.5 * dy);
        assert_invariants(child);
    }
}
