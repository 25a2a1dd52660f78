//! Quadrants and node addresses
//!
//! A [`NodePath`] names a node by the chain of quadrants taken from the
//! root. It owns nothing and is resolved against the tree at lookup time,
//! so a path to a node that was merged away simply fails to resolve.

use std::fmt;

/// One of the four equal sub-regions produced by subdivision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Minimum x, minimum y
    UpperLeft,
    /// Maximum x, minimum y
    UpperRight,
    /// Minimum x, maximum y
    LowerLeft,
    /// Maximum x, maximum y
    LowerRight,
}

impl Quadrant {
    /// All quadrants in traversal order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Slot of this quadrant in a node's children array
    pub fn index(self) -> usize {
        match self {
            Quadrant::UpperLeft => 0,
            Quadrant::UpperRight => 1,
            Quadrant::LowerLeft => 2,
            Quadrant::LowerRight => 3,
        }
    }

    /// Offset of the quadrant's corner in half-extents of the parent
    pub fn offset(self) -> (f64, f64) {
        match self {
            Quadrant::UpperLeft => (0.0, 0.0),
            Quadrant::UpperRight => (1.0, 0.0),
            Quadrant::LowerLeft => (0.0, 1.0),
            Quadrant::LowerRight => (1.0, 1.0),
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Quadrant::UpperLeft => "UL",
            Quadrant::UpperRight => "UR",
            Quadrant::LowerLeft => "LL",
            Quadrant::LowerRight => "LR",
        }
    }
}

/// Address of a node relative to the tree root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    steps: Vec<Quadrant>,
}

impl NodePath {
    /// Path of the root node
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from a sequence of quadrants
    pub fn from_steps(steps: impl IntoIterator<Item = Quadrant>) -> Self {
        Self { steps: steps.into_iter().collect() }
    }

    /// Path of the given child of this node
    #[must_use]
    pub fn child(&self, quadrant: Quadrant) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(quadrant);
        Self { steps }
    }

    /// Path of the parent node, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.steps.split_last()?;
        Some(Self { steps: rest.to_vec() })
    }

    /// Quadrant this node occupies in its parent
    pub fn quadrant(&self) -> Option<Quadrant> {
        self.steps.last().copied()
    }

    /// Number of steps from the root
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Quadrants from the root down to this node
    pub fn steps(&self) -> &[Quadrant] {
        &self.steps
    }

    /// Remaining steps below `ancestor`, if `ancestor` is a prefix of this path
    pub fn strip_prefix(&self, ancestor: &NodePath) -> Option<&[Quadrant]> {
        self.steps.strip_prefix(ancestor.steps.as_slice())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "root");
        }
        let names: Vec<&str> = self.steps.iter().map(|q| q.short_name()).collect();
        write!(f, "root/{}", names.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_indices_follow_traversal_order() {
        for (slot, quadrant) in Quadrant::ALL.iter().enumerate() {
            assert_eq!(quadrant.index(), slot);
        }
    }

    #[test]
    fn test_path_parent_and_child() {
        let root = NodePath::root();
        let path = root.child(Quadrant::UpperRight).child(Quadrant::LowerLeft);

        assert_eq!(path.depth(), 2);
        assert_eq!(path.quadrant(), Some(Quadrant::LowerLeft));
        assert_eq!(path.parent(), Some(root.child(Quadrant::UpperRight)));
        assert_eq!(root.parent(), None);
        assert_eq!(path.to_string(), "root/UR/LL");
        assert_eq!(root.to_string(), "root");
    }

    #[test]
    fn test_strip_prefix() {
        let ancestor = NodePath::from_steps([Quadrant::UpperLeft]);
        let path = ancestor.child(Quadrant::LowerRight);
        let other = NodePath::from_steps([Quadrant::UpperRight]);

        assert_eq!(path.strip_prefix(&ancestor), Some(&[Quadrant::LowerRight][..]));
        assert_eq!(path.strip_prefix(&other), None);
        assert_eq!(path.strip_prefix(&NodePath::root()), Some(path.steps()));
    }
}
