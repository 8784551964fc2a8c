//! Region quadtree caching, per leaf, whether its area lies inside a shape.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::TreeConfig,
    error::{QuadTreeError, Result},
    node::Node,
    shapes::Shape,
    P2,
};

/// Cached classification of a leaf region relative to the tree's shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Occupancy {
    /// The region lies entirely outside the shape
    Empty,
    /// The region lies entirely inside the shape
    Full,
    /// The depth limit was reached before the region could be resolved
    Unknown,
}

/// Result of classifying a point against a [`CoverageTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Coverage {
    Inside,
    Outside,
}

/// Number of leaves carrying each [`Occupancy`] tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OccupancyCounts {
    pub empty: usize,
    pub full: usize,
    pub unknown: usize,
}

/// A quadtree whose leaves record whether they are covered by a single shape,
/// e.g. the visibility range of a camera.
///
/// Nodes entirely outside the shape are tagged [`Occupancy::Empty`] and nodes entirely
/// inside it [`Occupancy::Full`], both without further subdivision. Anything else is
/// split until the depth limit, where it is left [`Occupancy::Unknown`].
#[derive(Clone, Debug)]
pub struct CoverageTree<S> {
    root: Node<Occupancy>,
    config: TreeConfig,
    shape: Option<S>,
}

impl<S: Shape> CoverageTree<S> {
    /// Create an unrefined tree: a single root leaf of unknown occupancy
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: Node::leaf(config.boundary, 0, Occupancy::Unknown),
            config,
            shape: None,
        })
    }

    /// Create a tree and refine it against `shape`
    pub fn with_shape(config: TreeConfig, shape: S) -> Result<Self> {
        let mut tree = Self::new(config)?;
        tree.refine(shape);
        Ok(tree)
    }

    /// Rebuild the tree from a bare root for a new shape
    pub fn refine(&mut self, shape: S) {
        self.root = Node::leaf(self.config.boundary, 0, Occupancy::Unknown);
        fill(&mut self.root, &shape, self.config.max_depth);
        self.shape = Some(shape);

        let counts = self.occupancy_counts();
        debug!(
            full = counts.full,
            empty = counts.empty,
            unknown = counts.unknown,
            "coverage tree rebuilt"
        );
    }

    /// Classify a point by descending to its leaf and reading the leaf's tag
    ///
    /// ## Errors
    /// - `InvalidCoordinate` if the point lies outside the domain
    /// - `UnresolvedLeaf` if the point falls in a leaf tagged [`Occupancy::Unknown`]
    pub fn classify(&self, point: &P2) -> Result<Coverage> {
        self.config.check_point(point)?;

        let leaf = self.root.locate(point);
        match leaf.data() {
            Some(Occupancy::Full) => Ok(Coverage::Inside),
            Some(Occupancy::Empty) => Ok(Coverage::Outside),
            _ => Err(QuadTreeError::UnresolvedLeaf {
                x: point.x,
                y: point.y,
                depth: leaf.depth(),
            }),
        }
    }

    /// Check whether a point is covered. Points in unresolved leaves are tested
    /// against the shape directly; points outside the domain are not covered.
    pub fn contains(&self, point: &P2) -> bool {
        match self.classify(point) {
            Ok(coverage) => coverage == Coverage::Inside,
            Err(e @ QuadTreeError::UnresolvedLeaf { .. }) => {
                warn!(error = %e, "falling back to exact containment");
                self.shape.as_ref().is_some_and(|s| s.contains(point))
            }
            Err(_) => false,
        }
    }

    pub fn occupancy_counts(&self) -> OccupancyCounts {
        let mut counts = OccupancyCounts::default();
        for leaf in self.root.leaves() {
            match leaf.data() {
                Some(Occupancy::Empty) => counts.empty += 1,
                Some(Occupancy::Full) => counts.full += 1,
                Some(Occupancy::Unknown) => counts.unknown += 1,
                None => (),
            }
        }
        counts
    }

    pub fn root(&self) -> &Node<Occupancy> {
        &self.root
    }

    pub fn leaves(&self) -> Vec<&Node<Occupancy>> {
        self.root.leaves()
    }

    /// The shape the tree was last refined against
    pub fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

fn fill<S: Shape>(node: &mut Node<Occupancy>, shape: &S, max_depth: u8) {
    match node {
        Node::Leaf {
            boundary,
            depth,
            data,
        } => {
            if shape.excludes_rect(boundary) {
                *data = Occupancy::Empty;
            } else if shape.covers_rect(boundary) {
                *data = Occupancy::Full;
            } else if *depth >= max_depth {
                *data = Occupancy::Unknown;
            } else {
                node.subdivide(|_| Occupancy::Unknown);
                fill(node, shape, max_depth);
            }
        }
        Node::Internal { children, .. } => {
            for c in children {
                fill(c, shape, max_depth);
            }
        }
    }
}
