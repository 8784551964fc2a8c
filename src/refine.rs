//! Boundary refinement: subdivide every node whose region straddles the boundary
//! of at least one shape, down to the configured depth limit.

use tracing::{debug, trace};

use crate::{config::TreeConfig, error::Result, node::Node, shapes::Shape, P2};

/// A quadtree refined against a set of shapes. Leaves carry no payload; callers
/// enumerate them to see which regions are resolved and at what granularity.
#[derive(Clone, Debug)]
pub struct RefinementTree {
    root: Node<()>,
    max_depth: u8,
}

impl RefinementTree {
    /// Create a tree holding a single root leaf over the configured domain
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: Node::leaf(config.boundary, 0, ()),
            max_depth: config.max_depth,
        })
    }

    /// Subdivide every leaf whose region straddles the boundary of any of `shapes`,
    /// recursing into the new children until no leaf straddles or the depth limit
    /// is reached.
    ///
    /// **Returns** the number of subdivisions performed. Refining again with the
    /// same shapes performs none.
    pub fn refine<S: Shape>(&mut self, shapes: &[S]) -> usize {
        let subdivisions = refine_node(&mut self.root, shapes, self.max_depth);
        debug!(
            shapes = shapes.len(),
            subdivisions,
            leaves = self.root.leaf_count(),
            "refinement pass finished"
        );
        subdivisions
    }

    /// Discard all subdivisions and refine from a bare root against a new shape set
    pub fn rebuild<S: Shape>(&mut self, shapes: &[S]) -> usize {
        self.reset();
        self.refine(shapes)
    }

    /// Collapse the tree back to a single root leaf
    pub fn reset(&mut self) {
        self.root = Node::leaf(*self.root.boundary(), 0, ());
    }

    pub fn root(&self) -> &Node<()> {
        &self.root
    }

    /// Every leaf of the tree, each exposing its region and depth
    pub fn leaves(&self) -> Vec<&Node<()>> {
        self.root.leaves()
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }
}

fn refine_node<S: Shape>(node: &mut Node<()>, shapes: &[S], max_depth: u8) -> usize {
    if node.depth() >= max_depth {
        return 0;
    }

    match node {
        Node::Internal { children, .. } => children
            .iter_mut()
            .map(|c| refine_node(c, shapes, max_depth))
            .sum(),
        Node::Leaf { boundary, .. } => {
            if !shapes.iter().any(|s| s.straddles(boundary)) {
                return 0;
            }

            trace!(depth = node.depth(), boundary = ?node.boundary(), "subdividing");
            node.subdivide(|_| ());
            1 + refine_node(node, shapes, max_depth)
        }
    }
}

/// Check a point directly against a shape list. The tree is not consulted; its
/// leaves only describe how finely each region has been resolved.
pub fn point_in_any<S: Shape>(shapes: &[S], point: &P2) -> bool {
    shapes.iter().any(|s| s.contains(point))
}
