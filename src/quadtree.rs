use tracing::{trace, warn};

use crate::{
    config::TreeConfig,
    error::{QuadTreeError, Result},
    node::Node,
    shapes::{Rect, Shape},
    util::{determine_quadrant, shares_cell},
    Point, P2,
};

/// A point-region (PR) quadtree: every leaf stores at most one item, and a leaf
/// splits into four as soon as a second item lands in its region.
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    root: Node<Option<T>>,
    config: TreeConfig,
    len: usize,
}

impl<T: Point + Clone> QuadTree<T> {
    /// Create a new empty quadtree over the configured domain
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: Node::leaf(config.boundary, 0, None),
            config,
            len: 0,
        })
    }

    /// Insert an item into the quadtree. A failed insert leaves the tree unchanged.
    ///
    /// ## Errors
    /// - `InvalidCoordinate` if the item lies outside the domain
    /// - `DegenerateInsertion` if the item would share a cell with an existing item
    ///   even at the maximum depth
    pub fn insert(&mut self, item: &T) -> Result<()> {
        let point = item.point();
        if let Err(e) = self
            .config
            .check_point(&point)
            .and_then(|_| self.check_separation(&point))
        {
            warn!(error = %e, "rejected insertion");
            return Err(e);
        }

        insert_node(&mut self.root, item.clone());
        self.len += 1;
        Ok(())
    }

    /// Get the item stored at exactly `point`
    pub fn get(&self, point: &P2) -> Option<&T> {
        self.root
            .locate(point)
            .data()
            .and_then(Option::as_ref)
            .filter(|item| item.point() == *point)
    }

    /// Queries the QuadTree for items within a specified shape area.
    /// This method populates a passed mutable vector with all found items.
    pub fn query<S: Shape>(&self, shape: &S, results: &mut Vec<T>) {
        query_node(&self.root, shape, results)
    }

    /// Every stored item, depth first in quadrant order
    pub fn items(&self) -> Vec<&T> {
        self.root
            .leaves()
            .into_iter()
            .filter_map(|leaf| leaf.data().and_then(Option::as_ref))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the point at the center of the boundary
    pub fn center(&self) -> P2 {
        self.root.boundary().center()
    }

    /// Get the boundary rect of the quadtree
    pub fn boundary(&self) -> &Rect {
        self.root.boundary()
    }

    pub fn root(&self) -> &Node<Option<T>> {
        &self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    fn check_separation(&self, point: &P2) -> Result<()> {
        let leaf = self.root.locate(point);
        let Some(Some(existing)) = leaf.data() else {
            return Ok(());
        };

        let levels = self.config.max_depth.saturating_sub(leaf.depth());
        if shares_cell(leaf.boundary(), &existing.point(), point, levels) {
            return Err(QuadTreeError::DegenerateInsertion {
                x: point.x,
                y: point.y,
                depth: self.config.max_depth,
            });
        }
        Ok(())
    }
}

fn insert_node<T: Point>(node: &mut Node<Option<T>>, item: T) {
    match node {
        Node::Internal {
            boundary, children, ..
        } => {
            let q = determine_quadrant(boundary, &item.point());
            insert_node(&mut children[q.index()], item);
        }
        Node::Leaf { data, .. } => match data.take() {
            None => *data = Some(item),
            Some(existing) => {
                trace!(depth = node.depth(), "splitting occupied leaf");
                node.subdivide(|_| None);
                insert_node(node, existing);
                insert_node(node, item);
            }
        },
    }
}

fn query_node<T: Point + Clone, S: Shape>(
    node: &Node<Option<T>>,
    shape: &S,
    results: &mut Vec<T>,
) {
    match node {
        Node::Leaf {
            data: Some(item), ..
        } => {
            if shape.contains(&item.point()) {
                results.push(item.clone());
            }
        }
        Node::Leaf { data: None, .. } => (),
        Node::Internal {
            boundary, children, ..
        } => {
            if shape.intersects_rect(boundary) {
                for c in children {
                    query_node(c, shape, results);
                }
            }
        }
    }
}
