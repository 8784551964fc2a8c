use crate::{
    shapes::Rect,
    util::{determine_quadrant, Quadrant},
    P2,
};

/// A quadtree node, shared by every tree variant in this crate. The leaf payload
/// `L` is what distinguishes them: `()` for plain refinement, an
/// [`Occupancy`](crate::Occupancy) tag for coverage and `Option<T>` for point storage.
///
/// ## Variants
/// - `Leaf`: An undivided region carrying its payload.
/// - `Internal`: A subdivided region with exactly four children, indexed by [`Quadrant`].
#[derive(Clone, Debug, PartialEq)]
pub enum Node<L> {
    Leaf {
        boundary: Rect,
        depth: u8,
        data: L,
    },
    Internal {
        boundary: Rect,
        depth: u8,
        children: [Box<Self>; 4],
    },
}

impl<L> Node<L> {
    pub fn leaf(boundary: Rect, depth: u8, data: L) -> Self {
        Self::Leaf {
            boundary,
            depth,
            data,
        }
    }

    /// Get the region covered by this node
    pub fn boundary(&self) -> &Rect {
        match self {
            Self::Leaf { boundary, .. } => boundary,
            Self::Internal { boundary, .. } => boundary,
        }
    }

    /// Depth of this node, the root being at depth 0
    pub fn depth(&self) -> u8 {
        match self {
            Self::Leaf { depth, .. } | Self::Internal { depth, .. } => *depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Get the payload of a leaf node
    pub fn data(&self) -> Option<&L> {
        match self {
            Self::Leaf { data, .. } => Some(data),
            Self::Internal { .. } => None,
        }
    }

    /// Get a child of an internal node
    pub fn child(&self, quadrant: Quadrant) -> Option<&Self> {
        match self {
            Self::Internal { children, .. } => Some(children[quadrant.index()].as_ref()),
            Self::Leaf { .. } => None,
        }
    }

    /// Turn a leaf into an internal node with four fresh leaf children, each
    /// given the payload produced by `payload` for its quadrant.
    ///
    /// **Returns** the payload the leaf held, or `None` if the node was already internal
    pub(crate) fn subdivide(&mut self, mut payload: impl FnMut(Quadrant) -> L) -> Option<L> {
        let (boundary, depth) = match self {
            Self::Leaf {
                boundary, depth, ..
            } => (*boundary, *depth),
            Self::Internal { .. } => return None,
        };

        let quarters = boundary.quarter();
        let children = Quadrant::ALL.map(|q| {
            Box::new(Self::Leaf {
                boundary: quarters[q.index()],
                depth: depth + 1,
                data: payload(q),
            })
        });

        match std::mem::replace(
            self,
            Self::Internal {
                boundary,
                depth,
                children,
            },
        ) {
            Self::Leaf { data, .. } => Some(data),
            Self::Internal { .. } => None,
        }
    }

    /// Collect every leaf under this node, depth first in quadrant order
    pub fn leaves(&self) -> Vec<&Self> {
        let mut results = Vec::new();
        self.collect_leaves(&mut results);
        results
    }

    /// Push every leaf under this node onto `results`
    pub fn collect_leaves<'a>(&'a self, results: &mut Vec<&'a Self>) {
        match self {
            Self::Leaf { .. } => results.push(self),
            Self::Internal { children, .. } => {
                for c in children {
                    c.collect_leaves(results);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { children, .. } => children.iter().map(|c| c.leaf_count()).sum(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { children, .. } => {
                1 + children.iter().map(|c| c.node_count()).sum::<usize>()
            }
        }
    }

    /// Depth of the deepest leaf under this node
    pub fn height(&self) -> u8 {
        match self {
            Self::Leaf { depth, .. } => *depth,
            Self::Internal { children, depth, .. } => children
                .iter()
                .map(|c| c.height())
                .max()
                .unwrap_or(*depth),
        }
    }

    /// Descend to the leaf a point routes to
    pub fn locate(&self, point: &P2) -> &Self {
        let mut current = self;
        while let Self::Internal {
            boundary, children, ..
        } = current
        {
            current = children[determine_quadrant(boundary, point).index()].as_ref();
        }
        current
    }
}
