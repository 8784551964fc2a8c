//! # coverage-quadtree
//!
//! Adaptive quadtrees over a bounded 2D plane, for deciding whether points fall
//! inside a region made of circles and axis-aligned rectangles, and for storing
//! points keyed by location.
//!
//! ## Trees
//!
//! - [`RefinementTree`]: subdivides every node whose region straddles the boundary
//!   of any shape in a list, giving fine cells near boundaries and coarse cells elsewhere.
//! - [`CoverageTree`]: tags each leaf as empty, full or unknown relative to a single
//!   shape, and answers point queries by descending to a leaf.
//! - [`QuadTree`]: a point-region quadtree holding at most one item per leaf.
//!
//! All trees share one convention: regions are half-open, with the minimum edges
//! inside and the maximum edges outside, and a point on a node's center lines is
//! routed to the quadrant on the larger-coordinate side. The y axis grows downward.
//!
//! ```rust
//! use coverage_quadtree::{Circle, Coverage, CoverageTree, Rect, TreeConfig};
//! use nalgebra::point;
//!
//! let config = TreeConfig::new(Rect::new(point![0.0, 0.0], point![200.0, 200.0]), 8);
//! let camera = Circle::new(point![100.0, 100.0], 20.0).unwrap();
//! let tree = CoverageTree::with_shape(config, camera).unwrap();
//!
//! assert_eq!(tree.classify(&point![100.0, 100.0]), Ok(Coverage::Inside));
//! assert!(!tree.contains(&point![0.0, 0.0]));
//! ```

use nalgebra::Point2;

pub mod config;
pub mod coverage;
pub mod error;
pub mod node;
pub mod quadtree;
pub mod refine;
pub mod shapes;
mod util;

pub use config::{TreeConfig, MAX_DEPTH_LIMIT};
pub use coverage::{Coverage, CoverageTree, Occupancy, OccupancyCounts};
pub use error::{QuadTreeError, Result};
pub use node::Node;
pub use quadtree::QuadTree;
pub use refine::{point_in_any, RefinementTree};
pub use shapes::{Boundary, Circle, Rect, Shape};
pub use util::Quadrant;

pub type P2 = Point2<f64>;

/// Trait for getting a 2d point position of data stored in the [`QuadTree`]
pub trait Point {
    /// Get 2d point position
    fn point(&self) -> P2;
}

impl Point for P2 {
    fn point(&self) -> P2 {
        *self
    }
}
