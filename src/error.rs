//! Error types surfaced by tree construction, insertion and queries.

use thiserror::Error;

/// Recoverable conditions reported by the quadtrees in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadTreeError {
    /// A point was constructed or supplied outside the configured domain.
    #[error("Point ({x}, {y}) lies outside the tree domain")]
    InvalidCoordinate { x: f64, y: f64 },

    /// Two points would share a single cell at the maximum depth.
    #[error("Point ({x}, {y}) shares a cell with an existing point at depth {depth}")]
    DegenerateInsertion { x: f64, y: f64, depth: u8 },

    /// A coverage query ended on a leaf that refinement could not resolve.
    #[error("Point ({x}, {y}) falls in an unresolved leaf at depth {depth}")]
    UnresolvedLeaf { x: f64, y: f64, depth: u8 },

    #[error("Invalid tree configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, QuadTreeError>;
