//! Tree configuration: the domain every tree covers and how deep it may grow.

use nalgebra::point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{QuadTreeError, Result},
    shapes::{Rect, Shape},
    P2,
};

/// Deepest tree this crate will build. Past this, cell sides approach the
/// precision of `f64` for any practical domain.
pub const MAX_DEPTH_LIMIT: u8 = 32;

/// Domain bounds and depth limit shared by every tree in this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeConfig {
    /// Region covered by the root node
    #[cfg_attr(feature = "serde", serde(default = "default_boundary"))]
    pub boundary: Rect,
    /// Depth at which nodes stop subdividing (root depth is 0)
    #[cfg_attr(feature = "serde", serde(default = "default_max_depth"))]
    pub max_depth: u8,
}

fn default_boundary() -> Rect {
    Rect::new(point![-128.0, -128.0], point![128.0, 128.0])
}

fn default_max_depth() -> u8 {
    8
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            boundary: default_boundary(),
            max_depth: default_max_depth(),
        }
    }
}

impl TreeConfig {
    pub fn new(boundary: Rect, max_depth: u8) -> Self {
        Self {
            boundary,
            max_depth,
        }
    }

    /// Check that the domain is finite with a positive extent and that the depth
    /// limit is within [`MAX_DEPTH_LIMIT`]
    pub fn validate(&self) -> Result<()> {
        let (start, end) = (self.boundary.start(), self.boundary.end());
        if ![start.x, start.y, end.x, end.y].iter().all(|c| c.is_finite()) {
            return Err(QuadTreeError::InvalidConfig(format!(
                "domain bounds must be finite, got {start} to {end}"
            )));
        }
        if self.boundary.width() <= 0. || self.boundary.height() <= 0. {
            return Err(QuadTreeError::InvalidConfig(format!(
                "domain must have a positive extent, got {start} to {end}"
            )));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadTreeError::InvalidConfig(format!(
                "max depth {} exceeds the limit of {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Construct a point, rejecting coordinates outside of the domain
    pub fn point(&self, x: f64, y: f64) -> Result<P2> {
        let p = point![x, y];
        self.check_point(&p)?;
        Ok(p)
    }

    pub(crate) fn check_point(&self, p: &P2) -> Result<()> {
        if self.boundary.contains(p) {
            Ok(())
        } else {
            Err(QuadTreeError::InvalidCoordinate { x: p.x, y: p.y })
        }
    }

    /// Side lengths of a cell at the maximum depth
    pub fn min_cell_size(&self) -> (f64, f64) {
        let cells = f64::powi(2., i32::from(self.max_depth));
        (self.boundary.width() / cells, self.boundary.height() / cells)
    }
}
