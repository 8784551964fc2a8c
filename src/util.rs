use crate::{
    shapes::{Rect, Shape},
    P2,
};

/// The four children of a subdivided node. The discriminant is the child's index
/// in [`Rect::quarter`] and in the children array of an internal node.
///
/// The y axis grows downward, so "north" is the half with the smaller y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::NE, Quadrant::NW, Quadrant::SW, Quadrant::SE];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Route a point to the quadrant of `rect` it belongs to by comparing it with the
/// rect's center. Lower bounds are inclusive and upper bounds exclusive on both axes,
/// matching [`Rect::quarter`] and half-open point containment.
///
/// This is total: any point, even one outside `rect`, maps to exactly one quadrant.
pub(crate) fn determine_quadrant(rect: &Rect, point: &P2) -> Quadrant {
    let center = rect.center();
    match (point.x >= center.x, point.y >= center.y) {
        (true, false) => Quadrant::NE,
        (false, false) => Quadrant::NW,
        (false, true) => Quadrant::SW,
        (true, true) => Quadrant::SE,
    }
}

/// Check whether two points follow the same quadrant path through `levels`
/// successive subdivisions of `rect`, i.e. end up in the same cell.
pub(crate) fn shares_cell(rect: &Rect, a: &P2, b: &P2, levels: u8) -> bool {
    let mut rect = *rect;
    for _ in 0..levels {
        let q = determine_quadrant(&rect, a);
        if q != determine_quadrant(&rect, b) {
            return false;
        }
        rect = rect.quarter()[q.index()];
    }
    true
}
