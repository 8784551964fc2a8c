use nalgebra::{self as na, point, vector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{QuadTreeError, Result},
    P2,
};

/// A trait for shapes that can refine or query a quadtree. Shapes must be able to
/// provide their bounding points and center, test point containment, and compare
/// themselves against the rectangular region of a tree node.
pub trait Shape {
    /// Get the start (minimum) point of the shape's bounding rect
    fn start(&self) -> P2;
    /// Get the end (maximum) point of the shape's bounding rect
    fn end(&self) -> P2;
    /// Get the center point of the shape
    fn center(&self) -> P2;
    /// Check if the shape contains a point
    fn contains(&self, point: &P2) -> bool;
    /// Check if the shape shares any area with a rect
    fn intersects_rect(&self, rect: &Rect) -> bool;
    /// Check if the shape fully contains a given rect
    fn contains_rect(&self, rect: &Rect) -> bool;

    /// Get the bounding rect of the shape
    fn rect(&self) -> Rect {
        Rect::new(self.start(), self.end())
    }

    /// Check if the shape's boundary passes through the rect, i.e. the rect is
    /// neither fully inside nor fully outside of the shape
    fn straddles(&self, rect: &Rect) -> bool {
        self.intersects_rect(rect) && !self.contains_rect(rect)
    }

    /// Check if the rect lies entirely outside of the shape
    fn excludes_rect(&self, rect: &Rect) -> bool {
        !self.intersects_rect(rect)
    }

    /// Check if the rect lies entirely inside of the shape
    fn covers_rect(&self, rect: &Rect) -> bool {
        self.contains_rect(rect)
    }
}

/// Represents an axis-aligned rectangle defined by two points: the start (top-left,
/// minimum) and the end (bottom-right, maximum). It is used for the regions of tree
/// nodes as well as a shape of its own.
///
/// Point containment is half-open: the minimum edges belong to the rect, the maximum
/// edges do not, so the four quarters of a rect partition it without sharing points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RectBounds"))]
pub struct Rect {
    start: P2,
    center: P2,
    end: P2,
}

impl Rect {
    /// Create a new rect with a start and end point
    pub fn new(start: P2, end: P2) -> Self {
        Self {
            start,
            center: na::center(&start, &end),
            end,
        }
    }

    /// Create a rect from its center and half extents
    pub fn from_center(center: P2, half_width: f64, half_height: f64) -> Self {
        let v = vector![half_width, half_height];
        Self {
            start: center - v,
            center,
            end: center + v,
        }
    }

    /// Create a square from its top-left corner and side length
    pub fn square(top_left: P2, side: f64) -> Self {
        Self::new(top_left, top_left + vector![side, side])
    }

    pub fn width(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn half_width(&self) -> f64 {
        self.width() / 2.
    }

    pub fn half_height(&self) -> f64 {
        self.height() / 2.
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The four corners, clockwise from the start corner
    pub fn corners(&self) -> [P2; 4] {
        let &Rect { start, end, .. } = self;
        [start, point![end.x, start.y], end, point![start.x, end.y]]
    }

    /// Check if the rect overlaps another rect with a non-zero area. Rects that
    /// only touch along an edge or at a corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.start.x < other.end.x
            && other.start.x < self.end.x
            && self.start.y < other.end.y
            && other.start.y < self.end.y
    }

    /// Quarter the rect to produce four smaller rects, indexed by [`Quadrant`]
    ///
    /// [`Quadrant`]: crate::Quadrant
    pub fn quarter(&self) -> [Self; 4] {
        let &Rect { start, center, end } = self;
        let diff = center - start;
        let diff_x = vector![diff.x, 0.];
        let diff_y = vector![0., diff.y];

        [
            Rect::new(start + diff_x, center + diff_x),
            Rect::new(start, center),
            Rect::new(start + diff_y, center + diff_y),
            Rect::new(center, end),
        ]
    }
}

impl Shape for Rect {
    fn start(&self) -> P2 {
        self.start
    }

    fn end(&self) -> P2 {
        self.end
    }

    fn center(&self) -> P2 {
        self.center
    }

    fn contains(&self, point: &P2) -> bool {
        point.x >= self.start.x
            && point.x < self.end.x
            && point.y >= self.start.y
            && point.y < self.end.y
    }

    fn intersects_rect(&self, rect: &Rect) -> bool {
        self.intersects(rect)
    }

    fn contains_rect(&self, rect: &Rect) -> bool {
        rect.start.x >= self.start.x
            && rect.end.x <= self.end.x
            && rect.start.y >= self.start.y
            && rect.end.y <= self.end.y
    }

    fn rect(&self) -> Rect {
        *self
    }
}

/// The serialized form of a [`Rect`]: the cached center is recomputed on load
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RectBounds {
    start: P2,
    end: P2,
}

#[cfg(feature = "serde")]
impl From<RectBounds> for Rect {
    fn from(bounds: RectBounds) -> Self {
        Rect::new(bounds.start, bounds.end)
    }
}

/// Represents a circle defined by a center point and radius. Containment is strict:
/// points exactly on the perimeter are outside.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CircleParams"))]
pub struct Circle {
    center: P2,
    radius: f64,
    start: P2,
    end: P2,
}

/// The serialized form of a [`Circle`]: bounds are recomputed and the radius checked on load
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct CircleParams {
    center: P2,
    radius: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<CircleParams> for Circle {
    type Error = QuadTreeError;

    fn try_from(params: CircleParams) -> Result<Self> {
        Circle::new(params.center, params.radius)
    }
}

impl Circle {
    /// Create a new circle with a center point and radius
    ///
    /// ## Errors
    /// - `InvalidShape` if the center is not finite or the radius is negative,
    ///   infinite or NaN
    pub fn new(center: P2, radius: f64) -> Result<Self> {
        if !(center.x.is_finite() && center.y.is_finite()) {
            return Err(QuadTreeError::InvalidShape(format!(
                "circle center ({}, {}) is not finite",
                center.x, center.y
            )));
        }
        if !(radius.is_finite() && radius >= 0.) {
            return Err(QuadTreeError::InvalidShape(format!(
                "circle radius {radius} must be finite and non-negative"
            )));
        }

        let v = vector![radius, radius];
        Ok(Self {
            center,
            radius,
            start: center - v,
            end: center + v,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The point of `rect` closest to the circle's center
    fn closest_point(&self, rect: &Rect) -> P2 {
        let (start, end) = (rect.start(), rect.end());
        point![
            self.center.x.max(start.x).min(end.x),
            self.center.y.max(start.y).min(end.y)
        ]
    }

    /// Euclidean distance from the center to the nearest point of `rect`
    pub fn min_distance_to_rect(&self, rect: &Rect) -> f64 {
        na::distance(&self.center, &self.closest_point(rect))
    }

    /// Euclidean distance from the center to the farthest corner of `rect`
    pub fn max_distance_to_rect(&self, rect: &Rect) -> f64 {
        rect.corners()
            .iter()
            .map(|corner| na::distance(&self.center, corner))
            .fold(0., f64::max)
    }
}

impl Shape for Circle {
    fn start(&self) -> P2 {
        self.start
    }

    fn end(&self) -> P2 {
        self.end
    }

    fn center(&self) -> P2 {
        self.center
    }

    fn contains(&self, point: &P2) -> bool {
        na::distance_squared(&self.center, point) < self.radius * self.radius
    }

    fn intersects_rect(&self, rect: &Rect) -> bool {
        self.contains(&self.closest_point(rect))
    }

    fn contains_rect(&self, rect: &Rect) -> bool {
        rect.corners().iter().all(|corner| self.contains(corner))
    }

    fn excludes_rect(&self, rect: &Rect) -> bool {
        self.min_distance_to_rect(rect) > self.radius
    }

    /// A corner on the perimeter is outside the circle, so it keeps the rect from
    /// being covered
    fn covers_rect(&self, rect: &Rect) -> bool {
        rect.corners()
            .iter()
            .all(|corner| na::distance_squared(&self.center, corner) < self.radius * self.radius)
    }
}

/// A boundary shape of either supported kind, for mixed shape lists
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Boundary {
    Circle(Circle),
    Rect(Rect),
}

impl From<Circle> for Boundary {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<Rect> for Boundary {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl Shape for Boundary {
    fn start(&self) -> P2 {
        match self {
            Self::Circle(c) => c.start(),
            Self::Rect(r) => r.start(),
        }
    }

    fn end(&self) -> P2 {
        match self {
            Self::Circle(c) => c.end(),
            Self::Rect(r) => r.end(),
        }
    }

    fn center(&self) -> P2 {
        match self {
            Self::Circle(c) => c.center(),
            Self::Rect(r) => r.center(),
        }
    }

    fn contains(&self, point: &P2) -> bool {
        match self {
            Self::Circle(c) => c.contains(point),
            Self::Rect(r) => r.contains(point),
        }
    }

    fn intersects_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Circle(c) => c.intersects_rect(rect),
            Self::Rect(r) => r.intersects_rect(rect),
        }
    }

    fn contains_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Circle(c) => c.contains_rect(rect),
            Self::Rect(r) => r.contains_rect(rect),
        }
    }

    fn excludes_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Circle(c) => c.excludes_rect(rect),
            Self::Rect(r) => r.excludes_rect(rect),
        }
    }

    fn covers_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Circle(c) => c.covers_rect(rect),
            Self::Rect(r) => r.covers_rect(rect),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::QuadTreeError,
        util::tests::{make_circle, make_rect},
    };
    use nalgebra::point;

    use super::*;

    #[test]
    fn rect_properties() {
        let rect = make_rect(0.0, 0.0, 10.0, 20.0);
        assert_eq!(rect.start(), point![0.0, 0.0]);
        assert_eq!(rect.end(), point![10.0, 20.0]);
        assert_eq!(
            rect.center(),
            point![5.0, 10.0],
            "Center should be at (5.0, 10.0)"
        );
        assert_eq!(rect.half_width(), 5.0);
        assert_eq!(rect.half_height(), 10.0);
        assert_eq!(rect.area(), 200.0);
    }

    #[test]
    fn rect_constructors_agree() {
        let by_corners = make_rect(-128.0, -128.0, 128.0, 128.0);
        let by_center = Rect::from_center(point![0.0, 0.0], 128.0, 128.0);
        let by_side = Rect::square(point![-128.0, -128.0], 256.0);
        assert_eq!(by_corners, by_center);
        assert_eq!(by_corners, by_side);
    }

    #[test]
    fn rect_contains_point_half_open() {
        let rect = make_rect(0.0, 0.0, 10.0, 10.0);
        assert!(
            rect.contains(&point![5.0, 5.0]),
            "Rect should contain point (5.0, 5.0)"
        );
        assert!(
            !rect.contains(&point![-1.0, 5.0]),
            "Rect should not contain point (-1.0, 5.0)"
        );
        assert!(
            rect.contains(&point![0.0, 0.0]),
            "Rect should contain its start point"
        );
        assert!(
            !rect.contains(&point![10.0, 10.0]),
            "Rect should not contain its end point"
        );
        assert!(
            !rect.contains(&point![10.0, 5.0]),
            "Maximum x edge should be outside"
        );
        assert!(
            rect.contains(&point![5.0, 0.0]),
            "Minimum y edge should be inside"
        );
    }

    #[test]
    fn rect_intersects_with_another_rect() {
        let rect1 = make_rect(0.0, 0.0, 10.0, 10.0);
        let rect2 = make_rect(5.0, 5.0, 15.0, 15.0);
        assert!(
            rect1.intersects(&rect2),
            "Rect1 should intersect with Rect2"
        );

        let rect3 = make_rect(10.0, 10.0, 20.0, 20.0);
        assert!(
            !rect1.intersects(&rect3),
            "Rects touching at a corner share no area"
        );

        let rect4 = make_rect(10.0, 0.0, 20.0, 10.0);
        assert!(
            !rect1.intersects(&rect4),
            "Rects sharing an edge share no area"
        );

        let rect5 = make_rect(3.0, 3.0, 7.0, 7.0);
        assert!(
            rect1.intersects(&rect5),
            "Rect5 is entirely inside Rect1, should intersect"
        );
        assert!(rect5.intersects(&rect1), "Intersection should be symmetric");

        let rect6 = make_rect(5.0, -5.0, 15.0, 5.0);
        assert!(
            rect1.intersects(&rect6),
            "Rect6 should intersect with the top part of Rect1"
        );

        let rect7 = make_rect(-10.0, 0.0, -1.0, 10.0);
        assert!(
            !rect1.intersects(&rect7),
            "Rect1 should not intersect with Rect7 on the left"
        );
    }

    #[test]
    fn rect_contains_another_rect() {
        let outer_rect = make_rect(0.0, 0.0, 10.0, 10.0);
        assert!(
            outer_rect.contains_rect(&make_rect(1.0, 1.0, 9.0, 9.0)),
            "Outer rect should contain inner rect completely"
        );
        assert!(
            outer_rect.contains_rect(&outer_rect),
            "A rect should contain itself"
        );
        assert!(
            !outer_rect.contains_rect(&make_rect(5.0, 5.0, 15.0, 15.0)),
            "Outer rect should not contain overlapping rect"
        );
    }

    #[test]
    fn quartering_rect() {
        let rect = make_rect(0.0, 0.0, 10.0, 10.0);
        let quarters = rect.quarter();
        assert_eq!(
            quarters[0],
            make_rect(5.0, 0.0, 10.0, 5.0),
            "NE quarter should be top-right"
        );
        assert_eq!(
            quarters[1],
            make_rect(0.0, 0.0, 5.0, 5.0),
            "NW quarter should be top-left"
        );
        assert_eq!(
            quarters[2],
            make_rect(0.0, 5.0, 5.0, 10.0),
            "SW quarter should be bottom-left"
        );
        assert_eq!(
            quarters[3],
            make_rect(5.0, 5.0, 10.0, 10.0),
            "SE quarter should be bottom-right"
        );
    }

    #[test]
    fn quarters_tile_the_parent() {
        let rect = make_rect(-128.0, -128.0, 128.0, 128.0);
        let quarters = rect.quarter();

        let total: f64 = quarters.iter().map(Rect::area).sum();
        assert_eq!(total, rect.area(), "Quarter areas should sum to the parent");

        for (i, a) in quarters.iter().enumerate() {
            assert!(rect.contains_rect(a), "Quarter {i} should lie in the parent");
            assert_eq!(a.width(), rect.width() / 2.);
            assert_eq!(a.height(), rect.height() / 2.);
            for b in &quarters[i + 1..] {
                assert!(!a.intersects(b), "Quarters should not overlap");
            }
        }
    }

    #[test]
    fn circle_properties_and_bounds() {
        let circle = make_circle(5.0, 5.0, 5.0);
        assert_eq!(circle.center(), point![5.0, 5.0]);
        assert_eq!(circle.radius(), 5.0, "Radius should be 5.0");
        assert_eq!(circle.start(), point![0.0, 0.0]);
        assert_eq!(circle.end(), point![10.0, 10.0]);
        assert_eq!(circle.rect(), make_rect(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn circle_contains_point() {
        let circle = make_circle(5.0, 5.0, 5.0);
        assert!(
            circle.contains(&point![5.0, 5.0]),
            "Circle should contain its center point"
        );
        assert!(
            !circle.contains(&point![0.0, 5.0]),
            "Circle should not contain a point on its perimeter"
        );
        assert!(
            circle.contains(&point![0.1, 5.0]),
            "Circle should contain a point just inside its perimeter"
        );
        assert!(
            !circle.contains(&point![0.0, 0.0]),
            "Circle should not contain points outside its boundary"
        );
    }

    #[test]
    fn circle_intersects_rect() {
        let circle = make_circle(0.0, 0.0, 5.0);
        assert!(
            circle.intersects_rect(&make_rect(-1.0, -1.0, 1.0, 1.0)),
            "Rect around the center should intersect"
        );
        assert!(
            circle.intersects_rect(&make_rect(3.0, 3.0, 10.0, 10.0)),
            "Rect overlapping the perimeter should intersect"
        );
        assert!(
            !circle.intersects_rect(&make_rect(5.0, -1.0, 10.0, 1.0)),
            "Rect tangent to the perimeter should not intersect"
        );
        assert!(
            !circle.intersects_rect(&make_rect(4.0, 4.0, 10.0, 10.0)),
            "Rect past the perimeter diagonal should not intersect"
        );
    }

    #[test]
    fn circle_contains_rect() {
        let circle = make_circle(5.0, 5.0, 5.0);
        assert!(
            circle.contains_rect(&make_rect(4.0, 4.0, 6.0, 6.0)),
            "Circle should contain rect"
        );
        assert!(
            !circle.contains_rect(&make_rect(5.0, 5.0, 10.0, 10.0)),
            "Circle should not contain overlapping rect"
        );

        // Inscribed square: every corner lies exactly on the perimeter
        let inscribed = Rect::from_center(point![0.0, 0.0], 3.0, 4.0);
        let circle = make_circle(0.0, 0.0, 5.0);
        assert!(
            !circle.contains_rect(&inscribed),
            "Corners on the perimeter should not count as contained"
        );
        assert_eq!(circle.max_distance_to_rect(&inscribed), 5.0);
        assert!(
            !circle.covers_rect(&inscribed),
            "Corners on the perimeter should not count as covered"
        );
        assert!(circle.covers_rect(&Rect::from_center(point![0.0, 0.0], 2.9, 3.9)));
    }

    #[test]
    fn circle_rejects_invalid_radius() {
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    Circle::new(point![0.0, 0.0], radius),
                    Err(QuadTreeError::InvalidShape(_))
                ),
                "Radius {radius} should be rejected"
            );
        }
        assert!(Circle::new(point![f64::NAN, 0.0], 1.0).is_err());

        let point_circle = Circle::new(point![1.0, 1.0], 0.0).unwrap();
        assert!(
            !point_circle.contains(&point![1.0, 1.0]),
            "A zero radius circle contains nothing"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn circle_deserialization_recomputes_bounds() {
        let circle: Circle = serde_json::from_str(
            r#"{ "center": [5.0, 5.0], "radius": 2.0, "start": [0.0, 0.0], "end": [0.0, 0.0] }"#,
        )
        .unwrap();
        assert_eq!(circle, make_circle(5.0, 5.0, 2.0));
        assert_eq!(circle.rect(), make_rect(3.0, 3.0, 7.0, 7.0));

        let negative = serde_json::from_str::<Circle>(r#"{ "center": [0.0, 0.0], "radius": -3.0 }"#);
        assert!(negative.is_err(), "A negative radius must not deserialize");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rect_deserialization_recomputes_center() {
        let rect: Rect = serde_json::from_str(
            r#"{ "start": [0.0, 0.0], "center": [90.0, 90.0], "end": [100.0, 100.0] }"#,
        )
        .unwrap();
        assert_eq!(rect.center(), point![50.0, 50.0]);
        assert_eq!(rect, make_rect(0.0, 0.0, 100.0, 100.0));

        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(serde_json::from_str::<Rect>(&json).unwrap(), rect);
    }

    #[test]
    fn circle_distances_to_rect() {
        let circle = make_circle(0.0, 0.0, 5.0);
        let rect = make_rect(3.0, 0.0, 6.0, 4.0);
        assert_eq!(circle.min_distance_to_rect(&rect), 3.0);
        assert_eq!(circle.max_distance_to_rect(&rect), (36.0f64 + 16.0).sqrt());

        let around = make_rect(-1.0, -1.0, 1.0, 1.0);
        assert_eq!(
            circle.min_distance_to_rect(&around),
            0.0,
            "A rect around the center has zero distance"
        );
    }

    #[test]
    fn circle_culling() {
        let circle = make_circle(0.0, 0.0, 5.0);
        assert!(circle.excludes_rect(&make_rect(6.0, 0.0, 8.0, 2.0)));
        assert!(
            !circle.excludes_rect(&make_rect(5.0, 0.0, 8.0, 2.0)),
            "A tangent rect is not beyond the radius"
        );
        assert!(circle.covers_rect(&make_rect(-1.0, -1.0, 1.0, 1.0)));
        assert!(!circle.covers_rect(&make_rect(-1.0, -1.0, 5.0, 1.0)));
    }

    #[test]
    fn straddling() {
        let circle = make_circle(0.0, 0.0, 5.0);
        assert!(circle.straddles(&make_rect(0.0, 0.0, 8.0, 8.0)));
        assert!(!circle.straddles(&make_rect(-1.0, -1.0, 1.0, 1.0)));
        assert!(!circle.straddles(&make_rect(10.0, 10.0, 12.0, 12.0)));

        let rect = make_rect(0.0, 0.0, 10.0, 10.0);
        assert!(rect.straddles(&make_rect(5.0, 5.0, 15.0, 15.0)));
        assert!(!rect.straddles(&make_rect(0.0, 0.0, 10.0, 10.0)));
        assert!(!rect.straddles(&make_rect(10.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn boundary_delegates_to_shape() {
        let circle = make_circle(0.0, 0.0, 5.0);
        let rect = make_rect(0.0, 0.0, 10.0, 10.0);
        let shapes = [Boundary::from(circle), Boundary::from(rect)];

        let probe = make_rect(2.0, 2.0, 8.0, 8.0);
        assert_eq!(shapes[0].straddles(&probe), circle.straddles(&probe));
        assert_eq!(shapes[1].contains_rect(&probe), rect.contains_rect(&probe));
        assert_eq!(shapes[0].covers_rect(&probe), circle.covers_rect(&probe));
        assert_eq!(shapes[1].rect(), rect);
        assert!(shapes[0].contains(&point![1.0, 1.0]));
        assert!(!shapes[1].contains(&point![10.0, 1.0]));
    }
}
