//! Shape outlines computed from a drag's start and current points.
//!
//! Everything here is pure: outlines are plain [`BezPath`]s that a surface
//! can stroke or fill, so the math can be tested without a raster.

use kurbo::{BezPath, Circle, PathEl, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, TAU};

/// Angle between the shaft and each arrowhead barb.
pub const ARROW_HEAD_ANGLE: f64 = FRAC_PI_6;
/// Arrowhead barb length as a fraction of the shaft length.
pub const ARROW_HEAD_RATIO: f64 = 0.3;
/// Upper bound on the barb length in physical pixels.
pub const ARROW_HEAD_MAX: f64 = 20.0;

/// Flattening tolerance for circle outlines.
const CIRCLE_TOLERANCE: f64 = 0.1;

/// Two-point parametric shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    Rectangle,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
    Arrow,
    Line,
}

impl ShapeKind {
    /// Whether the outline encloses an area. Open shapes are never filled.
    pub fn is_closed(self) -> bool {
        !matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }
}

/// A computed shape outline.
#[derive(Debug, Clone)]
pub struct Outline {
    pub kind: ShapeKind,
    pub path: BezPath,
}

impl Outline {
    pub fn is_closed(&self) -> bool {
        self.kind.is_closed()
    }

    /// Whether a fill may be applied to this outline.
    pub fn is_fillable(&self) -> bool {
        self.is_closed()
    }

    /// End points of every segment in drawing order (move, line and curve
    /// targets). The implicit return of a close is not repeated.
    pub fn vertices(&self) -> Vec<Point> {
        self.path
            .elements()
            .iter()
            .filter_map(|el| match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => Some(p),
                PathEl::ClosePath => None,
            })
            .collect()
    }

    /// Whether the path ends with a close.
    pub fn ends_closed(&self) -> bool {
        matches!(self.path.elements().last(), Some(PathEl::ClosePath))
    }
}

/// Compute the outline of `kind` dragged from `origin` to `current`.
pub fn outline(kind: ShapeKind, origin: Point, current: Point) -> Outline {
    let path = match kind {
        ShapeKind::Square => square(origin, current),
        ShapeKind::Rectangle => rectangle(origin, current),
        ShapeKind::Circle => Circle::new(origin, origin.distance(current)).to_path(CIRCLE_TOLERANCE),
        ShapeKind::Triangle => triangle(origin, current),
        ShapeKind::Pentagon => regular_polygon(origin, origin.distance(current), 5),
        ShapeKind::Hexagon => regular_polygon(origin, origin.distance(current), 6),
        ShapeKind::Arrow => arrow(origin, current),
        ShapeKind::Line => line(origin, current),
    };
    Outline { kind, path }
}

/// Square anchored at `origin`; only the horizontal drag distance sizes it.
fn square(origin: Point, current: Point) -> BezPath {
    let side = (current.x - origin.x).abs();
    rectangle(origin, Point::new(origin.x + side, origin.y + side))
}

/// Axis-aligned rectangle from `origin` to `current`, corners in drag order.
fn rectangle(origin: Point, current: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(origin);
    path.line_to((current.x, origin.y));
    path.line_to(current);
    path.line_to((origin.x, current.y));
    path.close_path();
    path
}

/// Isosceles triangle: apex at `origin`, base mirrored about its vertical.
fn triangle(origin: Point, current: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(origin);
    path.line_to(current);
    path.line_to((origin.x - (current.x - origin.x), current.y));
    path.close_path();
    path
}

/// Regular polygon with `sides` vertices, the first at angle zero.
pub fn regular_polygon(center: Point, radius: f64, sides: usize) -> BezPath {
    let mut path = BezPath::new();
    for i in 0..sides {
        let angle = i as f64 * TAU / sides as f64;
        let vertex = center + Vec2::from_angle(angle) * radius;
        if i == 0 {
            path.move_to(vertex);
        } else {
            path.line_to(vertex);
        }
    }
    path.close_path();
    path
}

/// Length of each arrowhead barb for a shaft of `shaft_length`.
pub fn arrow_head_length(shaft_length: f64) -> f64 {
    (shaft_length * ARROW_HEAD_RATIO).min(ARROW_HEAD_MAX)
}

fn arrow(origin: Point, current: Point) -> BezPath {
    let mut path = line(origin, current);

    let shaft = current - origin;
    let angle = shaft.atan2();
    let head = arrow_head_length(shaft.hypot());

    for barb_angle in [angle - ARROW_HEAD_ANGLE, angle + ARROW_HEAD_ANGLE] {
        path.move_to(current);
        path.line_to(current - Vec2::from_angle(barb_angle) * head);
    }
    path
}

fn line(origin: Point, current: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(origin);
    path.line_to(current);
    path
}
