//! Planar geometry for structure outlines.
//!
//! All points live in the image-local pixel frame of the satellite tile
//! (origin top-left, y down). Lengths are converted to feet with a
//! pixels-per-foot scale factor derived from the map zoom level.

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_PIXELS_PER_FOOT, BASE_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis an edge was snapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    Horizontal,
    Vertical,
}

/// Image dimensions in pixels; taps outside are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub width: f64,
    pub height: f64,
}

impl ImageBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x.is_finite()
            && point.y.is_finite()
            && point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.width
            && point.y <= self.height
    }
}

/// Pixels per foot at the given zoom level.
///
/// `2^(zoom - 18) * 0.83`. This ignores latitude, so it is an approximation
/// of the true ground resolution.
pub fn pixels_per_foot(zoom: u8) -> f64 {
    2f64.powi(i32::from(zoom) - i32::from(BASE_ZOOM)) * BASE_PIXELS_PER_FOOT
}

/// Distance between two points in feet.
pub fn distance_ft(a: Point, b: Point, pixels_per_foot: f64) -> f64 {
    a.distance(b) / pixels_per_foot
}

/// Length of every edge of the closed polygon in feet, including last -> first.
pub fn edge_lengths_ft(points: &[Point], pixels_per_foot: f64) -> Vec<f64> {
    if points.len() < 2 {
        return Vec::new();
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| distance_ft(*a, *b, pixels_per_foot))
        .collect()
}

/// Perimeter of the closed polygon in feet.
pub fn perimeter_ft(points: &[Point], pixels_per_foot: f64) -> f64 {
    edge_lengths_ft(points, pixels_per_foot).iter().sum()
}

/// Twice the signed shoelace area in square pixels.
fn doubled_signed_area(points: &[Point]) -> f64 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

/// Area of the polygon in square feet (shoelace formula).
///
/// Assumes a simple polygon; see [`has_self_intersection`].
pub fn area_sqft(points: &[Point], pixels_per_foot: f64) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let area_px = doubled_signed_area(points).abs() / 2.0;
    area_px / (pixels_per_foot * pixels_per_foot)
}

/// Vertex average, used to anchor labels.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Direction of the edge `from -> to` in degrees, normalised to [0, 360).
pub fn edge_angle_degrees(from: Point, to: Point) -> f64 {
    let angle = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    angle.rem_euclid(360.0)
}

/// Snap `raw` so the edge from `previous` becomes axis-aligned when it is
/// within `threshold_degrees` of horizontal or vertical.
pub fn snap_to_axis(
    previous: Point,
    raw: Point,
    threshold_degrees: f64,
) -> (Point, Option<SnapAxis>) {
    if previous == raw {
        return (raw, None);
    }
    let angle = edge_angle_degrees(previous, raw);
    let near = |target: f64| (angle - target).abs() <= threshold_degrees;

    if near(0.0) || near(180.0) || near(360.0) {
        (Point::new(raw.x, previous.y), Some(SnapAxis::Horizontal))
    } else if near(90.0) || near(270.0) {
        (Point::new(previous.x, raw.y), Some(SnapAxis::Vertical))
    } else {
        (raw, None)
    }
}

/// Whether `point` lies strictly inside the closing radius around `anchor`.
pub fn is_within_radius(point: Point, anchor: Point, radius: f64) -> bool {
    point.distance(anchor) < radius
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn segments_cross(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// True if any two non-adjacent edges of the closed polygon properly cross.
///
/// Touching or collinear overlaps are not reported.
pub fn has_self_intersection(points: &[Point]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            // Edge n-1 shares vertex 0 with edge 0
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}
