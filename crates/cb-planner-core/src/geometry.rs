//! Geometric primitives and the `Area`/polygon collaborator contract.
//!
//! The polygon library itself is out of scope for the planning pipeline
//! (see the crate-level docs); this module provides the thin, concrete
//! collaborator the rest of the crate is written against, backed by the
//! `geo`/`geo-buf` crates.

use std::f64::consts::PI;

use geo::{Coord, LineString, Polygon as GeoPolygon};

/// A point in the plane.
///
/// A plain pair of coordinates with the handful of vector operations the
/// pipeline actually needs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn scale(&self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s)
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Point {
        let n = self.norm();
        if n < f64::EPSILON {
            *self
        } else {
            self.scale(1.0 / n)
        }
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate by +90 degrees (counter-clockwise).
    pub fn rotated_90(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        self.distance_to(other) <= eps
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Point::new(value.0, value.1)
    }
}

impl From<Coord<f64>> for Point {
    fn from(value: Coord<f64>) -> Self {
        Point::new(value.x, value.y)
    }
}

impl From<Point> for Coord<f64> {
    fn from(value: Point) -> Self {
        Coord {
            x: value.x,
            y: value.y,
        }
    }
}

/// Axis-aligned bounding rectangle, `(x_min, y_min, x_max, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Join style applied by a polygon's inward/outward buffer operation.
///
/// `geo-buf` offsets via a straight-skeleton construction rather than a
/// true miter join; this is the stand-in chosen for this implementation
/// (see DESIGN.md) and is the only join style `PolygonArea` supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiterJoin;

/// Contract for the bounded 2D region a coverage path must traverse.
///
/// The polygon library itself is out of scope for the planning pipeline;
/// this trait is the seam layouts are written against so a different
/// polygon backend could be substituted without touching the pipeline.
pub trait Area {
    fn bounds(&self) -> Bounds;
    fn vertices(&self) -> &[Point];
    /// Interior angle in degrees at each exterior vertex, indexed the same
    /// as `vertices()`.
    fn interior_angles(&self) -> Vec<f64>;
    fn polygon(&self) -> &Polygon;

    /// Minimum interior angle across the polygon's vertices, in degrees.
    fn min_interior_angle(&self) -> f64 {
        self.interior_angles()
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Convenience matching the external `Area` contract's `offset_domain`.
    fn offset_domain(&self, d: f64) -> Option<Polygon> {
        self.polygon().buffer(-d)
    }
}

/// Thin wrapper around `geo::Polygon` exposing only the operations the
/// pipeline needs: inward/outward buffering and line intersection.
#[derive(Debug, Clone)]
pub struct Polygon {
    inner: GeoPolygon<f64>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Self {
        let mut coords: Vec<Coord<f64>> = exterior.into_iter().map(Coord::from).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        Self {
            inner: GeoPolygon::new(LineString::new(coords), vec![]),
        }
    }

    pub fn from_geo(inner: GeoPolygon<f64>) -> Self {
        Self { inner }
    }

    /// Exterior ring, closed (first == last), matching the `Area`
    /// contract's `exterior_coords()`.
    pub fn exterior_coords(&self) -> Vec<Point> {
        self.inner
            .exterior()
            .coords()
            .map(|c| Point::new(c.x, c.y))
            .collect()
    }

    /// Exterior vertices with the duplicated closing vertex dropped, the
    /// representation layouts build constraints from.
    pub fn exterior_vertices(&self) -> Vec<Point> {
        let mut coords = self.exterior_coords();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        coords
    }

    pub fn bounds(&self) -> Bounds {
        let mut x_min = f64::INFINITY;
        let mut y_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for c in self.inner.exterior().coords() {
            x_min = x_min.min(c.x);
            y_min = y_min.min(c.y);
            x_max = x_max.max(c.x);
            y_max = y_max.max(c.y);
        }
        Bounds {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Offset the polygon by `distance`: positive grows outward, negative
    /// shrinks inward. Returns `None` when an inward offset erodes the
    /// polygon to nothing (geometry infeasible, spec.md §7).
    pub fn buffer(&self, distance: f64) -> Option<Polygon> {
        if distance == 0.0 {
            return Some(self.clone());
        }
        let buffered = geo_buf::buffer_polygon(&self.inner, distance);
        let biggest = buffered
            .0
            .into_iter()
            .max_by(|a, b| polygon_area(a).partial_cmp(&polygon_area(b)).unwrap())?;
        if biggest.exterior().coords().count() < 3 {
            return None;
        }
        Some(Polygon::from_geo(biggest))
    }

    /// Intersection of this polygon's boundary with a line segment,
    /// returned as a sorted-by-parameter list of crossing points.
    pub fn intersect_segment(&self, a: Point, b: Point) -> Vec<Point> {
        let mut hits = Vec::new();
        let ring = self.inner.exterior().coords().collect::<Vec<_>>();
        for window in ring.windows(2) {
            let (p1, p2) = (Point::from(window[0]), Point::from(window[1]));
            if let Some(hit) = segment_intersection(a, b, p1, p2) {
                hits.push(hit);
            }
        }
        dedup_points(hits, 1e-9)
    }

    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        !self.intersect_segment(a, b).is_empty()
    }

    /// Ray-casting point-in-polygon test against the exterior ring only
    /// (the pipeline never builds polygons with holes).
    pub fn contains_point(&self, p: Point) -> bool {
        let ring = self.inner.exterior().coords().collect::<Vec<_>>();
        let mut inside = false;
        for window in ring.windows(2) {
            let (a, b) = (window[0], window[1]);
            let crosses = (a.y > p.y) != (b.y > p.y);
            if crosses {
                let x_at_y = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_at_y {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

fn polygon_area(p: &GeoPolygon<f64>) -> f64 {
    let coords: Vec<Coord<f64>> = p.exterior().coords().copied().collect();
    let mut area = 0.0;
    for w in coords.windows(2) {
        area += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    area.abs() / 2.0
}

fn dedup_points(mut pts: Vec<Point>, eps: f64) -> Vec<Point> {
    pts.retain(|_| true);
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    'outer: for p in pts.drain(..) {
        for existing in &out {
            if existing.approx_eq(&p, eps) {
                continue 'outer;
            }
        }
        out.push(p);
    }
    out
}

/// Standard segment-segment intersection test, returning the crossing
/// point if the two closed segments intersect at a single point.
fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1 = p2.sub(&p1);
    let d2 = p4.sub(&p3);
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < 1e-12 {
        return None;
    }
    let diff = p3.sub(&p1);
    let t = (diff.x * d2.y - diff.y * d2.x) / denom;
    let u = (diff.x * d1.y - diff.y * d1.x) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1.add(&d1.scale(t)))
    } else {
        None
    }
}

/// Compute the interior angle, in degrees, at vertex `i` of a closed
/// vertex ring (no duplicated closing vertex).
pub fn interior_angle_degrees(ring: &[Point], i: usize) -> f64 {
    let n = ring.len();
    let prev = ring[(i + n - 1) % n];
    let curr = ring[i];
    let next = ring[(i + 1) % n];

    let v1 = prev.sub(&curr);
    let v2 = next.sub(&curr);
    let dot = v1.dot(&v2);
    let cross = v1.x * v2.y - v1.y * v2.x;
    let angle = cross.atan2(dot).to_degrees();
    let angle = angle.rem_euclid(360.0);
    // interior angle for a CCW-oriented simple polygon is the signed
    // turn normalized into (0, 360); callers only use the minimum, so a
    // consistent convention is sufficient.
    if angle == 0.0 {
        360.0
    } else {
        angle
    }
}

/// Concrete `Area` backed by an exterior vertex list.
#[derive(Debug, Clone)]
pub struct PolygonArea {
    vertices: Vec<Point>,
    polygon: Polygon,
    interior_angles: Vec<f64>,
}

impl PolygonArea {
    pub fn new(vertices: Vec<Point>) -> Self {
        let polygon = Polygon::new(vertices.clone());
        let interior_angles = (0..vertices.len())
            .map(|i| interior_angle_degrees(&vertices, i))
            .collect();
        Self {
            vertices,
            polygon,
            interior_angles,
        }
    }
}

impl Area for PolygonArea {
    fn bounds(&self) -> Bounds {
        self.polygon.bounds()
    }

    fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn interior_angles(&self) -> Vec<f64> {
        self.interior_angles.clone()
    }

    fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

/// Boundary offset chosen per spec.md §4.2: `max(rv, b * sin(theta_min/2))`.
pub fn boundary_offset(vehicle_radius: f64, b: f64, min_interior_angle_degrees: f64) -> f64 {
    let half_angle = (min_interior_angle_degrees / 2.0).to_radians();
    vehicle_radius.max(b * half_angle.sin())
}

pub(crate) const TWO_PI: f64 = 2.0 * PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_bounds() {
        let area = PolygonArea::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let b = area.bounds();
        assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn square_min_interior_angle_is_90() {
        let area = PolygonArea::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        assert!((area.min_interior_angle() - 90.0).abs() < 1e-6);
    }

    #[test]
    fn inward_buffer_shrinks_square() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let shrunk = poly.buffer(-1.0).expect("offset should remain nonempty");
        let b = shrunk.bounds();
        assert!((b.width() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn segment_intersection_basic() {
        let hit = segment_intersection(
            Point::new(0.0, -1.0),
            Point::new(0.0, 1.0),
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
        );
        assert!(hit.unwrap().approx_eq(&Point::new(0.0, 0.0), 1e-9));
    }
}
