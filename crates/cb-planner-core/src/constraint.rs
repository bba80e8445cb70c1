//! The constraint model (spec §3, §4.1, §9): a tagged union of an open
//! polyline and a closed loop, each carrying a closed (non-dynamic)
//! parameter record rather than the source's runtime attribute
//! installation.

use crate::error::{Error, Result};
use crate::geometry::Point;

const EPS: f64 = 1e-9;

/// The shared, closed set of parameters a constraint may carry.
///
/// The source installs these by `setattr` on demand; here the set is
/// fixed and every field is simply `Option`-absent until a stage installs
/// it (spec §9).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    /// `[a, b]`: `a` indexes the ingress endpoint, `b` the egress endpoint.
    pub direction: Option<[u8; 2]>,
    /// For closed constraints: the current allowed ingress points.
    pub transition: Option<Vec<Point>>,
    /// Per-coordinate `(low, high)` admissible thrust-fraction range.
    pub thrust: Option<Vec<(f64, f64)>>,
}

/// An open polyline constraint: ≥1 points, ingress/egress are the first
/// and last (or the single point, if length 1).
#[derive(Debug, Clone)]
pub struct OpenConstraint {
    coords: Vec<Point>,
    params: Parameters,
}

impl OpenConstraint {
    pub fn new(coords: Vec<Point>) -> Self {
        assert!(!coords.is_empty(), "open constraint needs at least one point");
        Self {
            coords,
            params: Parameters::default(),
        }
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    fn endpoint(&self, index: u8) -> Point {
        if self.coords.len() == 1 {
            self.coords[0]
        } else if index == 0 {
            self.coords[0]
        } else {
            *self.coords.last().unwrap()
        }
    }

    /// Which endpoint index (`0` or `1`) a point matches, if any.
    fn endpoint_index(&self, p: Point) -> Option<u8> {
        if self.coords[0].approx_eq(&p, EPS) {
            Some(0)
        } else if self.coords.last().unwrap().approx_eq(&p, EPS) {
            Some(1)
        } else {
            None
        }
    }

    pub fn select_ingress(&mut self, p: Point) -> bool {
        match self.endpoint_index(p) {
            None => false,
            Some(i) => {
                if self.params.direction.is_none() {
                    self.params.direction = Some([i, 1 - i]);
                }
                true
            }
        }
    }

    pub fn ingress_points(&self) -> Vec<Point> {
        match self.params.direction {
            Some([a, _]) => vec![self.endpoint(a)],
            None => {
                if self.coords.len() == 1 {
                    vec![self.coords[0]]
                } else {
                    vec![self.coords[0], *self.coords.last().unwrap()]
                }
            }
        }
    }

    pub fn egress_points(&self) -> Vec<Point> {
        match self.params.direction {
            Some([_, b]) => vec![self.endpoint(b)],
            None => {
                if self.coords.len() == 1 {
                    vec![self.coords[0]]
                } else {
                    vec![self.coords[0], *self.coords.last().unwrap()]
                }
            }
        }
    }

    pub fn coordinates(&self, ingress: Option<Point>, _endpoint_offset: f64) -> Result<Vec<Point>> {
        if let Some(p) = ingress {
            let idx = self.endpoint_index(p).ok_or(Error::InvalidIngress)?;
            if let Some([a, _]) = self.params.direction {
                if idx != a {
                    return Err(Error::DirectionViolation);
                }
            }
        }
        let reversed = matches!(self.params.direction, Some([1, _]));
        if reversed {
            let mut rev = self.coords.clone();
            rev.reverse();
            Ok(rev)
        } else {
            Ok(self.coords.clone())
        }
    }

    /// Number of coordinates this constraint emits, for `thrust` sizing.
    pub fn coordinate_count(&self) -> usize {
        self.coords.len()
    }
}

/// A closed loop constraint: every vertex is potentially an ingress or
/// egress point.
#[derive(Debug, Clone)]
pub struct ClosedConstraint {
    coords: Vec<Point>,
    params: Parameters,
}

impl ClosedConstraint {
    pub fn new(coords: Vec<Point>) -> Self {
        assert!(coords.len() >= 3, "closed constraint needs at least 3 points");
        Self {
            coords,
            params: Parameters::default(),
        }
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    pub fn ingress_points(&self) -> Vec<Point> {
        self.params.transition.clone().unwrap_or_else(|| self.coords.clone())
    }

    pub fn egress_points(&self) -> Vec<Point> {
        self.ingress_points()
    }

    /// Narrows `transition` by *positional index* within the current
    /// ingress set, not by coordinate value (spec §9 open question).
    pub fn select_ingress(&mut self, p: Point) -> bool {
        let current = self.ingress_points();
        let j = match current.iter().position(|c| c.approx_eq(&p, EPS)) {
            Some(j) => j,
            None => return false,
        };
        match &self.params.transition {
            None => self.params.transition = Some(vec![p]),
            Some(transition) => {
                let narrowed = transition[j];
                self.params.transition = Some(vec![narrowed]);
            }
        }
        true
    }

    pub fn coordinates(&mut self, ingress: Option<Point>, endpoint_offset: f64) -> Result<Vec<Point>> {
        let t_point = match ingress {
            Some(p) => {
                if !self.select_ingress(p) {
                    return Err(Error::InvalidIngress);
                }
                self.ingress_points()[0]
            }
            None => self.ingress_points()[0],
        };

        let n = self.coords.len();
        let t = self
            .coords
            .iter()
            .position(|c| c.approx_eq(&t_point, EPS))
            .ok_or(Error::InvalidIngress)?;

        let step: isize = if matches!(self.params.direction, Some([1, _])) { -1 } else { 1 };

        let mut out = Vec::with_capacity(n + 1);
        for k in 0..n {
            let idx = rem_euclid_isize(t as isize + step * k as isize, n);
            out.push(self.coords[idx]);
        }

        let prior_idx = rem_euclid_isize(t as isize - step, n);
        let prior = self.coords[prior_idx];
        let here = self.coords[t];
        let dir = here.sub(&prior).normalized();
        let final_point = here.sub(&dir.scale(endpoint_offset));
        out.push(final_point);

        Ok(out)
    }

    /// Number of coordinates this constraint emits, for `thrust` sizing:
    /// every vertex once, plus the trailing wrap-closing point
    /// `coordinates()` appends.
    pub fn coordinate_count(&self) -> usize {
        self.coords.len() + 1
    }
}

fn rem_euclid_isize(value: isize, modulus: usize) -> usize {
    value.rem_euclid(modulus as isize) as usize
}

/// A geometric coverage primitive: an open polyline or a closed loop,
/// together with its parameter record.
#[derive(Debug, Clone)]
pub enum Constraint {
    Open(OpenConstraint),
    Closed(ClosedConstraint),
}

impl Constraint {
    pub fn open(coords: Vec<Point>) -> Self {
        Constraint::Open(OpenConstraint::new(coords))
    }

    pub fn closed(coords: Vec<Point>) -> Self {
        Constraint::Closed(ClosedConstraint::new(coords))
    }

    pub fn parameters(&self) -> &Parameters {
        match self {
            Constraint::Open(c) => c.parameters(),
            Constraint::Closed(c) => c.parameters(),
        }
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        match self {
            Constraint::Open(c) => c.parameters_mut(),
            Constraint::Closed(c) => c.parameters_mut(),
        }
    }

    pub fn select_ingress(&mut self, p: Point) -> bool {
        match self {
            Constraint::Open(c) => c.select_ingress(p),
            Constraint::Closed(c) => c.select_ingress(p),
        }
    }

    pub fn ingress_points(&self) -> Vec<Point> {
        match self {
            Constraint::Open(c) => c.ingress_points(),
            Constraint::Closed(c) => c.ingress_points(),
        }
    }

    pub fn egress_points(&self) -> Vec<Point> {
        match self {
            Constraint::Open(c) => c.egress_points(),
            Constraint::Closed(c) => c.egress_points(),
        }
    }

    pub fn coordinates(&mut self, ingress: Option<Point>, endpoint_offset: f64) -> Result<Vec<Point>> {
        match self {
            Constraint::Open(c) => c.coordinates(ingress, endpoint_offset),
            Constraint::Closed(c) => c.coordinates(ingress, endpoint_offset),
        }
    }

    pub fn coordinate_count(&self) -> usize {
        match self {
            Constraint::Open(c) => c.coordinate_count(),
            Constraint::Closed(c) => c.coordinate_count(),
        }
    }

    /// The constraint's raw, as-stored coordinate list, independent of
    /// any `direction` — used by refinements that need a direction-naive
    /// traversal (spec §4.3's "maximize flow alignment" cost).
    pub fn raw_coords(&self) -> &[Point] {
        match self {
            Constraint::Open(c) => c.coords(),
            Constraint::Closed(c) => c.coords(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Constraint::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_select_ingress_installs_direction() {
        let mut c = OpenConstraint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(c.select_ingress(Point::new(1.0, 0.0)));
        assert_eq!(c.parameters().direction, Some([1, 0]));
    }

    #[test]
    fn open_select_ingress_installs_direction_on_a_singleton() {
        // A single-coordinate open constraint still has one endpoint
        // (index 0, per `endpoint_index`'s first branch); selecting it
        // as ingress must install `direction` the same as any other
        // open constraint, with no length-based exception.
        let mut c = OpenConstraint::new(vec![Point::new(3.0, 4.0)]);
        assert!(c.select_ingress(Point::new(3.0, 4.0)));
        assert_eq!(c.parameters().direction, Some([0, 1]));
    }

    #[test]
    fn open_select_ingress_rejects_non_endpoint() {
        let mut c = OpenConstraint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
        assert!(!c.select_ingress(Point::new(1.0, 0.0)));
    }

    #[test]
    fn open_coordinates_respects_direction() {
        let mut c = OpenConstraint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        c.select_ingress(Point::new(1.0, 0.0));
        let coords = c.coordinates(None, 0.0).unwrap();
        assert_eq!(coords, vec![Point::new(1.0, 0.0), Point::new(0.0, 0.0)]);
    }

    #[test]
    fn open_coordinates_fails_on_direction_violation() {
        let mut c = OpenConstraint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        c.select_ingress(Point::new(0.0, 0.0));
        let err = c.coordinates(Some(Point::new(1.0, 0.0)), 0.0);
        assert!(matches!(err, Err(Error::DirectionViolation)));
    }

    #[test]
    fn closed_coordinates_start_at_ingress_and_wrap() {
        let mut c = ClosedConstraint::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let coords = c.coordinates(Some(Point::new(1.0, 0.0)), 0.0).unwrap();
        assert_eq!(coords[0], Point::new(1.0, 0.0));
        assert!(coords.last().unwrap().approx_eq(&Point::new(1.0, 0.0), 1e-9));
    }

    #[test]
    fn closed_select_ingress_uses_first_positional_match() {
        // A self-touching loop with a duplicated vertex value: select_ingress
        // must resolve to the *first* occurrence (list.index semantics),
        // matching the source's positional lookup rather than an
        // equality-based search that could match either occurrence
        // (spec §9 open question).
        let mut c = ClosedConstraint::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert!(c.select_ingress(Point::new(1.0, 0.0)));
        let coords = c.coordinates(None, 0.0).unwrap();
        assert_eq!(coords[0], Point::new(1.0, 0.0));
    }
}
