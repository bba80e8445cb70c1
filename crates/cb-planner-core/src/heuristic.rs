//! The cost-function collaborator contract (spec §6): sequencers and the
//! maximize-flow-alignment refinement are written against `Heuristic`
//! rather than a concrete distance function.

use crate::flow::FlowField;
use crate::geometry::Point;

/// A cost function between two points.
pub trait Heuristic {
    fn cost(&self, p: Point, q: Point) -> f64;

    /// Energy-aware variant used by flow-informed heuristics; defaults to
    /// the speed-independent cost.
    fn cost_with_speed(&self, p: Point, q: Point, _speed: f64) -> f64 {
        self.cost(p, q)
    }
}

/// Plain Euclidean distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl Heuristic for EuclideanDistance {
    fn cost(&self, p: Point, q: Point) -> f64 {
        p.distance_to(&q)
    }
}

/// Energy cost of traversing from `p` to `q` against a flow field: the
/// travel time at `nominal_speed` is inflated by the component of flow
/// opposing the direction of travel. Used both as a sequencing heuristic
/// and, pairwise along a constraint, as the per-constraint cost in
/// "maximize flow alignment" (spec §4.3).
#[derive(Debug, Clone)]
pub struct OpposingFlowEnergy<'a, F: FlowField> {
    pub flow: &'a F,
    pub nominal_speed: f64,
    /// Numeric floor on effective speed, preventing a division blowup
    /// when flow directly opposes travel at a speed near zero.
    pub delta: f64,
}

impl<'a, F: FlowField> OpposingFlowEnergy<'a, F> {
    pub fn new(flow: &'a F, nominal_speed: f64) -> Self {
        Self::with_delta(flow, nominal_speed, 0.05)
    }

    pub fn with_delta(flow: &'a F, nominal_speed: f64, delta: f64) -> Self {
        Self {
            flow,
            nominal_speed,
            delta,
        }
    }
}

impl<'a, F: FlowField> Heuristic for OpposingFlowEnergy<'a, F> {
    fn cost(&self, p: Point, q: Point) -> f64 {
        self.cost_with_speed(p, q, self.nominal_speed)
    }

    fn cost_with_speed(&self, p: Point, q: Point, speed: f64) -> f64 {
        let dist = p.distance_to(&q);
        if dist < f64::EPSILON {
            return 0.0;
        }
        let travel_dir = q.sub(&p).normalized();
        let flow = self.flow.sample(p);
        let opposing = -flow.dot(&travel_dir);
        let effective_speed = (speed + opposing).max(self.delta);
        dist / effective_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ConstantFlowField;

    #[test]
    fn euclidean_matches_distance() {
        let h = EuclideanDistance;
        assert_eq!(h.cost(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn opposing_flow_costs_more_against_current() {
        let flow = ConstantFlowField::new(1.0, 0.0);
        let h = OpposingFlowEnergy::new(&flow, 0.5);
        let with_flow = h.cost(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let against_flow = h.cost(Point::new(0.0, 0.0), Point::new(-1.0, 0.0));
        assert!(against_flow > with_flow);
    }
}
