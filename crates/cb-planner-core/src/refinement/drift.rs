use tracing::warn;

use super::Refinement;
use crate::constraint::Constraint;
use crate::flow::FlowField;
use crate::heuristic::{Heuristic, OpposingFlowEnergy};

/// Downstream drift (spec §4.3): install `thrust` so a vehicle coasts
/// with the flow on constraints that already run downstream, and holds
/// full thrust on the rest. Requires every constraint to already carry
/// a `direction` (i.e. to have passed through a directing refinement).
#[derive(Debug, Clone, Copy)]
pub struct DownstreamDrift<F: FlowField> {
    pub flow: F,
}

impl<F: FlowField> DownstreamDrift<F> {
    pub fn new(flow: F) -> Self {
        Self { flow }
    }
}

impl<F: FlowField> Refinement for DownstreamDrift<F> {
    fn refine(&self, constraints: &mut [Constraint]) {
        if constraints.iter().any(|c| c.parameters().direction.is_none()) {
            warn!("downstream drift: constraint list has an undirected constraint, skipping");
            return;
        }

        for c in constraints.iter_mut() {
            let ingress = c.ingress_points()[0];
            let egress = c.egress_points()[0];
            let constraint_dir = egress.sub(&ingress).normalized();
            let flow_dir = self.flow.sample(ingress).normalized();

            let size = c.coordinate_count();
            let mut thrust = Vec::with_capacity(size);
            thrust.push((0.0, 1.0));
            let tail = size.saturating_sub(1);
            if constraint_dir.dot(&flow_dir) > 0.0 {
                thrust.extend(std::iter::repeat((0.0, 0.0)).take(tail));
            } else {
                thrust.extend(std::iter::repeat((0.0, 1.0)).take(tail));
            }
            c.parameters_mut().thrust = Some(thrust);
        }
    }
}

/// Maximize flow alignment (spec §4.3): order the constraint list by an
/// opposing-flow-energy cost and assign directions so the cheaper half
/// runs one way and the costlier half the other, splitting load between
/// the two "lanes" rather than driving every constraint against the
/// current.
#[derive(Debug, Clone, Copy)]
pub struct MaximizeFlowAlignment<F: FlowField> {
    pub flow: F,
    pub nominal_speed: f64,
    pub delta: f64,
}

impl<F: FlowField> MaximizeFlowAlignment<F> {
    pub fn new(flow: F) -> Self {
        Self::with_params(flow, 0.5, 0.01)
    }

    pub fn with_params(flow: F, nominal_speed: f64, delta: f64) -> Self {
        Self {
            flow,
            nominal_speed,
            delta,
        }
    }

    fn constraint_cost(&self, c: &Constraint) -> f64 {
        let heuristic = OpposingFlowEnergy::with_delta(&self.flow, self.nominal_speed, self.delta);
        let coords = c.raw_coords();
        coords.windows(2).map(|pair| heuristic.cost(pair[0], pair[1])).sum()
    }
}

impl<F: FlowField> Refinement for MaximizeFlowAlignment<F> {
    fn refine(&self, constraints: &mut [Constraint]) {
        if constraints.is_empty() {
            return;
        }

        let mut ranked: Vec<(usize, f64)> = constraints.iter().enumerate().map(|(i, c)| (i, self.constraint_cost(c))).collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let split = (ranked.len() as f64 / 2.0).ceil() as usize;
        for (rank, (idx, _)) in ranked.into_iter().enumerate() {
            let direction = if rank < split { [0, 1] } else { [1, 0] };
            constraints[idx].parameters_mut().direction = Some(direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ConstantFlowField;
    use crate::geometry::Point;

    #[test]
    fn downstream_drift_coasts_when_aligned_with_flow() {
        let flow = ConstantFlowField::new(0.0, 1.0);
        let mut constraints = vec![Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 2.0)])];
        constraints[0].parameters_mut().direction = Some([0, 1]);

        DownstreamDrift::new(flow).refine(&mut constraints);

        let thrust = constraints[0].parameters().thrust.clone().unwrap();
        assert_eq!(thrust.len(), 3);
        assert_eq!(thrust[0], (0.0, 1.0));
        assert_eq!(thrust[1], (0.0, 0.0));
        assert_eq!(thrust[2], (0.0, 0.0));
    }

    #[test]
    fn downstream_drift_holds_thrust_against_flow() {
        let flow = ConstantFlowField::new(0.0, 1.0);
        let mut constraints = vec![Constraint::open(vec![Point::new(0.0, 2.0), Point::new(0.0, 1.0), Point::new(0.0, 0.0)])];
        constraints[0].parameters_mut().direction = Some([0, 1]);

        DownstreamDrift::new(flow).refine(&mut constraints);

        let thrust = constraints[0].parameters().thrust.clone().unwrap();
        assert_eq!(thrust[1], (0.0, 1.0));
        assert_eq!(thrust[2], (0.0, 1.0));
    }

    #[test]
    fn downstream_drift_skips_undirected_constraints() {
        let flow = ConstantFlowField::new(0.0, 1.0);
        let mut constraints = vec![Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)])];
        DownstreamDrift::new(flow).refine(&mut constraints);
        assert!(constraints[0].parameters().thrust.is_none());
    }

    #[test]
    fn maximize_flow_alignment_splits_cheap_and_costly_halves() {
        let flow = ConstantFlowField::new(0.0, 1.0);
        let constraints = vec![
            Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0)]),
            Constraint::open(vec![Point::new(1.0, 10.0), Point::new(1.0, 0.0)]),
        ];
        let mut constraints = constraints;
        MaximizeFlowAlignment::new(flow).refine(&mut constraints);

        let dirs: Vec<[u8; 2]> = constraints.iter().map(|c| c.parameters().direction.unwrap()).collect();
        assert_eq!(dirs[0], [0, 1]);
        assert_eq!(dirs[1], [1, 0]);
    }
}
