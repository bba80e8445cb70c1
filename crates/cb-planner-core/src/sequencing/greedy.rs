use super::{take, Sequencer};
use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::heuristic::Heuristic;

/// Greedy nearest-ingress sequencer (spec §4.4): starts from whichever
/// constraint/ingress pair is closest to `start_point` (or the first
/// constraint's first ingress if none given), then repeatedly chains the
/// closest remaining ingress to the current egress.
#[derive(Debug, Clone, Copy)]
pub struct Greedy<H: Heuristic> {
    pub heuristic: H,
}

impl<H: Heuristic> Greedy<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl<H: Heuristic> Sequencer for Greedy<H> {
    fn sequence(&self, constraints: Vec<Constraint>, start_point: Option<Point>) -> Vec<Constraint> {
        if constraints.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<Constraint>> = constraints.into_iter().map(Some).collect();

        let (start_idx, ingress) = match start_point {
            None => (0, slots[0].as_ref().unwrap().ingress_points()[0]),
            Some(start) => best_ingress(&slots, |c| c.ingress_points(), |p| self.heuristic.cost(start, p))
                .expect("non-empty constraint list"),
        };

        slots[start_idx].as_mut().unwrap().select_ingress(ingress);
        let mut chain = vec![take(&mut slots, start_idx)];
        let mut chain_egress = chain[0].egress_points()[0];

        loop {
            let candidate = best_ingress(&slots, |c| c.ingress_points(), |p| self.heuristic.cost(chain_egress, p));
            let Some((idx, ingress)) = candidate else {
                break;
            };
            slots[idx].as_mut().unwrap().select_ingress(ingress);
            let next = take(&mut slots, idx);
            chain_egress = next.egress_points()[0];
            chain.push(next);
        }

        chain
    }
}

/// Among the still-present slots, find the `(index, point)` minimizing
/// `cost(point)` over every candidate point `points_of(constraint)` returns.
fn best_ingress(
    slots: &[Option<Constraint>],
    points_of: impl Fn(&Constraint) -> Vec<Point>,
    cost: impl Fn(Point) -> f64,
) -> Option<(usize, Point)> {
    let mut best: Option<(usize, Point, f64)> = None;
    for (idx, slot) in slots.iter().enumerate() {
        let Some(c) = slot else { continue };
        for p in points_of(c) {
            let c = cost(p);
            if best.as_ref().map_or(true, |(_, _, bc)| c < *bc) {
                best = Some((idx, p, c));
            }
        }
    }
    best.map(|(idx, p, _)| (idx, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::EuclideanDistance;

    #[test]
    fn greedy_chains_all_constraints_in_nearest_order() {
        let constraints = vec![
            Constraint::open(vec![Point::new(0.0, 5.0), Point::new(4.0, 5.0)]),
            Constraint::open(vec![Point::new(0.0, 1.0), Point::new(4.0, 1.0)]),
            Constraint::open(vec![Point::new(0.0, 3.0), Point::new(4.0, 3.0)]),
        ];
        let sequencer = Greedy::new(EuclideanDistance);
        let chain = sequencer.sequence(constraints, Some(Point::new(0.0, 0.1)));

        assert_eq!(chain.len(), 3);
        let ys: Vec<f64> = chain.iter().map(|c| c.ingress_points()[0].y).collect();
        assert_eq!(ys, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn greedy_defaults_to_first_constraint_without_start_point() {
        let constraints = vec![
            Constraint::open(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            Constraint::open(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.0)]),
        ];
        let sequencer = Greedy::new(EuclideanDistance);
        let chain = sequencer.sequence(constraints, None);
        assert_eq!(chain[0].ingress_points()[0], Point::new(0.0, 0.0));
    }
}
