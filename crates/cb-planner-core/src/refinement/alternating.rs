use super::Refinement;
use crate::constraint::Constraint;
use crate::geometry::Point;

/// Alternating directions (spec §4.3): flip `direction` at every step,
/// optionally anchored to the constraint/endpoint nearest an ingress
/// point rather than always starting from the first constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternatingDirections {
    pub area_ingress_point: Option<Point>,
    pub starting_direction: [u8; 2],
}

impl AlternatingDirections {
    pub fn new() -> Self {
        Self {
            area_ingress_point: None,
            starting_direction: [0, 1],
        }
    }

    pub fn with_ingress(mut self, p: Point) -> Self {
        self.area_ingress_point = Some(p);
        self
    }
}

fn flip(d: [u8; 2]) -> [u8; 2] {
    [d[1], d[0]]
}

impl Refinement for AlternatingDirections {
    fn refine(&self, constraints: &mut [Constraint]) {
        if constraints.is_empty() {
            return;
        }

        let default_direction = if self.starting_direction == [0, 0] {
            [0, 1]
        } else {
            self.starting_direction
        };

        let mut start_idx = 0;
        let mut start_direction = default_direction;

        if let Some(ingress) = self.area_ingress_point {
            let mut best: Option<(usize, Point, f64)> = None;
            for (idx, c) in constraints.iter().enumerate() {
                for p in c.ingress_points() {
                    let d = p.distance_to(&ingress);
                    if best.as_ref().map_or(true, |(_, _, bd)| d < *bd) {
                        best = Some((idx, p, d));
                    }
                }
            }
            if let Some((idx, point, _)) = best {
                constraints[idx].select_ingress(point);
                start_idx = idx;
                start_direction = constraints[idx].parameters().direction.unwrap_or(default_direction);
            }
        }

        constraints[start_idx].parameters_mut().direction = Some(start_direction);

        let mut dir = flip(start_direction);
        for c in constraints.iter_mut().skip(start_idx + 1) {
            c.parameters_mut().direction = Some(dir);
            dir = flip(dir);
        }

        let mut dir = flip(start_direction);
        for c in constraints[..start_idx].iter_mut().rev() {
            c.parameters_mut().direction = Some(dir);
            dir = flip(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;

    #[test]
    fn alternates_from_first_constraint_by_default() {
        let mut constraints = vec![
            Constraint::open(vec![Point::new(0.5, 0.5), Point::new(0.5, 9.5)]),
            Constraint::open(vec![Point::new(1.5, 0.5), Point::new(1.5, 9.5)]),
            Constraint::open(vec![Point::new(2.5, 0.5), Point::new(2.5, 9.5)]),
        ];
        AlternatingDirections::new().refine(&mut constraints);
        let dirs: Vec<[u8; 2]> = constraints.iter().map(|c| c.parameters().direction.unwrap()).collect();
        assert_eq!(dirs, vec![[0, 1], [1, 0], [0, 1]]);
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let mut constraints = vec![
            Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]),
            Constraint::open(vec![Point::new(1.0, 0.0), Point::new(1.0, 1.0)]),
        ];
        let refinement = AlternatingDirections::new();
        refinement.refine(&mut constraints);
        let first: Vec<_> = constraints.iter().map(|c| c.parameters().direction).collect();
        refinement.refine(&mut constraints);
        let second: Vec<_> = constraints.iter().map(|c| c.parameters().direction).collect();
        assert_eq!(first, second);
    }
}
