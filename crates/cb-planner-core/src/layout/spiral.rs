use tracing::debug;

use super::{compute_boundary_offset, Layout};
use crate::constraint::Constraint;
use crate::geometry::Area;

/// Spiral layout (spec §4.2.2): iteratively buffer the polygon inward,
/// emitting each successive exterior ring as a closed constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiralLayout {
    pub b: Option<f64>,
}

impl SpiralLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }
}

impl Layout for SpiralLayout {
    fn generate(&self, area: &dyn Area, vehicle_radius: f64, sensor_radius: f64) -> Vec<Constraint> {
        let theta_min = area.min_interior_angle();
        let first_offset = compute_boundary_offset(area, vehicle_radius, sensor_radius, self.b);
        let ring_step = vehicle_radius.max(2.0 * sensor_radius * (theta_min / 2.0).to_radians().sin());

        let mut constraints = Vec::new();
        let mut current = match area.offset_domain(first_offset) {
            Some(p) => p,
            None => {
                debug!("spiral: initial offset {first_offset} leaves no interior");
                return constraints;
            }
        };

        loop {
            let vertices = current.exterior_vertices();
            if vertices.len() < 3 {
                break;
            }
            constraints.push(Constraint::closed(vertices));

            current = match current.buffer(-ring_step) {
                Some(next) => next,
                None => break,
            };
        }

        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, PolygonArea};

    #[test]
    fn square_spiral_first_ring_matches_scenario() {
        let area = PolygonArea::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let layout = SpiralLayout::new();
        let constraints = layout.generate(&area, 0.5, 0.5);
        assert!(constraints.len() >= 2);
        if let Constraint::Closed(first) = &constraints[0] {
            let coords = first.coords();
            assert_eq!(coords.len(), 4);
            assert!(coords.iter().any(|p| p.approx_eq(&Point::new(0.5, 0.5), 1e-6)));
            assert!(coords.iter().any(|p| p.approx_eq(&Point::new(9.5, 9.5), 1e-6)));
        } else {
            panic!("expected closed constraint");
        }
    }

    #[test]
    fn square_spiral_rings_shrink_by_expected_step() {
        let area = PolygonArea::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let layout = SpiralLayout::new();
        let constraints = layout.generate(&area, 0.5, 0.75);
        let ring_width = |c: &Constraint| -> f64 {
            if let Constraint::Closed(c) = c {
                let xs: Vec<f64> = c.coords().iter().map(|p| p.x).collect();
                xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) - xs.iter().cloned().fold(f64::INFINITY, f64::min)
            } else {
                0.0
            }
        };
        assert!(constraints.len() >= 2);
        let shrink = ring_width(&constraints[0]) - ring_width(&constraints[1]);
        // 2 rings inward shift of 2*0.75*sin(45deg) per side => width shrinks by 2x that.
        assert!((shrink - 2.0 * (2.0 * 0.75 * (45f64.to_radians()).sin())).abs() < 1e-2);
    }
}
