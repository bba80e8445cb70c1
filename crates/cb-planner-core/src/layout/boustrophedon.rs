use tracing::{debug, warn};

use super::{compute_boundary_offset, Layout};
use crate::constraint::Constraint;
use crate::geometry::{Area, Point};

const NUDGE: f64 = 1e-6;
const MAX_NUDGE_RETRIES: usize = 10_000;

/// Oriented boustrophedon (spec §4.2.1): a back-and-forth sweep of
/// parallel transects along a caller-supplied sweep direction, unifying
/// the source's separate horizontal/vertical patterns.
#[derive(Debug, Clone)]
pub struct OrientedBoustrophedon {
    pub sweep: Point,
    pub b: Option<f64>,
}

impl OrientedBoustrophedon {
    pub fn new(sweep: Point) -> Self {
        Self {
            sweep: sweep.normalized(),
            b: None,
        }
    }

    pub fn with_b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }

    pub fn horizontal() -> Self {
        Self::new(Point::new(1.0, 0.0))
    }

    pub fn vertical() -> Self {
        Self::new(Point::new(0.0, 1.0))
    }
}

impl Layout for OrientedBoustrophedon {
    fn generate(&self, area: &dyn Area, vehicle_radius: f64, sensor_radius: f64) -> Vec<Constraint> {
        // `transect_dir` is the direction a single transect is drawn along
        // (the caller-supplied sweep vector itself); `step_dir`, its +90°
        // rotation, is the axis successive transects are offset along.
        let transect_dir = self.sweep;
        let step_dir = transect_dir.rotated_90();

        let o = compute_boundary_offset(area, vehicle_radius, sensor_radius, self.b);
        let offset = match area.offset_domain(o) {
            Some(p) => p,
            None => {
                warn!("oriented boustrophedon: boundary offset {o} erodes polygon to nothing");
                return Vec::new();
            }
        };

        // Step 1: transect-direction extent from the *original* polygon
        // vertices, long enough for the test segment to fully cross P'.
        let span_vals: Vec<f64> = area.vertices().iter().map(|v| v.dot(&transect_dir)).collect();
        let span_min = span_vals.iter().cloned().fold(f64::INFINITY, f64::min);
        let span_max = span_vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span_margin = (span_max - span_min).abs() * 0.05 + 1e-3;

        // Step 2: extrema of the offset polygon along the stepping axis.
        let offset_vertices = offset.exterior_vertices();
        if offset_vertices.len() < 3 {
            warn!("oriented boustrophedon: offset polygon degenerate");
            return Vec::new();
        }
        let u_vals: Vec<f64> = offset_vertices.iter().map(|v| v.dot(&step_dir)).collect();
        let (min_idx, u_min) = arg_extreme(&u_vals, false);
        let (max_idx, u_max) = arg_extreme(&u_vals, true);
        let v_start = offset_vertices[min_idx];
        let v_end = offset_vertices[max_idx];

        // Step 3.
        let w = u_max - u_min;
        if w <= 0.0 {
            return Vec::new();
        }
        let n_cells = (w / (2.0 * sensor_radius)).ceil().max(1.0) as usize;
        let delta = round_to(w / n_cells as f64, 5);

        let mut constraints = Vec::with_capacity(n_cells + 1);

        for i in 0..=n_cells {
            let nominal_u = u_min + delta * i as f64;
            let is_first = constraints.is_empty();

            let mut u = nominal_u;
            let mut attempts = 0usize;
            loop {
                let a = step_dir.scale(u).add(&transect_dir.scale(span_min - span_margin));
                let b = step_dir.scale(u).add(&transect_dir.scale(span_max + span_margin));
                let hits = offset.polygon().intersect_segment(a, b);

                if hits.len() >= 2 {
                    let mut sorted = hits;
                    sorted.sort_by(|p, q| p.dot(&transect_dir).partial_cmp(&q.dot(&transect_dir)).unwrap());
                    constraints.push(Constraint::open(sorted));
                    break;
                } else if hits.len() == 1 {
                    let anchor = if i == 0 { v_start } else { v_end };
                    if let Some(edge) = most_aligned_edge(&offset_vertices, anchor, step_dir) {
                        constraints.push(Constraint::open(edge));
                    }
                    break;
                } else {
                    attempts += 1;
                    if attempts > MAX_NUDGE_RETRIES {
                        warn!("oriented boustrophedon: giving up on sweep position {u} after {attempts} nudges");
                        break;
                    }
                    debug!("oriented boustrophedon: sweep line at {u} missed the offset polygon, nudging");
                    u += if is_first { NUDGE } else { -NUDGE };
                }
            }
        }

        constraints
    }
}

fn arg_extreme(values: &[f64], want_max: bool) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_val = values[0];
    for (i, &v) in values.iter().enumerate().skip(1) {
        if (want_max && v > best_val) || (!want_max && v < best_val) {
            best_val = v;
            best_idx = i;
        }
    }
    (best_idx, best_val)
}

/// The edge of `vertices` incident to `anchor` most aligned with
/// `step_dir`, oriented so the ingress endpoint is on the negative side
/// (spec §4.2.1 step 5).
fn most_aligned_edge(vertices: &[Point], anchor: Point, step_dir: Point) -> Option<Vec<Point>> {
    let n = vertices.len();
    let idx = vertices.iter().position(|v| v.approx_eq(&anchor, 1e-9))?;
    let prev = vertices[(idx + n - 1) % n];
    let next = vertices[(idx + 1) % n];
    let here = vertices[idx];

    let prev_edge = (here.sub(&prev).dot(&step_dir)).abs();
    let next_edge = (next.sub(&here).dot(&step_dir)).abs();

    let (a, b) = if next_edge >= prev_edge {
        (here, next)
    } else {
        (prev, here)
    };

    if a.dot(&step_dir) <= b.dot(&step_dir) {
        Some(vec![a, b])
    } else {
        Some(vec![b, a])
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolygonArea;

    fn square() -> PolygonArea {
        PolygonArea::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn square_vertical_boustrophedon_has_ten_transects() {
        let area = square();
        let layout = OrientedBoustrophedon::vertical();
        let constraints = layout.generate(&area, 0.5, 0.5);
        assert_eq!(constraints.len(), 10);
        for c in &constraints {
            if let Constraint::Open(open) = c {
                assert_eq!(open.coords().len(), 2);
            } else {
                panic!("expected open constraints");
            }
        }
    }

    #[test]
    fn square_vertical_boustrophedon_spans_full_height() {
        let area = square();
        let layout = OrientedBoustrophedon::vertical();
        let constraints = layout.generate(&area, 0.5, 0.5);
        if let Constraint::Open(open) = &constraints[0] {
            let ys: Vec<f64> = open.coords().iter().map(|p| p.y).collect();
            assert!((ys.iter().cloned().fold(f64::INFINITY, f64::min) - 0.5).abs() < 1e-6);
            assert!((ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max) - 9.5).abs() < 1e-6);
        }
    }
}
