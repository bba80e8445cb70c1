use tracing::{debug, warn};

use super::{compute_boundary_offset, Layout};
use crate::constraint::Constraint;
use crate::geometry::{Area, Point};

/// Cross-section fill strategy for the streamline layout (spec §4.2.3).
///
/// This layout's cross-section fill rules (especially `Centerline`) follow
/// a standalone worked description rather than a ported algorithm,
/// including a self-overwriting quirk that is preserved rather than
/// "fixed" (spec §9 open question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    #[default]
    None,
    Centerline,
    InnerBank,
    PrunedInnerBank,
}

/// Streamline layout: cross-sections between two paired "banks" of the
/// offset polygon's exterior, each filled into parallel transect slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamlineLayout {
    pub b: Option<f64>,
    pub bias: Bias,
}

impl StreamlineLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_bias(mut self, bias: Bias) -> Self {
        self.bias = bias;
        self
    }
}

struct CrossSection {
    outer: Point,
    inner: Point,
    dir: Point,
    length: f64,
}

impl Layout for StreamlineLayout {
    fn generate(&self, area: &dyn Area, vehicle_radius: f64, sensor_radius: f64) -> Vec<Constraint> {
        let o = compute_boundary_offset(area, vehicle_radius, sensor_radius, self.b);
        let offset = match area.offset_domain(o) {
            Some(p) => p,
            None => {
                warn!("streamline: boundary offset {o} erodes polygon to nothing");
                return Vec::new();
            }
        };

        let vertices = offset.exterior_vertices();
        if vertices.len() < 4 {
            warn!("streamline: offset polygon has too few vertices to pair into banks");
            return Vec::new();
        }

        let mid = vertices.len() / 2;
        let bank_outer = &vertices[0..mid];
        let bank_inner: Vec<Point> = vertices[mid..].iter().rev().cloned().collect();
        let pair_count = mid.min(bank_inner.len());

        let cross_sections: Vec<CrossSection> = (0..pair_count)
            .map(|i| {
                let outer = bank_outer[i];
                let inner = bank_inner[i];
                let length = outer.distance_to(&inner);
                let dir = if length > f64::EPSILON {
                    inner.sub(&outer).scale(1.0 / length)
                } else {
                    Point::new(0.0, 0.0)
                };
                CrossSection {
                    outer,
                    inner,
                    dir,
                    length,
                }
            })
            .collect();

        if cross_sections.is_empty() {
            return Vec::new();
        }

        let w_max = cross_sections.iter().map(|c| c.length).fold(f64::NEG_INFINITY, f64::max);
        let w_min = cross_sections.iter().map(|c| c.length).fold(f64::INFINITY, f64::min);
        debug!("streamline: cross-section length range [{w_min}, {w_max}]");

        let n_transects = ((w_max / (2.0 * sensor_radius)) - 1.0).ceil().max(0.0) as usize;
        let total_slots = n_transects + 2;

        let mut slots: Vec<Vec<Point>> = vec![Vec::with_capacity(cross_sections.len()); total_slots];

        for cs in &cross_sections {
            match self.bias {
                Bias::None => fill_uniform(cs, total_slots, &mut slots),
                Bias::Centerline => fill_centerline(cs, sensor_radius, total_slots, &mut slots),
                Bias::InnerBank => fill_inner_bank(cs, sensor_radius, total_slots, &mut slots, true),
                Bias::PrunedInnerBank => fill_inner_bank(cs, sensor_radius, total_slots, &mut slots, false),
            }
        }

        slots
            .into_iter()
            .filter(|coords| !coords.is_empty())
            .map(Constraint::open)
            .collect()
    }
}

fn fill_uniform(cs: &CrossSection, total_slots: usize, slots: &mut [Vec<Point>]) {
    let spacing = cs.length / (total_slots - 1).max(1) as f64;
    for (i, slot) in slots.iter_mut().enumerate() {
        let point = cs.outer.add(&cs.dir.scale(spacing * i as f64));
        slot.push(point);
    }
}

fn fill_centerline(cs: &CrossSection, sensor_radius: f64, total_slots: usize, slots: &mut [Vec<Point>]) {
    let tw = 2.0 * sensor_radius;
    let num_full = ((cs.length / (2.0 * tw)).floor() as usize + 1).min(total_slots);
    for k in 0..num_full {
        slots[k].push(cs.outer.add(&cs.dir.scale(tw * k as f64)));
    }

    // Fill every remaining slot with a duplicate of the centerline point
    // first. The pass below that walks additional full-width transects
    // back toward the outer bank restarts its own index at `num_full`
    // rather than continuing after this pass, so it revisits (and
    // double-fills) whichever slots just received a centerline
    // duplicate. This index collision is the centerline bias's
    // self-overwriting quirk; it is reproduced deliberately, not fixed.
    let centerline = cs.outer.add(&cs.dir.scale(cs.length / 2.0));
    for slot in slots.iter_mut().skip(num_full) {
        slot.push(centerline);
    }

    let mut idx = num_full;
    let mut k = 1;
    while idx < total_slots {
        let pos = cs.length / 2.0 - tw * k as f64;
        if pos < 0.0 {
            break;
        }
        slots[idx].push(cs.outer.add(&cs.dir.scale(pos)));
        idx += 1;
        k += 1;
    }

    while idx < total_slots {
        slots[idx].push(cs.inner);
        idx += 1;
    }
}

fn fill_inner_bank(cs: &CrossSection, sensor_radius: f64, total_slots: usize, slots: &mut [Vec<Point>], collapse_all_remaining: bool) {
    let tw = 2.0 * sensor_radius;
    let num_full = ((cs.length / tw).floor() as usize + 1).min(total_slots);
    for k in 0..num_full {
        slots[k].push(cs.outer.add(&cs.dir.scale(tw * k as f64)));
    }

    if collapse_all_remaining {
        for slot in slots.iter_mut().skip(num_full) {
            slot.push(cs.inner);
        }
    } else if num_full < total_slots {
        slots[total_slots - 1].push(cs.inner);
    }
}
