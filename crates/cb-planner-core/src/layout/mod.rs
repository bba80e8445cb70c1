//! Layout generators (spec §4.2): polygon → list of constraints.
//!
//! Every layout shares the same boundary-offset computation (`o = max(rV,
//! b * sin(theta_min/2))`) and works against the offset polygon rather
//! than the original one. Concrete layouts are small strategy structs
//! implementing `Layout`.

mod boustrophedon;
mod spiral;
mod streamline;

pub use boustrophedon::OrientedBoustrophedon;
pub use spiral::SpiralLayout;
pub use streamline::{Bias, StreamlineLayout};

use crate::constraint::Constraint;
use crate::geometry::{boundary_offset, Area};

/// A strategy that turns an area into an initial, undirected set of
/// constraints covering it.
pub trait Layout {
    fn generate(&self, area: &dyn Area, vehicle_radius: f64, sensor_radius: f64) -> Vec<Constraint>;
}

/// The shared boundary offset `o` from spec §4.2, given a caller `b`
/// (defaulting to `max(rV, rS)` when `None`).
pub(crate) fn compute_boundary_offset(area: &dyn Area, vehicle_radius: f64, sensor_radius: f64, b: Option<f64>) -> f64 {
    let b = b.unwrap_or_else(|| vehicle_radius.max(sensor_radius));
    boundary_offset(vehicle_radius, b, area.min_interior_angle())
}
