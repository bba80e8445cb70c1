//! The planner facade (spec.md §4.6): composes one `(layout, refinements,
//! sequencer, linker)` tuple into a single `plan()` entry point, plus
//! convenience constructors named after the source's concrete planner
//! classes (`cb_cpp/planners.py`'s `ConstraintBasedLawnmower`,
//! `DriftingLawnmower`, `EnergyEfficientCoverage`).

use tracing::debug;

use crate::flow::FlowField;
use crate::geometry::{Area, Point};
use crate::heuristic::EuclideanDistance;
use crate::layout::{Layout, OrientedBoustrophedon};
use crate::linking::{Linker, SimpleLinker};
use crate::path::CoveragePath;
use crate::refinement::{AlternatingDirections, DownstreamDrift, MaximizeFlowAlignment, Refinement};
use crate::sequencing::{Greedy, Sequencer};

/// Runs the four-stage pipeline against a concrete `(layout, sequencer,
/// linker)` triple, with an ordered list of refinements applied between
/// layout and sequencing.
pub struct CoveragePlanner<L: Layout, S: Sequencer, K: Linker> {
    pub vehicle_radius: f64,
    pub sensor_radius: f64,
    pub layout: L,
    pub refinements: Vec<Box<dyn Refinement>>,
    pub sequencer: S,
    pub linker: K,
}

impl<L: Layout, S: Sequencer, K: Linker> CoveragePlanner<L, S, K> {
    pub fn new(vehicle_radius: f64, sensor_radius: f64, layout: L, sequencer: S, linker: K) -> Self {
        Self {
            vehicle_radius,
            sensor_radius,
            layout,
            refinements: Vec::new(),
            sequencer,
            linker,
        }
    }

    pub fn with_refinement(mut self, refinement: impl Refinement + 'static) -> Self {
        self.refinements.push(Box::new(refinement));
        self
    }

    /// Runs layout, every refinement in order, sequencing, then linking.
    /// An empty layout (geometry infeasible, spec.md §7) short-circuits to
    /// an empty path rather than running the remaining stages.
    pub fn plan(&self, area: &dyn Area, ingress: Option<Point>) -> CoveragePath {
        let mut constraints = self.layout.generate(area, self.vehicle_radius, self.sensor_radius);
        if constraints.is_empty() {
            debug!("planner: layout produced no constraints, returning an empty path");
            return CoveragePath::new();
        }

        for refinement in &self.refinements {
            refinement.refine(&mut constraints);
        }

        let chain = self.sequencer.sequence(constraints, ingress);
        self.linker.link(chain, ingress, area)
    }
}

type Lawnmower = CoveragePlanner<OrientedBoustrophedon, Greedy<EuclideanDistance>, SimpleLinker>;

impl Lawnmower {
    /// `ConstraintBasedLawnmower` (`cb_cpp/planners.py`): an oriented
    /// boustrophedon sweep, alternating transect directions, chained by
    /// nearest ingress.
    pub fn lawnmower(vehicle_radius: f64, sensor_radius: f64, sweep: Point) -> Self {
        CoveragePlanner::new(vehicle_radius, sensor_radius, OrientedBoustrophedon::new(sweep), Greedy::new(EuclideanDistance), SimpleLinker::new())
            .with_refinement(AlternatingDirections::new())
    }

    pub fn horizontal(vehicle_radius: f64, sensor_radius: f64) -> Self {
        Self::lawnmower(vehicle_radius, sensor_radius, Point::new(1.0, 0.0))
    }

    pub fn vertical(vehicle_radius: f64, sensor_radius: f64) -> Self {
        Self::lawnmower(vehicle_radius, sensor_radius, Point::new(0.0, 1.0))
    }

    pub fn parallel_to(vehicle_radius: f64, sensor_radius: f64, line: Point) -> Self {
        Self::lawnmower(vehicle_radius, sensor_radius, line)
    }

    pub fn perpendicular_to(vehicle_radius: f64, sensor_radius: f64, line: Point) -> Self {
        Self::lawnmower(vehicle_radius, sensor_radius, line.rotated_90())
    }

    /// `DriftingLawnmower`: a lawnmower sweep with a second refinement
    /// pass installing `thrust` so the vehicle coasts downstream.
    pub fn drifting_lawnmower<F: FlowField + 'static>(vehicle_radius: f64, sensor_radius: f64, sweep: Point, flow: F) -> Self {
        Self::lawnmower(vehicle_radius, sensor_radius, sweep).with_refinement(DownstreamDrift::new(flow))
    }

    /// `EnergyEfficientCoverage`: a lawnmower sweep whose transect
    /// directions are chosen by flow-alignment cost rather than a fixed
    /// alternation, so the costlier transects are the minority.
    pub fn energy_efficient<F: FlowField + 'static>(vehicle_radius: f64, sensor_radius: f64, sweep: Point, flow: F) -> Self {
        CoveragePlanner::new(
            vehicle_radius,
            sensor_radius,
            OrientedBoustrophedon::new(sweep),
            Greedy::new(EuclideanDistance),
            SimpleLinker::new(),
        )
        .with_refinement(MaximizeFlowAlignment::new(flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ConstantFlowField;
    use crate::geometry::PolygonArea;

    fn square() -> PolygonArea {
        PolygonArea::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)])
    }

    #[test]
    fn vertical_lawnmower_covers_the_square() {
        let planner = CoveragePlanner::vertical(0.5, 0.5);
        let path = planner.plan(&square(), None);
        assert!(path.length() > 0.0);
    }

    #[test]
    fn horizontal_and_vertical_use_orthogonal_sweeps() {
        let horizontal = CoveragePlanner::horizontal(0.5, 0.5).plan(&square(), None);
        let vertical = CoveragePlanner::vertical(0.5, 0.5).plan(&square(), None);
        assert!(horizontal.length() > 0.0);
        assert!(vertical.length() > 0.0);
    }

    #[test]
    fn drifting_lawnmower_installs_thrust() {
        let flow = ConstantFlowField::new(0.0, 1.0);
        let planner = CoveragePlanner::drifting_lawnmower(0.5, 0.5, Point::new(0.0, 1.0), flow);
        let path = planner.plan(&square(), None);
        assert!(path.thrust().iter().any(|t| t.is_some()));
    }

    #[test]
    fn energy_efficient_plans_a_nonempty_path() {
        let flow = ConstantFlowField::new(1.0, 0.0);
        let planner = CoveragePlanner::energy_efficient(0.5, 0.5, Point::new(0.0, 1.0), flow);
        let path = planner.plan(&square(), None);
        assert!(path.length() > 0.0);
    }

    #[test]
    fn empty_layout_yields_empty_path() {
        // A vehicle radius larger than the area's half-width erodes the
        // offset polygon to nothing (spec.md §7).
        let planner = CoveragePlanner::vertical(100.0, 0.5);
        let path = planner.plan(&square(), None);
        assert!(path.is_empty());
    }
}
