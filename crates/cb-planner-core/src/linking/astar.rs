use tracing::warn;

use super::Linker;
use crate::constraint::Constraint;
use crate::free_space::FreeSpacePlanner;
use crate::geometry::{Area, Point};
use crate::path::CoveragePath;

/// A* linker (spec §4.5): same as `SimpleLinker`, but routes the gap
/// between the running path and each new constraint's first coordinate
/// through free space via a `FreeSpacePlanner` rather than a straight
/// jump. Because `CoveragePath` keeps `thrust` aligned to `coords`
/// coordinate-by-coordinate, the inserted connector waypoints simply
/// carry no thrust entry (`None`) -- there is no separate list to pad.
#[derive(Debug, Clone, Copy)]
pub struct AStarLinker<P: FreeSpacePlanner> {
    pub endpoint_offset: f64,
    pub planner: P,
}

impl<P: FreeSpacePlanner> AStarLinker<P> {
    pub fn new(planner: P) -> Self {
        Self {
            endpoint_offset: 0.0,
            planner,
        }
    }

    pub fn with_endpoint_offset(mut self, offset: f64) -> Self {
        self.endpoint_offset = offset;
        self
    }
}

impl<P: FreeSpacePlanner> Linker for AStarLinker<P> {
    fn link(&self, chain: Vec<Constraint>, ingress_point: Option<Point>, area: &dyn Area) -> CoveragePath {
        let mut path = CoveragePath::new();
        if let Some(p) = ingress_point {
            path.add_point(p, None);
        }

        for mut c in chain {
            match c.coordinates(None, self.endpoint_offset) {
                Ok(coords) => {
                    if let (Some(last), Some(&first)) = (path.coords().last().copied(), coords.first()) {
                        for waypoint in self.planner.route(area, last, first) {
                            path.add_point(waypoint, None);
                        }
                    }
                    let thrust = c.parameters().thrust.clone();
                    for (i, p) in coords.into_iter().enumerate() {
                        let t = thrust.as_ref().and_then(|t| t.get(i).copied());
                        path.add_point(p, t);
                    }
                }
                Err(err) => {
                    warn!("a* linker: could not determine direction on a constraint, skipping ({err})");
                }
            }
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::free_space::GridAStarPlanner;
    use crate::geometry::PolygonArea;

    #[test]
    fn inserts_connector_waypoints_between_constraints() {
        let mut a = Constraint::open(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        a.select_ingress(Point::new(0.0, 0.0));
        let mut b = Constraint::open(vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)]);
        b.select_ingress(Point::new(5.0, 5.0));

        let area = PolygonArea::new(vec![Point::new(-10.0, -10.0), Point::new(10.0, -10.0), Point::new(10.0, 10.0), Point::new(-10.0, 10.0)]);
        let linker = AStarLinker::new(GridAStarPlanner::new(0.5));
        let path = linker.link(vec![a, b], None, &area);

        assert!(path.coords().len() >= 4);
        assert_eq!(path.thrust().len(), path.coords().len());
    }
}
