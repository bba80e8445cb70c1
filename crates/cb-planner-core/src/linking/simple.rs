use tracing::warn;

use super::Linker;
use crate::constraint::Constraint;
use crate::geometry::{Area, Point};
use crate::path::CoveragePath;

/// Simple linker (spec §4.5): concatenates each constraint's coordinates
/// in chain order, seeding with `ingress_point` if given and skipping
/// (with a log) any constraint whose `coordinates()` fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLinker {
    pub endpoint_offset: f64,
}

impl SimpleLinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint_offset(mut self, offset: f64) -> Self {
        self.endpoint_offset = offset;
        self
    }
}

impl Linker for SimpleLinker {
    fn link(&self, chain: Vec<Constraint>, ingress_point: Option<Point>, _area: &dyn Area) -> CoveragePath {
        let mut path = CoveragePath::new();
        if let Some(p) = ingress_point {
            path.add_point(p, None);
        }

        for mut c in chain {
            match c.coordinates(None, self.endpoint_offset) {
                Ok(coords) => {
                    let thrust = c.parameters().thrust.clone();
                    for (i, p) in coords.into_iter().enumerate() {
                        let t = thrust.as_ref().and_then(|t| t.get(i).copied());
                        path.add_point(p, t);
                    }
                }
                Err(err) => {
                    warn!("simple linker: could not determine direction on a constraint, skipping ({err})");
                }
            }
        }

        path
    }
}
