//! Linkers (spec §4.5): stitch a sequenced constraint chain into one
//! `CoveragePath`.

mod astar;
mod simple;

pub use astar::AStarLinker;
pub use simple::SimpleLinker;

use crate::constraint::Constraint;
use crate::geometry::{Area, Point};
use crate::path::CoveragePath;

/// A strategy that turns an ordered constraint chain into a single path.
pub trait Linker {
    fn link(&self, chain: Vec<Constraint>, ingress_point: Option<Point>, area: &dyn Area) -> CoveragePath;
}
