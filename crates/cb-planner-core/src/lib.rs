//! Constraint-based coverage path planning.
//!
//! A coverage path planner turns a bounded 2D area into a single
//! traversal path that sweeps the whole area within a sensor footprint,
//! subject to a vehicle's turning radius. The pipeline runs in four
//! stages, each a small strategy interface with a handful of concrete
//! implementations:
//!
//! 1. **Layout** ([`layout`]) lays an initial, undirected set of
//!    [`constraint::Constraint`]s across an [`geometry::Area`].
//! 2. **Refinement** ([`refinement`]) annotates those constraints with a
//!    traversal `direction` and, for flow-aware variants, a `thrust`
//!    range.
//! 3. **Sequencing** ([`sequencing`]) orders the constraints into a
//!    chain, selecting an ingress point on each as it joins.
//! 4. **Linking** ([`linking`]) stitches the chain into one
//!    [`path::CoveragePath`].
//!
//! [`planner::CoveragePlanner`] is the facade that runs all four stages
//! given a concrete `(layout, refinements, sequencer, linker)` tuple.
//!
//! # Example
//!
//! ```
//! use cb_planner_core::geometry::{Point, PolygonArea};
//! use cb_planner_core::planner::CoveragePlanner;
//!
//! let area = PolygonArea::new(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ]);
//! let planner = CoveragePlanner::vertical(0.5, 0.5);
//! let path = planner.plan(&area, None);
//! assert!(path.length() > 0.0);
//! ```

#![deny(warnings)]

pub mod constraint;
pub mod error;
pub mod flow;
pub mod free_space;
pub mod geometry;
pub mod heuristic;
pub mod layout;
pub mod linking;
pub mod path;
pub mod planner;
pub mod refinement;
pub mod sequencing;

pub use constraint::{ClosedConstraint, Constraint, OpenConstraint, Parameters};
pub use error::{Error, Result};
pub use geometry::{Area, Point, Polygon, PolygonArea};
pub use path::CoveragePath;
pub use planner::CoveragePlanner;
