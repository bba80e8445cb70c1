//! The coverage path container (spec.md §6's `Path` contract): a
//! coordinate list plus an aligned, possibly-sparse per-coordinate
//! `thrust` range, with a GeoJSON `save()` built via `serde_json`.

use std::fs;
use std::path::Path as FsPath;

use crate::error::{Error, Result};
use crate::geometry::Point;

/// A linked, sequenced coverage path: the final pipeline output.
#[derive(Debug, Clone, Default)]
pub struct CoveragePath {
    coords: Vec<Point>,
    thrust: Vec<Option<(f64, f64)>>,
}

impl CoveragePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn thrust(&self) -> &[Option<(f64, f64)>] {
        &self.thrust
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Total length as the sum of consecutive coordinate distances.
    pub fn length(&self) -> f64 {
        self.coords.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }

    pub fn add_point(&mut self, p: Point, thrust: Option<(f64, f64)>) {
        self.coords.push(p);
        self.thrust.push(thrust);
    }

    /// Applies `f` to every coordinate in place (e.g. a rotation or
    /// translation before handing the path to a vehicle's local frame).
    pub fn transform(&mut self, f: impl Fn(Point) -> Point) {
        for c in &mut self.coords {
            *c = f(*c);
        }
    }

    /// Serializes to a GeoJSON `Feature` with a `LineString` geometry and
    /// the per-coordinate thrust ranges as a parallel properties array.
    pub fn save(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let path = path.as_ref();
        let coordinates: Vec<[f64; 2]> = self.coords.iter().map(|p| [p.x, p.y]).collect();
        let thrust: Vec<Option<[f64; 2]>> = self.thrust.iter().map(|t| t.map(|(lo, hi)| [lo, hi])).collect();
        let feature = serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {
                "thrust": thrust,
            },
        });
        let body = serde_json::to_string_pretty(&feature)?;
        fs::write(path, body).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_sums_segment_distances() {
        let mut path = CoveragePath::new();
        path.add_point(Point::new(0.0, 0.0), Some((0.0, 1.0)));
        path.add_point(Point::new(3.0, 4.0), None);
        assert_eq!(path.length(), 5.0);
    }

    #[test]
    fn transform_applies_to_every_coordinate() {
        let mut path = CoveragePath::new();
        path.add_point(Point::new(1.0, 0.0), None);
        path.add_point(Point::new(2.0, 0.0), None);
        path.transform(|p| p.add(&Point::new(0.0, 10.0)));
        assert_eq!(path.coords()[0], Point::new(1.0, 10.0));
        assert_eq!(path.coords()[1], Point::new(2.0, 10.0));
    }
}
