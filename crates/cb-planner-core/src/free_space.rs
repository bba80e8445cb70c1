//! The free-space routing collaborator contract (spec.md §6's generic
//! "external A*-post-smoothed planner", out of scope for the core
//! pipeline itself but needed by the A* linker): a grid-rasterized A*
//! search over an `Area`'s interior, shaped after the open-set/closed-set
//! A* seen in `other_examples`' routee-compass search (`BinaryHeap`
//! frontier, separate g-score/came-from maps) but walking continuous
//! free space instead of a pre-built graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, warn};

use crate::geometry::{Area, Point};

/// Routes between two points through an area's free space.
pub trait FreeSpacePlanner {
    /// Intermediate waypoints from `from` to `to`, endpoints excluded.
    /// Empty if no route is found.
    fn route(&self, area: &dyn Area, from: Point, to: Point) -> Vec<Point>;
}

/// A* over a square grid laid across the area's bounding box, with cells
/// inside the polygon treated as free and everything else as an
/// obstacle. The raw cell-path is simplified with Douglas-Peucker before
/// being handed back.
#[derive(Debug, Clone, Copy)]
pub struct GridAStarPlanner {
    pub cell: f64,
    pub simplify_epsilon: f64,
}

impl GridAStarPlanner {
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            simplify_epsilon: cell * 0.5,
        }
    }

    pub fn with_simplify_epsilon(mut self, epsilon: f64) -> Self {
        self.simplify_epsilon = epsilon;
        self
    }
}

type Cell = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoredCell {
    f_score: f64,
    cell: Cell,
}

impl Eq for ScoredCell {}

impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so a max-heap (`BinaryHeap`) pops the lowest f-score.
        other.f_score.partial_cmp(&self.f_score).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const NEIGHBORS: [(i64, i64); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
const MAX_SEARCH_RADIUS: i64 = 64;

impl FreeSpacePlanner for GridAStarPlanner {
    fn route(&self, area: &dyn Area, from: Point, to: Point) -> Vec<Point> {
        let bounds = area.bounds();
        let origin = Point::new(bounds.x_min, bounds.y_min);
        let cell = self.cell;

        let to_cell = |p: Point| -> Cell { (((p.x - origin.x) / cell).round() as i64, ((p.y - origin.y) / cell).round() as i64) };
        let to_point = |c: Cell| -> Point { Point::new(origin.x + c.0 as f64 * cell, origin.y + c.1 as f64 * cell) };
        let polygon = area.polygon();
        let is_free = |c: Cell| polygon.contains_point(to_point(c));

        let (Some(start), Some(goal)) = (nearest_free(to_cell(from), is_free), nearest_free(to_cell(to), is_free)) else {
            warn!("free-space A*: no free cell near the requested endpoints");
            return Vec::new();
        };

        if start == goal {
            return Vec::new();
        }

        let h = |c: Cell| to_point(c).distance_to(&to_point(goal));

        let mut open = BinaryHeap::new();
        open.push(ScoredCell { f_score: h(start), cell: start });
        let mut came_from: HashMap<Cell, Cell> = HashMap::new();
        let mut g_score: HashMap<Cell, f64> = HashMap::new();
        g_score.insert(start, 0.0);

        let mut found = false;
        while let Some(ScoredCell { cell: current, .. }) = open.pop() {
            if current == goal {
                found = true;
                break;
            }
            let current_g = g_score[&current];
            for (dx, dy) in NEIGHBORS {
                let neighbor = (current.0 + dx, current.1 + dy);
                if !is_free(neighbor) {
                    continue;
                }
                let step_cost = if dx != 0 && dy != 0 { std::f64::consts::SQRT_2 } else { 1.0 } * cell;
                let tentative = current_g + step_cost;
                if tentative < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative);
                    open.push(ScoredCell {
                        f_score: tentative + h(neighbor),
                        cell: neighbor,
                    });
                }
            }
        }

        if !found {
            warn!("free-space A*: no path found between {:?} and {:?}", from, to);
            return Vec::new();
        }

        let mut cells = vec![goal];
        let mut cursor = goal;
        while let Some(&prev) = came_from.get(&cursor) {
            cells.push(prev);
            cursor = prev;
        }
        cells.reverse();

        let waypoints: Vec<Point> = cells.into_iter().map(to_point).collect();
        let simplified = douglas_peucker(&waypoints, self.simplify_epsilon);
        debug!("free-space A*: {} grid cells simplified to {} waypoints", waypoints.len(), simplified.len());

        if simplified.len() <= 2 {
            Vec::new()
        } else {
            simplified[1..simplified.len() - 1].to_vec()
        }
    }
}

fn nearest_free(center: Cell, is_free: impl Fn(Cell) -> bool) -> Option<Cell> {
    if is_free(center) {
        return Some(center);
    }
    for radius in 1..=MAX_SEARCH_RADIUS {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let c = (center.0 + dx, center.1 + dy);
                if is_free(c) {
                    return Some(c);
                }
            }
        }
    }
    None
}

fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let (first, last) = (points[0], *points.last().unwrap());
    let mut max_dist = 0.0;
    let mut index = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, first, last);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }
    if max_dist > epsilon {
        let mut left = douglas_peucker(&points[..=index], epsilon);
        let right = douglas_peucker(&points[index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b.sub(&a);
    let len = ab.norm();
    if len < f64::EPSILON {
        return p.distance_to(&a);
    }
    let ap = p.sub(&a);
    let cross = ab.x * ap.y - ab.y * ap.x;
    (cross / len).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolygonArea;

    fn square() -> PolygonArea {
        PolygonArea::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)])
    }

    #[test]
    fn routes_between_two_interior_points() {
        let area = square();
        let planner = GridAStarPlanner::new(0.5);
        let waypoints = planner.route(&area, Point::new(1.0, 1.0), Point::new(9.0, 9.0));
        // A straight diagonal across an empty square needs no intermediate
        // waypoints once simplified, but the route must not fail outright.
        assert!(waypoints.len() < 40);
    }

    #[test]
    fn douglas_peucker_collapses_a_straight_line() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(3.0, 0.0)];
        let simplified = douglas_peucker(&points, 0.01);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    }
}
