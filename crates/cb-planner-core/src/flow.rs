//! The vector flow-field collaborator contract (spec §3, §6): out of scope
//! for the pipeline itself, but needed by the downstream-drift and
//! maximize-flow-alignment refinements and by `OpposingFlowEnergy`.

use crate::geometry::Point;

/// A vector field sampled at a point.
pub trait FlowField {
    fn sample(&self, p: Point) -> Point;
}

/// A uniform flow field, the same vector everywhere.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFlowField {
    pub vector: Point,
}

impl ConstantFlowField {
    pub fn new(vx: f64, vy: f64) -> Self {
        Self {
            vector: Point::new(vx, vy),
        }
    }
}

impl FlowField for ConstantFlowField {
    fn sample(&self, _p: Point) -> Point {
        self.vector
    }
}

/// A grid-sampled flow field with bilinear interpolation between grid
/// nodes, for inputs closer to a real current/wind model than a constant
/// field.
#[derive(Debug, Clone)]
pub struct SampledFlowField {
    x_min: f64,
    y_min: f64,
    cell: f64,
    cols: usize,
    rows: usize,
    vectors: Vec<Point>,
}

impl SampledFlowField {
    /// `vectors` is row-major, `rows` rows of `cols` columns, covering the
    /// rectangle `[x_min, x_min + (cols-1)*cell] x [y_min, y_min + (rows-1)*cell]`.
    pub fn new(x_min: f64, y_min: f64, cell: f64, cols: usize, rows: usize, vectors: Vec<Point>) -> Self {
        assert_eq!(vectors.len(), cols * rows, "grid size mismatch");
        Self {
            x_min,
            y_min,
            cell,
            cols,
            rows,
            vectors,
        }
    }

    fn at(&self, col: usize, row: usize) -> Point {
        self.vectors[row * self.cols + col]
    }
}

impl FlowField for SampledFlowField {
    fn sample(&self, p: Point) -> Point {
        let fx = ((p.x - self.x_min) / self.cell).clamp(0.0, (self.cols - 1) as f64);
        let fy = ((p.y - self.y_min) / self.cell).clamp(0.0, (self.rows - 1) as f64);
        let c0 = fx.floor() as usize;
        let r0 = fy.floor() as usize;
        let c1 = (c0 + 1).min(self.cols - 1);
        let r1 = (r0 + 1).min(self.rows - 1);
        let tx = fx - c0 as f64;
        let ty = fy - r0 as f64;

        let top = lerp(self.at(c0, r0), self.at(c1, r0), tx);
        let bottom = lerp(self.at(c0, r1), self.at(c1, r1), tx);
        lerp(top, bottom, ty)
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    a.add(&b.sub(&a).scale(t))
}
