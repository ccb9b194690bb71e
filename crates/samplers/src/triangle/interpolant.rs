use super::{delaunay, geometry::orient2d};

/// Barycentric weights may dip this far below zero for points on an edge.
const EDGE_TOLERANCE: f64 = 1e-12;

/// Piecewise-linear interpolant over a Delaunay triangulation.
///
/// Points are stored in the sampler's normalised coordinates, where the
/// sampled rectangle maps onto `[-0.5, 0.5]²`. Triangles are
/// counter-clockwise triples of indices into [`points`](Self::points) and
/// [`values`](Self::values).
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant<const M: usize> {
    points: Vec<[f64; 2]>,
    values: Vec<[f64; M]>,
    triangles: Vec<[usize; 3]>,
}

impl<const M: usize> Interpolant<M> {
    /// Triangulates `points` and attaches one value per point.
    pub(super) fn new(points: Vec<[f64; 2]>, values: Vec<[f64; M]>) -> Self {
        debug_assert_eq!(points.len(), values.len());
        let triangles = delaunay::triangulate(&points);
        Self {
            points,
            values,
            triangles,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    #[must_use]
    pub fn values(&self) -> &[[f64; M]] {
        &self.values
    }

    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Returns the corner coordinates of triangle `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn vertices(&self, index: usize) -> [[f64; 2]; 3] {
        self.triangles[index].map(|v| self.points[v])
    }

    /// Evaluates the interpolant at a normalised point.
    ///
    /// Returns `None` outside the convex hull of the points.
    #[must_use]
    pub fn evaluate(&self, p: [f64; 2]) -> Option<[f64; M]> {
        self.triangles.iter().find_map(|&t| {
            let [a, b, c] = t.map(|v| self.points[v]);
            let total = orient2d(a, b, c);
            let weights = [orient2d(p, b, c), orient2d(a, p, c), orient2d(a, b, p)]
                .map(|w| w / total);
            if weights.iter().any(|&w| w < -EDGE_TOLERANCE) {
                return None;
            }

            let mut value = [0.0; M];
            for (&vertex, weight) in t.iter().zip(weights) {
                for (out, v) in value.iter_mut().zip(self.values[vertex]) {
                    *out += weight * v;
                }
            }
            Some(value)
        })
    }

    /// Estimates the gradient of each output at every point of `values`.
    ///
    /// Each vertex takes the area-weighted mean of the plane gradients of the
    /// triangles around it. Vertices outside every triangle get zero.
    ///
    /// The estimate is local: it only looks at the triangles touching a
    /// vertex. It does not solve for the gradients that minimise curvature
    /// over the whole mesh, so losses built on it give different numbers than
    /// ones built on a global estimator, most visibly near the hull and on
    /// coarse meshes.
    pub(super) fn gradients(&self, values: &[[f64; M]]) -> Vec<[[f64; 2]; M]> {
        let mut sums = vec![[[0.0; 2]; M]; self.points.len()];
        let mut weights = vec![0.0; self.points.len()];

        for &[ia, ib, ic] in &self.triangles {
            let [a, b, c] = [ia, ib, ic].map(|v| self.points[v]);
            let det = orient2d(a, b, c);
            let area = 0.5 * det;

            for m in 0..M {
                let dvb = values[ib][m] - values[ia][m];
                let dvc = values[ic][m] - values[ia][m];
                let gx = ((c[1] - a[1]) * dvb - (b[1] - a[1]) * dvc) / det;
                let gy = ((b[0] - a[0]) * dvc - (c[0] - a[0]) * dvb) / det;
                for v in [ia, ib, ic] {
                    sums[v][m][0] += area * gx;
                    sums[v][m][1] += area * gy;
                }
            }
            for v in [ia, ib, ic] {
                weights[v] += area;
            }
        }

        sums.into_iter()
            .zip(weights)
            .map(|(sum, weight)| {
                if weight > 0.0 {
                    sum.map(|[gx, gy]| [gx / weight, gy / weight])
                } else {
                    [[0.0; 2]; M]
                }
            })
            .collect()
    }
}
