//! Bowyer-Watson Delaunay triangulation.
//!
//! The triangulation is rebuilt from scratch whenever the point set changes.
//! Points are expected in the sampler's normalised coordinates, so the
//! bounding super-triangle can use a fixed size relative to the data extent.

use std::collections::BTreeMap;

use super::geometry::{incircle, orient2d};

/// Triangles whose doubled area falls below this are dropped.
const MIN_DOUBLE_AREA: f64 = 1e-12;

/// Triangulates `points`, returning counter-clockwise vertex index triples.
///
/// Fewer than three points, or a fully collinear set, yield no triangles.
pub(super) fn triangulate(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut vertices = points.to_vec();
    vertices.extend(super_triangle(points));

    let mut triangles = vec![[n, n + 1, n + 2]];
    for index in 0..n {
        insert(index, &vertices, &mut triangles);
    }

    triangles.retain(|t| {
        t.iter().all(|&v| v < n)
            && orient2d(vertices[t[0]], vertices[t[1]], vertices[t[2]]) > MIN_DOUBLE_AREA
    });
    triangles
}

/// A counter-clockwise triangle comfortably enclosing every point.
fn super_triangle(points: &[[f64; 2]]) -> [[f64; 2]; 3] {
    let (min, max) = points.iter().fold(
        ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
        |(min, max), p| {
            (
                [min[0].min(p[0]), min[1].min(p[1])],
                [max[0].max(p[0]), max[1].max(p[1])],
            )
        },
    );
    let [cx, cy] = [0.5 * (min[0] + max[0]), 0.5 * (min[1] + max[1])];
    let r = 64.0 * (max[0] - min[0]).max(max[1] - min[1]) + 1.0;
    let sqrt_3 = 3.0_f64.sqrt();

    [
        [cx - sqrt_3 * r, cy - r],
        [cx + sqrt_3 * r, cy - r],
        [cx, cy + 2.0 * r],
    ]
}

/// Inserts `vertices[index]`, re-triangulating the cavity it opens.
fn insert(index: usize, vertices: &[[f64; 2]], triangles: &mut Vec<[usize; 3]>) {
    let p = vertices[index];

    let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = triangles
        .drain(..)
        .partition(|&[a, b, c]| incircle(vertices[a], vertices[b], vertices[c], p) > 0.0);
    *triangles = good;

    // Cavity boundary edges belong to exactly one removed triangle. Keyed by
    // the undirected edge, storing the directed edge so orientation survives.
    // Ordered keys keep the triangle order reproducible.
    let mut edges: BTreeMap<(usize, usize), Option<(usize, usize)>> = BTreeMap::new();
    for [a, b, c] in bad {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            edges
                .entry((from.min(to), from.max(to)))
                .and_modify(|edge| *edge = None)
                .or_insert(Some((from, to)));
        }
    }

    triangles.extend(
        edges
            .into_values()
            .flatten()
            .map(|(from, to)| [from, to, index]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_area(points: &[[f64; 2]], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| 0.5 * orient2d(points[t[0]], points[t[1]], points[t[2]]))
            .sum()
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

        let triangles = triangulate(&points);

        assert_eq!(triangles.len(), 2);
        approx::assert_relative_eq!(total_area(&points, &triangles), 1.0);
    }

    #[test]
    fn triangles_are_counter_clockwise() {
        let points = [
            [-0.5, -0.5],
            [0.5, -0.5],
            [-0.5, 0.5],
            [0.5, 0.5],
            [0.1, 0.2],
            [-0.2, 0.0],
        ];

        let triangles = triangulate(&points);

        for t in &triangles {
            assert!(orient2d(points[t[0]], points[t[1]], points[t[2]]) > 0.0);
        }
        // Euler: 2n - h - 2 triangles with h = 4 hull vertices.
        assert_eq!(triangles.len(), 2 * points.len() - 4 - 2);
        approx::assert_relative_eq!(total_area(&points, &triangles), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn result_is_delaunay() {
        let points: Vec<[f64; 2]> = (0..25)
            .map(|i| {
                let t = f64::from(i);
                [(t * 0.618_034).fract() - 0.5, (t * 0.414_214).fract() - 0.5]
            })
            .collect();

        let triangles = triangulate(&points);

        for &[a, b, c] in &triangles {
            for (i, &p) in points.iter().enumerate() {
                if i != a && i != b && i != c {
                    assert!(incircle(points[a], points[b], points[c], p) <= 1e-12);
                }
            }
        }
    }

    #[test]
    fn cocircular_grid_triangulates_identically_every_time() {
        let points: Vec<[f64; 2]> = (0..16)
            .map(|i| [f64::from(i % 4) / 3.0 - 0.5, f64::from(i / 4) / 3.0 - 0.5])
            .collect();

        let first = triangulate(&points);

        assert_eq!(first.len(), 18);
        for _ in 0..20 {
            assert_eq!(triangulate(&points), first);
        }
    }

    #[test]
    fn degenerate_inputs_give_no_triangles() {
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
        assert!(triangulate(&[[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]]).is_empty());
    }
}
