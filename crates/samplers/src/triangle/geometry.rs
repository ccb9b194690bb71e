//! Planar predicates and measures on triangles.

/// Scales edge²/area so that an equilateral triangle has badness 1.
const BADNESS_NORM: f64 = 0.433_012_701_892_219_3; // √3 / 4

/// Twice the signed area of `abc`, positive when counter-clockwise.
pub(super) fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `abc`.
pub(super) fn incircle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> f64 {
    let [adx, ady] = [a[0] - p[0], a[1] - p[1]];
    let [bdx, bdy] = [b[0] - p[0], b[1] - p[1]];
    let [cdx, cdy] = [c[0] - p[0], c[1] - p[1]];

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Unsigned area of a triangle.
pub(super) fn area([a, b, c]: [[f64; 2]; 3]) -> f64 {
    0.5 * orient2d(a, b, c).abs()
}

/// Picks the point to sample next inside `triangle`.
///
/// Elongated triangles, whose longest edge squared over area exceeds
/// `max_badness` after normalisation, are split at the midpoint of that edge
/// so that refinement does not produce ever thinner slivers. Otherwise the
/// centroid is used.
#[must_use]
pub fn choose_point_in_triangle(triangle: [[f64; 2]; 3], max_badness: f64) -> [f64; 2] {
    let edge = |i: usize| {
        let (p, q) = (triangle[i], triangle[(i + 2) % 3]);
        (p, q, (p[0] - q[0]).hypot(p[1] - q[1]))
    };
    let (p, q, longest) = (1..3)
        .map(edge)
        .fold(edge(0), |best, e| if e.2 > best.2 { e } else { best });

    let badness = longest * longest / area(triangle) * BADNESS_NORM;
    if badness > max_badness {
        [0.5 * (p[0] + q[0]), 0.5 * (p[1] + q[1])]
    } else {
        let [a, b, c] = triangle;
        [(a[0] + b[0] + c[0]) / 3.0, (a[1] + b[1] + c[1]) / 3.0]
    }
}
