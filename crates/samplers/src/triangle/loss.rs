use super::{geometry, interpolant::Interpolant};

/// Scores every triangle of an interpolant.
///
/// The returned vector has one entry per triangle, in the order of
/// [`Interpolant::triangles`]. Larger losses are refined first.
///
/// Any `Fn(&Interpolant<M>) -> Vec<f64>` closure is a `TriangleLoss`, so a
/// custom loss can be built from [`areas`] and [`deviations`]:
///
/// ```
/// use tessel_samplers::triangle::{Config, Interpolant, TriangleSampler, areas};
///
/// let config = Config::new([[0.0, 1.0], [0.0, 1.0]]).unwrap();
/// let by_area = |ip: &Interpolant<1>| areas(ip);
/// let sampler: TriangleSampler<1, _> = TriangleSampler::with_loss(config, by_area);
/// assert!(sampler.ip().is_none());
/// ```
pub trait TriangleLoss<const M: usize> {
    fn losses(&self, ip: &Interpolant<M>) -> Vec<f64>;
}

impl<const M: usize, F> TriangleLoss<M> for F
where
    F: Fn(&Interpolant<M>) -> Vec<f64>,
{
    fn losses(&self, ip: &Interpolant<M>) -> Vec<f64> {
        self(ip)
    }
}

/// Deviation from a linear fit, weighted by the square root of the area.
///
/// For a triangle with deviations `d_m` per output, the loss is
/// `√area · Σ d_m`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviationLoss;

impl<const M: usize> TriangleLoss<M> for DeviationLoss {
    fn losses(&self, ip: &Interpolant<M>) -> Vec<f64> {
        areas(ip)
            .into_iter()
            .zip(deviations(ip))
            .map(|(area, devs)| area.sqrt() * devs.iter().sum::<f64>())
            .collect()
    }
}

/// Returns the area of every triangle, in normalised coordinates.
#[must_use]
pub fn areas<const M: usize>(ip: &Interpolant<M>) -> Vec<f64> {
    (0..ip.triangles().len())
        .map(|t| geometry::area(ip.vertices(t)))
        .collect()
}

/// Returns, per triangle and output, how far the values deviate from the
/// linear estimates made at each corner.
///
/// Values are first divided by their peak-to-peak range so that outputs of
/// any magnitude score alike. Each corner `j` extrapolates to the other
/// corners with its estimated gradient; the largest miss is taken per corner
/// and summed over the three corners.
#[must_use]
pub fn deviations<const M: usize>(ip: &Interpolant<M>) -> Vec<[f64; M]> {
    let (lo, hi) = ip
        .values()
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let ptp = hi - lo;
    let norm = if ptp > 0.0 { ptp } else { 1.0 };

    let values: Vec<[f64; M]> = ip.values().iter().map(|v| v.map(|v| v / norm)).collect();
    let gradients = ip.gradients(&values);

    ip.triangles()
        .iter()
        .map(|triangle| {
            let mut devs = [0.0; M];
            for (m, dev) in devs.iter_mut().enumerate() {
                for &j in triangle {
                    let [gx, gy] = gradients[j][m];
                    let (pj, vj) = (ip.points()[j], values[j][m]);
                    *dev += triangle
                        .iter()
                        .map(|&k| {
                            let p = ip.points()[k];
                            let estimate = vj + (p[0] - pj[0]) * gx + (p[1] - pj[1]) * gy;
                            (estimate - values[k][m]).abs()
                        })
                        .fold(0.0, f64::max);
                }
            }
            devs
        })
        .collect()
}
