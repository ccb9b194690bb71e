use std::collections::BTreeMap;

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};

use crate::coord::Coord;

use super::InterpError;

/// Estimates values at `xs` by piecewise-linear interpolation of `data`.
///
/// Points outside the data range take the nearest end value. A single known
/// point is extended as a constant, and no data at all yields zeros.
pub(super) fn interpolate<I>(
    data: &BTreeMap<Coord, f64>,
    xs: I,
) -> Result<BTreeMap<Coord, f64>, InterpError>
where
    I: IntoIterator<Item = Coord>,
{
    let mut known = data.values().copied();
    match data.len() {
        0 => Ok(xs.into_iter().map(|x| (x, 0.0)).collect()),
        1 => {
            let value = known.next().unwrap_or_default();
            Ok(xs.into_iter().map(|x| (x, value)).collect())
        }
        _ => {
            let x: Array1<f64> = data.keys().map(|k| k.get()).collect();
            let f_x: Array1<f64> = known.collect();
            let interp = Interp1DOwned::new(x, f_x, Linear, Extrapolate::Clamp)?;

            xs.into_iter()
                .map(|x| Ok((x, interp.interpolate(&[x.get()])?)))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn c(value: f64) -> Coord {
        Coord::new(value).unwrap()
    }

    fn data(points: &[(f64, f64)]) -> BTreeMap<Coord, f64> {
        points.iter().map(|&(x, y)| (c(x), y)).collect()
    }

    #[test]
    fn no_data_interpolates_to_zero() {
        let result = interpolate(&BTreeMap::new(), [c(0.3), c(0.7)]).unwrap();
        assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![0.0, 0.0]);
    }

    #[test]
    fn single_point_is_constant() {
        let result = interpolate(&data(&[(0.0, 4.0)]), [c(-1.0), c(2.0)]).unwrap();
        assert_eq!(result[&c(-1.0)], 4.0);
        assert_eq!(result[&c(2.0)], 4.0);
    }

    #[test]
    fn linear_between_and_clamped_outside() {
        let known = data(&[(0.0, 0.0), (1.0, 2.0), (3.0, 0.0)]);
        let result = interpolate(&known, [c(0.25), c(2.0), c(-1.0), c(5.0)]).unwrap();

        assert_relative_eq!(result[&c(0.25)], 0.5);
        assert_relative_eq!(result[&c(2.0)], 1.0);
        assert_relative_eq!(result[&c(-1.0)], 0.0);
        assert_relative_eq!(result[&c(5.0)], 0.0);
    }
}
