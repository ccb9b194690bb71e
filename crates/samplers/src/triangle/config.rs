use thiserror::Error;

/// Default number of candidates queued per stack refill.
const DEFAULT_STACK_SIZE: usize = 10;

/// Default badness above which a triangle is split on its longest edge.
const DEFAULT_MAX_BADNESS: f64 = 5.0;

/// Configuration for the triangle sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    bounds: [[f64; 2]; 2],
    stack_size: usize,
    max_badness: f64,
}

/// Errors that can occur when validating a triangle sampler config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bounds must be finite")]
    NonFiniteBound,

    #[error("bounds of axis {axis} must not coincide")]
    ZeroWidth { axis: usize },

    #[error("stack_size must be at least 1")]
    StackSize,

    #[error("max_badness must be finite and at least 1")]
    MaxBadness,
}

impl Config {
    /// Creates a config for sampling on the rectangle `bounds[0] × bounds[1]`.
    ///
    /// Reversed bounds on either axis are swapped. The stack size and badness
    /// threshold start at their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is non-finite or an axis has zero width.
    pub fn new(bounds: [[f64; 2]; 2]) -> Result<Self, ConfigError> {
        let mut sorted = bounds;
        for (axis, [a, b]) in sorted.iter_mut().enumerate() {
            if !a.is_finite() || !b.is_finite() {
                return Err(ConfigError::NonFiniteBound);
            }
            #[allow(clippy::float_cmp)]
            if a == b {
                return Err(ConfigError::ZeroWidth { axis });
            }
            if a > b {
                std::mem::swap(a, b);
            }
        }

        Ok(Self {
            bounds: sorted,
            stack_size: DEFAULT_STACK_SIZE,
            max_badness: DEFAULT_MAX_BADNESS,
        })
    }

    /// Sets how many candidates a stack refill aims to queue.
    ///
    /// A size of 1 re-triangulates on every proposed point.
    ///
    /// # Errors
    ///
    /// Returns an error if `stack_size` is zero.
    pub fn with_stack_size(self, stack_size: usize) -> Result<Self, ConfigError> {
        if stack_size == 0 {
            return Err(ConfigError::StackSize);
        }
        Ok(Self { stack_size, ..self })
    }

    /// Sets the badness above which the longest edge is split instead of
    /// placing a point at the centroid.
    ///
    /// An equilateral triangle has badness 1.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_badness` is non-finite or below 1.
    pub fn with_max_badness(self, max_badness: f64) -> Result<Self, ConfigError> {
        if !max_badness.is_finite() || max_badness < 1.0 {
            return Err(ConfigError::MaxBadness);
        }
        Ok(Self {
            max_badness,
            ..self
        })
    }

    /// Returns `[[x_min, x_max], [y_min, y_max]]`.
    #[must_use]
    pub fn bounds(&self) -> [[f64; 2]; 2] {
        self.bounds
    }

    #[must_use]
    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    #[must_use]
    pub fn max_badness(&self) -> f64 {
        self.max_badness
    }

    /// Returns the four corners of the sampled rectangle.
    #[must_use]
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let [[x0, x1], [y0, y1]] = self.bounds;
        [[x0, y0], [x0, y1], [x1, y0], [x1, y1]]
    }

    /// Maps a point into the unit square centred on the origin.
    pub(super) fn scale(&self, point: [f64; 2]) -> [f64; 2] {
        [0, 1].map(|axis| {
            let [lo, hi] = self.bounds[axis];
            (point[axis] - 0.5 * (lo + hi)) / (hi - lo)
        })
    }

    /// Inverse of [`Config::scale`].
    pub(super) fn unscale(&self, point: [f64; 2]) -> [f64; 2] {
        [0, 1].map(|axis| {
            let [lo, hi] = self.bounds[axis];
            point[axis] * (hi - lo) + 0.5 * (lo + hi)
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_and_setters() {
        let config = Config::new([[0.0, 1.0], [-1.0, 1.0]]).unwrap();
        assert_eq!(config.stack_size(), 10);
        assert_eq!(config.max_badness(), 5.0);

        let config = config
            .with_stack_size(1)
            .and_then(|c| c.with_max_badness(2.5))
            .unwrap();
        assert_eq!(config.stack_size(), 1);
        assert_eq!(config.max_badness(), 2.5);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            Config::new([[0.0, 1.0], [2.0, 2.0]]),
            Err(ConfigError::ZeroWidth { axis: 1 })
        );
        assert_eq!(
            Config::new([[f64::NAN, 1.0], [0.0, 1.0]]),
            Err(ConfigError::NonFiniteBound)
        );

        let config = Config::new([[0.0, 1.0], [0.0, 1.0]]).unwrap();
        assert_eq!(config.with_stack_size(0), Err(ConfigError::StackSize));
        assert_eq!(config.with_max_badness(0.5), Err(ConfigError::MaxBadness));
    }

    #[test]
    fn corners_of_reversed_bounds() {
        let config = Config::new([[1.0, -1.0], [3.0, 2.0]]).unwrap();
        assert_eq!(config.bounds(), [[-1.0, 1.0], [2.0, 3.0]]);
        assert_eq!(
            config.corners(),
            [[-1.0, 2.0], [-1.0, 3.0], [1.0, 2.0], [1.0, 3.0]]
        );
    }

    #[test]
    fn scale_maps_bounds_to_unit_square() {
        let config = Config::new([[2.0, 6.0], [-1.0, 0.0]]).unwrap();

        assert_eq!(config.scale([2.0, -1.0]), [-0.5, -0.5]);
        assert_eq!(config.scale([6.0, 0.0]), [0.5, 0.5]);

        let back = config.unscale(config.scale([3.3, -0.7]));
        assert_relative_eq!(back[0], 3.3, epsilon = 1e-12);
        assert_relative_eq!(back[1], -0.7, epsilon = 1e-12);
    }
}
