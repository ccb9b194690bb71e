use thiserror::Error;

/// Configuration for the interval sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    bounds: [f64; 2],
}

/// Errors that can occur when validating an interval sampler config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bounds must be finite")]
    NonFiniteBound,

    #[error("bounds must not coincide")]
    ZeroWidth,
}

impl Config {
    /// Creates a config for sampling on the closed interval between `bounds`.
    ///
    /// If the bounds are reversed, they are automatically swapped.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is non-finite or both are equal.
    pub fn new(bounds: [f64; 2]) -> Result<Self, ConfigError> {
        let [a, b] = bounds;
        if !a.is_finite() || !b.is_finite() {
            return Err(ConfigError::NonFiniteBound);
        }
        #[allow(clippy::float_cmp)]
        if a == b {
            return Err(ConfigError::ZeroWidth);
        }

        let bounds = if a < b { [a, b] } else { [b, a] };
        Ok(Self { bounds })
    }

    /// Returns the bounds in increasing order.
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        self.bounds
    }

    /// Returns the width of the sampled interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds[1] - self.bounds[0]
    }
}
