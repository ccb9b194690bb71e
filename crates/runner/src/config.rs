use thiserror::Error;

/// Configuration for the sequential runner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    goal: f64,
    max_points: usize,
    batch_size: usize,
}

/// Errors that can occur when validating a runner config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("goal must be finite and non-negative")]
    Goal,

    #[error("batch_size must be at least 1")]
    BatchSize,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1.0, 1000, 1).unwrap()
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// The run converges once the sampler's real loss is at or below `goal`,
    /// and never evaluates more than `max_points` points. Points are
    /// requested `batch_size` at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if `goal` is negative or non-finite, or if
    /// `batch_size` is zero.
    pub fn new(goal: f64, max_points: usize, batch_size: usize) -> Result<Self, ConfigError> {
        if !goal.is_finite() || goal < 0.0 {
            return Err(ConfigError::Goal);
        }
        if batch_size == 0 {
            return Err(ConfigError::BatchSize);
        }

        Ok(Self {
            goal,
            max_points,
            batch_size,
        })
    }

    /// Returns the loss at or below which the run converges.
    #[must_use]
    pub fn goal(&self) -> f64 {
        self.goal
    }

    /// Returns the evaluation budget.
    #[must_use]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Returns how many points are requested per round.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
