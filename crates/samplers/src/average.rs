//! Adaptive estimation of an average over independent replicas.
//!
//! The sampled function takes an integer index (typically a random seed) and
//! returns one realisation of a stochastic quantity. The sampler keeps a
//! running mean and sum of squared deviations (Welford's update), from which it
//! derives the Bessel-corrected standard deviation and the standard error.
//! Re-observing an index first takes the old value back out with the reverse
//! update, so values on a large common offset keep their full precision.
//!
//! # Loss
//!
//! With `n` observations the standard error is `std / √n`. The loss compares
//! it against both tolerances and reports the larger ratio:
//!
//! ```text
//! loss = max(se / atol, se / (|mean| · rtol))
//! ```
//!
//! A loss at or below 1 means the requested precision has been reached. Fewer
//! than two observations give an infinite loss.
//!
//! # Point selection
//!
//! There is no spatial structure: every unused index is as good as any other,
//! so [`choose_points`](tessel_core::Sampler::choose_points) hands out the
//! next unused indices from a monotonically increasing counter.

mod config;
mod error;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use tessel_core::{Proposal, Restore, Sampler};

pub use config::{Config, ConfigError};
pub use error::Error;

/// Mutable state of an [`AverageSampler`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct State {
    data: BTreeMap<u64, Option<f64>>,
    n: usize,
    n_requested: usize,
    next_index: u64,
    mean: f64,
    /// Sum of squared deviations from `mean`.
    m2: f64,
}

impl State {
    /// Folds a new real value into the running moments.
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, value: f64) {
        self.n += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Takes a previously pushed value back out of the running moments.
    #[allow(clippy::cast_precision_loss)]
    fn pop(&mut self, value: f64) {
        self.n -= 1;
        if self.n == 0 {
            self.mean = 0.0;
            self.m2 = 0.0;
            return;
        }
        let mean = self.mean - (value - self.mean) / self.n as f64;
        self.m2 -= (value - mean) * (value - self.mean);
        self.mean = mean;
    }
}

/// Captured state of an [`AverageSampler`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot(State);

/// Samples an integer-indexed stochastic function until its mean is known
/// to the configured tolerance.
#[derive(Debug, Clone)]
pub struct AverageSampler {
    config: Config,
    state: State,
}

impl AverageSampler {
    /// Creates a sampler with no observations.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State {
                data: BTreeMap::new(),
                n: 0,
                n_requested: 0,
                next_index: 0,
                mean: 0.0,
                m2: 0.0,
            },
        }
    }

    /// Returns the sampler configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns every known index with its value, `None` while pending.
    #[must_use]
    pub fn data(&self) -> &BTreeMap<u64, Option<f64>> {
        &self.state.data
    }

    /// Returns the number of real observations.
    #[must_use]
    pub fn n(&self) -> usize {
        self.state.n
    }

    /// Returns the number of indices that were requested or observed.
    #[must_use]
    pub fn n_requested(&self) -> usize {
        self.state.n_requested
    }

    /// Returns the mean of the observed values, NaN before any observation.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.state.n == 0 {
            return f64::NAN;
        }
        self.state.mean
    }

    /// Returns the sample standard deviation of the observed values.
    ///
    /// Uses Bessel's correction, so it is infinite with fewer than two
    /// observations.
    #[must_use]
    pub fn std(&self) -> f64 {
        if self.state.n < 2 {
            return f64::INFINITY;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.state.n as f64;
        // Reverse updates can leave a zero spread slightly negative.
        (self.state.m2 / (n - 1.0)).max(0.0).sqrt()
    }

    /// Returns the next `n` unused indices at or after the counter.
    fn next_indices(&self, n: usize) -> Vec<u64> {
        (self.state.next_index..)
            .filter(|index| !self.state.data.contains_key(index))
            .take(n)
            .collect()
    }
}

impl Sampler for AverageSampler {
    type Point = u64;
    type Value = f64;
    type Error = Error;

    fn add_point(&mut self, index: u64, value: Option<f64>) -> Result<(), Error> {
        let state = &mut self.state;

        let Some(value) = value else {
            if !state.data.contains_key(&index) {
                state.data.insert(index, None);
                state.n_requested += 1;
            }
            return Ok(());
        };

        if !value.is_finite() {
            return Err(Error::NonFiniteValue { index, value });
        }

        match state.data.insert(index, Some(value)) {
            None => state.n_requested += 1,
            Some(None) => {}
            Some(Some(previous)) => state.pop(previous),
        }
        state.push(value);

        Ok(())
    }

    fn loss(&self, real: bool) -> f64 {
        if self.state.n < 2 {
            return f64::INFINITY;
        }

        let count = if real {
            self.state.n
        } else {
            self.state.n_requested
        };
        #[allow(clippy::cast_precision_loss)]
        let standard_error = self.std() / (count as f64).sqrt();

        let absolute = standard_error / self.config.atol();
        let relative = standard_error / self.mean().abs() / self.config.rtol();
        // `f64::max` ignores a NaN from a zero mean with zero spread.
        absolute.max(relative)
    }

    fn choose_points(&mut self, n: usize, add_data: bool) -> Result<Proposal<u64>, Error> {
        let indices = self.next_indices(n);
        let loss_improvement = self.loss(false);

        if add_data {
            if let Some(&last) = indices.last() {
                self.state.next_index = last + 1;
            }
            self.add_data(indices.iter().copied(), std::iter::repeat(None))?;
        }

        Ok(indices
            .into_iter()
            .map(|index| (index, loss_improvement))
            .collect())
    }

    fn remove_unfinished(&mut self) {
        let state = &mut self.state;
        let before = state.data.len();
        state.data.retain(|_, value| value.is_some());
        state.n_requested -= before - state.data.len();
    }
}

impl Restore for AverageSampler {
    type Snapshot = Snapshot;

    fn capture(&self) -> Snapshot {
        Snapshot(self.state.clone())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.0;
    }
}
