//! Adaptive sampling of a function of one real variable.
//!
//! # Algorithm
//!
//! Observations are kept in a sorted map, and every pair of adjacent points
//! forms an interval. Each interval carries a loss: the length of its
//! segment after rescaling `x` and `y` by the extent of the data, so steep or
//! wide segments score high and flat, narrow ones score low.
//!
//! Two layers are maintained side by side:
//!
//! - the **real** layer holds only evaluated points;
//! - the **combined** layer also holds pending points, whose values are
//!   estimated by piecewise-linear interpolation of the real data.
//!
//! Inserting a point only touches the (at most two) intervals adjacent to
//! it. When the `y` extent of the data more than doubles, every loss is
//! recomputed against the new scale, since relative losses computed on the
//! old scale understate the error.
//!
//! # Point selection
//!
//! Missing bounds are always proposed first, with infinite expected
//! improvement. Remaining points are spread over the combined intervals so
//! that the largest loss per sub-interval is as small as possible, and are
//! placed evenly inside each interval that receives any.

mod allocate;
mod config;
mod error;
mod interpolate;
mod neighbors;


use std::collections::BTreeMap;

use tessel_core::{Proposal, Restore, Restored, Sampler};
use tracing::debug;

use crate::coord::Coord;

use allocate::allocate;
use interpolate::interpolate;
use neighbors::Neighbors;

pub use config::{Config, ConfigError};
pub use error::{Error, InterpError};

/// Adjacent points, left first.
type Interval = (Coord, Coord);

/// Mutable state of an [`IntervalSampler`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct State {
    data: BTreeMap<Coord, f64>,
    data_interp: BTreeMap<Coord, f64>,
    neighbors: Neighbors,
    neighbors_combined: Neighbors,
    losses: BTreeMap<Interval, f64>,
    losses_combined: BTreeMap<Interval, f64>,
    /// `[[x_min, x_max], [y_min, y_max]]` of everything seen so far.
    bbox: [[f64; 2]; 2],
    scale: [f64; 2],
    /// Scale at the last full loss recomputation.
    old_scale: [f64; 2],
}

/// Captured state of an [`IntervalSampler`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot(State);

/// Samples a function `f: ℝ → ℝ` on a bounded interval.
#[derive(Debug, Clone)]
pub struct IntervalSampler {
    config: Config,
    state: State,
}

impl IntervalSampler {
    /// Creates a sampler with no observations.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let bounds = config.bounds();
        let scale = [config.width(), 0.0];
        Self {
            config,
            state: State {
                data: BTreeMap::new(),
                data_interp: BTreeMap::new(),
                neighbors: Neighbors::default(),
                neighbors_combined: Neighbors::default(),
                losses: BTreeMap::new(),
                losses_combined: BTreeMap::new(),
                bbox: [bounds, [f64::INFINITY, f64::NEG_INFINITY]],
                scale,
                old_scale: scale,
            },
        }
    }

    /// Returns the sampler configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Iterates over the real observations in increasing `x`.
    pub fn data(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.state.data.iter().map(|(x, &y)| (x.get(), y))
    }

    /// Iterates over pending points with their interpolated values.
    pub fn pending(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.state.data_interp.iter().map(|(x, &y)| (x.get(), y))
    }

    /// Returns real and pending points in increasing `x`.
    #[must_use]
    pub fn data_combined(&self) -> Vec<(f64, f64)> {
        let merged: BTreeMap<Coord, f64> = self
            .state
            .data_interp
            .iter()
            .chain(&self.state.data)
            .map(|(&x, &y)| (x, y))
            .collect();
        merged.into_iter().map(|(x, y)| (x.get(), y)).collect()
    }

    /// Iterates over `([left, right], loss)` for every interval of a layer.
    pub fn losses(&self, real: bool) -> impl Iterator<Item = ([f64; 2], f64)> + '_ {
        let losses = if real {
            &self.state.losses
        } else {
            &self.state.losses_combined
        };
        losses
            .iter()
            .map(|(&(left, right), &loss)| ([left.get(), right.get()], loss))
    }

    fn contains(&self, x: Coord) -> bool {
        self.state.data.contains_key(&x) || self.state.data_interp.contains_key(&x)
    }

    /// Proposes `n` points and records them as pending.
    fn propose(&mut self, n: usize) -> Result<Proposal<f64>, Error> {
        let mut proposal = Proposal::empty();

        for bound in self.config.bounds() {
            if proposal.len() == n {
                break;
            }
            let key = Coord::new(bound).ok_or(Error::NonFinitePoint { x: bound })?;
            if !self.contains(key) {
                self.add_point(bound, None)?;
                proposal.push(bound, f64::INFINITY);
            }
        }

        let interior = allocate(&self.state.losses_combined, n - proposal.len());
        for &(x, improvement) in &interior {
            proposal.push(x, improvement);
        }
        self.add_data(interior.into_iter().map(|(x, _)| x), std::iter::repeat(None))?;

        Ok(proposal)
    }
}

impl State {
    fn value(&self, x: Coord, combined: bool) -> Option<f64> {
        self.data
            .get(&x)
            .or_else(|| combined.then(|| self.data_interp.get(&x)).flatten())
            .copied()
    }

    /// Rescaled Euclidean length of the segment over `interval`.
    #[allow(clippy::float_cmp)]
    fn interval_loss(&self, (left, right): Interval, combined: bool) -> f64 {
        let dx = (right.get() - left.get()) / self.scale[0];
        if self.scale[1] == 0.0 {
            return dx.abs();
        }
        let dy = match (self.value(left, combined), self.value(right, combined)) {
            (Some(y_left), Some(y_right)) => (y_right - y_left) / self.scale[1],
            _ => 0.0,
        };
        dx.hypot(dy)
    }

    /// Recomputes the losses next to `x` and drops the interval it split.
    fn update_losses(&mut self, x: Coord, combined: bool) {
        let neighbors = if combined {
            &self.neighbors_combined
        } else {
            &self.neighbors
        };
        let Some([left, right]) = neighbors.get(x) else {
            return;
        };

        let updates: Vec<(Interval, f64)> = [left.map(|l| (l, x)), right.map(|r| (x, r))]
            .into_iter()
            .flatten()
            .map(|interval| (interval, self.interval_loss(interval, combined)))
            .collect();

        let losses = if combined {
            &mut self.losses_combined
        } else {
            &mut self.losses
        };
        if let (Some(left), Some(right)) = (left, right) {
            losses.remove(&(left, right));
        }
        losses.extend(updates);
    }

    fn update_scale(&mut self, x: f64, y: Option<f64>) {
        let [bx, by] = &mut self.bbox;
        bx[0] = bx[0].min(x);
        bx[1] = bx[1].max(x);
        if let Some(y) = y {
            by[0] = by[0].min(y);
            by[1] = by[1].max(y);
        }

        let y_scale = if by[0] <= by[1] { by[1] - by[0] } else { 0.0 };
        self.scale = [bx[1] - bx[0], y_scale];
    }

    fn scale_doubled(&self) -> bool {
        self.scale
            .iter()
            .zip(&self.old_scale)
            .any(|(new, old)| *new > 2.0 * old)
    }

    fn recompute_losses(&mut self) {
        self.losses = self
            .losses
            .keys()
            .map(|&interval| (interval, self.interval_loss(interval, false)))
            .collect();
        self.losses_combined = self
            .losses_combined
            .keys()
            .map(|&interval| (interval, self.interval_loss(interval, true)))
            .collect();
        self.old_scale = self.scale;
    }

    /// Re-estimates every pending value and refreshes the losses it affects.
    fn interpolate_pending(&mut self) -> Result<(), InterpError> {
        let fresh = interpolate(&self.data, self.data_interp.keys().copied())?;
        let changed: Vec<Coord> = fresh
            .iter()
            .filter(|&(x, y)| self.data_interp.get(x) != Some(y))
            .map(|(&x, _)| x)
            .collect();

        self.data_interp = fresh;
        for x in changed {
            self.update_losses(x, true);
        }
        Ok(())
    }
}

impl Sampler for IntervalSampler {
    type Point = f64;
    type Value = f64;
    type Error = Error;

    fn add_point(&mut self, x: f64, y: Option<f64>) -> Result<(), Error> {
        let key = Coord::new(x).ok_or(Error::NonFinitePoint { x })?;
        if let Some(y) = y.filter(|y| !y.is_finite()) {
            return Err(Error::NonFiniteValue { x, y });
        }

        let state = &mut self.state;
        match y {
            Some(y) => {
                state.data.insert(key, y);
                state.data_interp.remove(&key);
                state.neighbors.insert(key);
            }
            None if state.data.contains_key(&key) => return Ok(()),
            None => {
                state.data_interp.insert(key, 0.0);
            }
        }
        state.neighbors_combined.insert(key);

        state.update_scale(x, y);
        state.interpolate_pending()?;

        state.update_losses(key, true);
        if y.is_some() {
            state.update_losses(key, false);
            if state.scale_doubled() {
                debug!(
                    scale = ?state.scale,
                    old_scale = ?state.old_scale,
                    intervals = state.losses_combined.len(),
                    "data scale more than doubled, recomputing all losses"
                );
                state.recompute_losses();
            }
        }

        Ok(())
    }

    fn loss(&self, real: bool) -> f64 {
        let losses = if real {
            &self.state.losses
        } else {
            &self.state.losses_combined
        };
        losses
            .values()
            .copied()
            .reduce(f64::max)
            .unwrap_or(f64::INFINITY)
    }

    fn choose_points(&mut self, n: usize, add_data: bool) -> Result<Proposal<f64>, Error> {
        if add_data {
            self.propose(n)
        } else {
            let mut guard = Restored::single(self);
            guard[0].propose(n)
        }
    }

    fn remove_unfinished(&mut self) {
        let state = &mut self.state;
        state.data_interp.clear();
        state.losses_combined = state.losses.clone();
        state.neighbors_combined = state.neighbors.clone();
    }
}

impl Restore for IntervalSampler {
    type Snapshot = Snapshot;

    fn capture(&self) -> Snapshot {
        Snapshot(self.state.clone())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.0;
    }
}
