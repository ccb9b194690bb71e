//! Adaptive sampling of a function of two real variables.
//!
//! # Algorithm
//!
//! Samples live on a rectangle. All points, real and pending, are
//! triangulated in normalised coordinates where the rectangle maps onto
//! `[-0.5, 0.5]²`, and a piecewise-linear interpolant is built over the
//! triangulation. Each triangle is scored by a pluggable [`TriangleLoss`]; the
//! default [`DeviationLoss`] measures how badly the values deviate from linear
//! estimates made at each corner, weighted by the square root of the area.
//!
//! The triangulation is rebuilt from scratch when first needed after the
//! point set changes. Two interpolants are cached: one over real data only
//! and one that also includes pending points, whose values are estimated
//! through the real interpolant.
//!
//! # Point selection
//!
//! New points are drawn from a candidate stack, most recent first. The four
//! corners of the rectangle are queued up front with infinite priority. When
//! the stack runs dry it is refilled from the worst triangles, one candidate
//! per triangle, via [`choose_point_in_triangle`].
//!
//! The loss stays infinite until every corner has been observed, since the
//! interpolant cannot cover the rectangle before that.

mod config;
mod delaunay;
mod error;
mod geometry;
mod interpolant;
mod loss;


use std::{
    cell::OnceCell,
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use indexmap::IndexMap;
use tessel_core::{Proposal, Restore, Sampler};
use tracing::{debug, trace, warn};

use crate::coord::{Coord2, coord2, unwrap2};

pub use config::{Config, ConfigError};
pub use error::Error;
pub use geometry::choose_point_in_triangle;
pub use interpolant::Interpolant;
pub use loss::{DeviationLoss, TriangleLoss, areas, deviations};

/// Points needed before anything can be triangulated.
const MIN_POINTS: usize = 3;

/// Candidates this close to a known point, in normalised coordinates, are
/// dropped.
const DUPLICATE_TOLERANCE: f64 = 1e-10;

/// Mutable state of a [`TriangleSampler`].
#[derive(Debug, Clone, PartialEq)]
struct State<const M: usize> {
    data: BTreeMap<Coord2, [f64; M]>,
    pending: BTreeSet<Coord2>,
    /// Candidates with their expected loss improvement, popped from the back.
    stack: IndexMap<Coord2, f64>,
}

/// Captured state of a [`TriangleSampler`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<const M: usize>(State<M>);

/// Samples a function `f: ℝ² → ℝᴹ` on a rectangle.
#[derive(Clone)]
pub struct TriangleSampler<const M: usize = 1, L = DeviationLoss> {
    config: Config,
    loss: L,
    state: State<M>,
    ip: OnceCell<Option<Interpolant<M>>>,
    ip_combined: OnceCell<Option<Interpolant<M>>>,
}

impl<const M: usize> TriangleSampler<M> {
    /// Creates a sampler using the default [`DeviationLoss`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_loss(config, DeviationLoss)
    }
}

impl<const M: usize, L: TriangleLoss<M>> TriangleSampler<M, L> {
    /// Creates a sampler scoring triangles with `loss`.
    pub fn with_loss(config: Config, loss: L) -> Self {
        let stack = config
            .corners()
            .into_iter()
            .filter_map(coord2)
            .map(|corner| (corner, f64::INFINITY))
            .collect();

        Self {
            config,
            loss,
            state: State {
                data: BTreeMap::new(),
                pending: BTreeSet::new(),
                stack,
            },
            ip: OnceCell::new(),
            ip_combined: OnceCell::new(),
        }
    }

    /// Returns the sampler configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Iterates over the real observations.
    pub fn data(&self) -> impl Iterator<Item = ([f64; 2], [f64; M])> + '_ {
        self.state.data.iter().map(|(&p, &v)| (unwrap2(p), v))
    }

    /// Iterates over points that were requested but not yet observed.
    pub fn pending(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.state.pending.iter().map(|&p| unwrap2(p))
    }

    /// Iterates over queued candidates in the order they will be handed out.
    pub fn stack(&self) -> impl Iterator<Item = ([f64; 2], f64)> + '_ {
        self.state
            .stack
            .iter()
            .rev()
            .map(|(&p, &loss)| (unwrap2(p), loss))
    }

    /// Returns real observations plus pending points with estimated values.
    ///
    /// Pending values come from the real interpolant once every corner has
    /// been observed, and are zero before that.
    #[must_use]
    pub fn data_combined(&self) -> Vec<([f64; 2], [f64; M])> {
        let ip = if self.bounds_done(true) { self.ip() } else { None };
        let pending = self.pending().map(|point| {
            let value = ip
                .and_then(|ip| ip.evaluate(self.config.scale(point)))
                .unwrap_or([0.0; M]);
            (point, value)
        });
        self.data().chain(pending).collect()
    }

    /// Returns the interpolant over real data, if there are enough points.
    pub fn ip(&self) -> Option<&Interpolant<M>> {
        self.ip
            .get_or_init(|| self.interpolant(self.data()))
            .as_ref()
    }

    /// Returns the interpolant over real and pending data.
    pub fn ip_combined(&self) -> Option<&Interpolant<M>> {
        self.ip_combined
            .get_or_init(|| self.interpolant(self.data_combined().into_iter()))
            .as_ref()
    }

    /// Evaluates the real interpolant at `point`.
    ///
    /// Returns `None` outside the convex hull of the observations.
    #[must_use]
    pub fn interpolate(&self, point: [f64; 2]) -> Option<[f64; M]> {
        self.ip()?.evaluate(self.config.scale(point))
    }

    fn interpolant(
        &self,
        entries: impl Iterator<Item = ([f64; 2], [f64; M])>,
    ) -> Option<Interpolant<M>> {
        let (points, values): (Vec<_>, Vec<_>) = entries
            .map(|(point, value)| (self.config.scale(point), value))
            .unzip();
        (points.len() >= MIN_POINTS).then(|| Interpolant::new(points, values))
    }

    /// Whether every corner is observed, or with `real == false` at least
    /// pending.
    fn bounds_done(&self, real: bool) -> bool {
        self.config
            .corners()
            .into_iter()
            .filter_map(coord2)
            .all(|c| self.state.data.contains_key(&c) || (!real && self.state.pending.contains(&c)))
    }

    fn is_known(&self, ip: &Interpolant<M>, point: [f64; 2]) -> bool {
        let close = |q: [f64; 2]| {
            (q[0] - point[0]).abs().max((q[1] - point[1]).abs()) < DUPLICATE_TOLERANCE
        };
        ip.points().iter().copied().any(close)
            || self
                .state
                .stack
                .keys()
                .any(|&key| close(self.config.scale(unwrap2(key))))
    }

    /// Proposes up to `count` new candidates, worst triangle first.
    fn candidates(&self, count: usize) -> Vec<(Coord2, f64)> {
        let Some(ip) = self.ip_combined() else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = self
            .loss
            .losses(ip)
            .into_iter()
            .enumerate()
            .filter(|(_, loss)| !loss.is_nan())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut found: Vec<([f64; 2], Coord2, f64)> = Vec::new();
        for (triangle, loss) in ranked {
            if found.len() == count {
                break;
            }
            let point = choose_point_in_triangle(ip.vertices(triangle), self.config.max_badness());
            let repeated = found.iter().any(|(q, _, _)| {
                (q[0] - point[0]).abs().max((q[1] - point[1]).abs()) < DUPLICATE_TOLERANCE
            });
            if repeated || self.is_known(ip, point) {
                trace!(?point, triangle, "skipping candidate at a known point");
                continue;
            }
            if let Some(key) = coord2(self.config.unscale(point)) {
                found.push((point, key, loss));
            }
        }

        found.into_iter().map(|(_, key, loss)| (key, loss)).collect()
    }

    /// Queues candidates until the stack holds `stack_till` entries or the
    /// triangles run out, returning the new ones worst first.
    fn fill_stack(&mut self, stack_till: usize) -> Result<Vec<(Coord2, f64)>, Error> {
        let have = self.state.data.len() + self.state.pending.len();
        if have < MIN_POINTS {
            return Err(Error::TooFewPoints {
                have,
                need: MIN_POINTS,
            });
        }

        let count = stack_till.saturating_sub(self.state.stack.len()).max(1);
        let fresh = self.candidates(count);
        self.state.stack.extend(fresh.iter().copied());

        debug!(
            triangles = self.ip_combined().map_or(0, |ip| ip.triangles().len()),
            added = fresh.len(),
            stack = self.state.stack.len(),
            "refilled candidate stack"
        );
        Ok(fresh)
    }

    fn mark_pending(&mut self, key: Coord2) {
        self.state.stack.shift_remove(&key);
        self.state.pending.insert(key);
        self.ip_combined.take();
    }

    /// Pops stacked candidates, then refills, until `chosen` holds `n`.
    fn gather(&mut self, n: usize, chosen: &mut Vec<(Coord2, f64)>) -> Result<(), Error> {
        while chosen.len() < n {
            let Some((key, loss)) = self.state.stack.pop() else {
                break;
            };
            self.mark_pending(key);
            chosen.push((key, loss));
        }

        while chosen.len() < n {
            let n_left = n - chosen.len();
            let fresh = self.fill_stack(n_left.max(self.config.stack_size()))?;
            if fresh.is_empty() {
                warn!(
                    requested = n,
                    chosen = chosen.len(),
                    "no new candidates left, returning fewer points"
                );
                break;
            }
            for (key, loss) in fresh.into_iter().take(n_left) {
                self.mark_pending(key);
                chosen.push((key, loss));
            }
        }
        Ok(())
    }

    /// Moves chosen points from pending back onto the stack, first on top.
    fn requeue(&mut self, chosen: &[(Coord2, f64)]) {
        for &(key, loss) in chosen.iter().rev() {
            self.state.pending.remove(&key);
            self.state.stack.insert(key, loss);
        }
        self.ip_combined.take();
    }
}

impl<const M: usize, L: TriangleLoss<M>> Sampler for TriangleSampler<M, L> {
    type Point = [f64; 2];
    type Value = [f64; M];
    type Error = Error;

    fn add_point(&mut self, point: [f64; 2], value: Option<[f64; M]>) -> Result<(), Error> {
        let key = coord2(point).ok_or(Error::NonFinitePoint { point })?;

        match value {
            Some(value) if value.iter().any(|v| !v.is_finite()) => {
                return Err(Error::NonFiniteValue { point });
            }
            Some(value) => {
                self.state.data.insert(key, value);
                self.state.pending.remove(&key);
                self.ip.take();
            }
            None if self.state.data.contains_key(&key) => {}
            None => {
                self.state.pending.insert(key);
            }
        }
        self.ip_combined.take();
        self.state.stack.shift_remove(&key);

        Ok(())
    }

    fn loss(&self, real: bool) -> f64 {
        if !self.bounds_done(real) {
            return f64::INFINITY;
        }
        let ip = if real { self.ip() } else { self.ip_combined() };
        ip.and_then(|ip| self.loss.losses(ip).into_iter().reduce(f64::max))
            .unwrap_or(f64::INFINITY)
    }

    fn choose_points(&mut self, n: usize, add_data: bool) -> Result<Proposal<[f64; 2]>, Error> {
        let mut chosen = Vec::with_capacity(n);
        let collected = self.gather(n, &mut chosen);
        if !add_data || collected.is_err() {
            self.requeue(&chosen);
        }
        collected?;

        Ok(chosen
            .into_iter()
            .map(|(key, loss)| (unwrap2(key), loss))
            .collect())
    }

    fn remove_unfinished(&mut self) {
        for corner in self.config.corners().into_iter().filter_map(coord2) {
            if self.state.pending.contains(&corner) {
                self.state.stack.shift_remove(&corner);
                self.state.stack.insert(corner, f64::INFINITY);
            }
        }
        self.state.pending.clear();
        self.ip_combined.take();
    }
}

impl<const M: usize, L> Restore for TriangleSampler<M, L> {
    type Snapshot = Snapshot<M>;

    fn capture(&self) -> Snapshot<M> {
        Snapshot(self.state.clone())
    }

    fn restore(&mut self, snapshot: Snapshot<M>) {
        self.state = snapshot.0;
        self.ip.take();
        self.ip_combined.take();
    }
}

impl<const M: usize, L> fmt::Debug for TriangleSampler<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriangleSampler")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
