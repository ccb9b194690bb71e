//! Sharing one evaluation budget across many samplers.
//!
//! A [`BalancingSampler`] owns a pool of samplers of a single type and hands
//! out points one at a time: for every point it asks each child for its best
//! single proposal without committing, then commits the proposal with the
//! largest expected loss improvement to the child that made it. Points are
//! tagged with the index of their child.
//!
//! The children are a `Vec` of one concrete type, so a pool can never mix
//! sampler kinds. Comparing improvements across children still assumes their
//! losses are on a comparable scale, which depends on how each child was
//! configured.

mod error;


use tessel_core::{Proposal, Restore, Restored, Sampler};
use tracing::{trace, warn};

pub use error::Error;

/// Greedily distributes points over a pool of same-typed samplers.
#[derive(Debug, Clone)]
pub struct BalancingSampler<S> {
    samplers: Vec<S>,
}

impl<S: Sampler + Restore> BalancingSampler<S> {
    /// Creates a balancing sampler over `samplers`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if `samplers` is empty.
    pub fn new(samplers: Vec<S>) -> Result<Self, Error<S::Error>> {
        if samplers.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self { samplers })
    }

    /// Returns the child samplers in index order.
    #[must_use]
    pub fn samplers(&self) -> &[S] {
        &self.samplers
    }

    /// Returns the number of child samplers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    /// Always `false`, since construction rejects an empty pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }

    /// Returns the child samplers, consuming the pool.
    #[must_use]
    pub fn into_inner(self) -> Vec<S> {
        self.samplers
    }
}

impl<S: Sampler + Restore> Sampler for BalancingSampler<S> {
    type Point = (usize, S::Point);
    type Value = S::Value;
    type Error = Error<S::Error>;

    fn add_point(
        &mut self,
        (index, point): (usize, S::Point),
        value: Option<S::Value>,
    ) -> Result<(), Self::Error> {
        let len = self.samplers.len();
        let sampler = self
            .samplers
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        sampler
            .add_point(point, value)
            .map_err(|source| Error::Sampler { index, source })
    }

    fn loss(&self, real: bool) -> f64 {
        self.samplers
            .iter()
            .map(|sampler| sampler.loss(real))
            .reduce(f64::max)
            .unwrap_or(f64::INFINITY)
    }

    fn choose_points(
        &mut self,
        n: usize,
        add_data: bool,
    ) -> Result<Proposal<Self::Point>, Self::Error> {
        if add_data {
            choose_greedily(&mut self.samplers, n)
        } else {
            let mut guard = Restored::new(&mut self.samplers);
            choose_greedily(&mut guard, n)
        }
    }

    fn remove_unfinished(&mut self) {
        for sampler in &mut self.samplers {
            sampler.remove_unfinished();
        }
    }
}

/// Picks `n` points one at a time, committing each to its child as pending.
fn choose_greedily<S: Sampler>(
    samplers: &mut [S],
    n: usize,
) -> Result<Proposal<(usize, S::Point)>, Error<S::Error>> {
    let mut proposal = Proposal::empty();

    for _ in 0..n {
        let mut best: Option<(usize, S::Point, f64)> = None;
        for (index, sampler) in samplers.iter_mut().enumerate() {
            let candidate = sampler
                .choose_points(1, false)
                .map_err(|source| Error::Sampler { index, source })?;
            let Some((point, improvement)) = candidate
                .points
                .into_iter()
                .zip(candidate.loss_improvements)
                .next()
            else {
                continue;
            };
            let improvement = if improvement.is_nan() {
                f64::NEG_INFINITY
            } else {
                improvement
            };
            if best.as_ref().is_none_or(|&(_, _, top)| improvement > top) {
                best = Some((index, point, improvement));
            }
        }

        let Some((index, point, improvement)) = best else {
            warn!(
                requested = n,
                chosen = proposal.len(),
                "no child sampler proposed a point"
            );
            break;
        };
        trace!(index, improvement, "balancing pick");

        samplers[index]
            .add_point(point.clone(), None)
            .map_err(|source| Error::Sampler { index, source })?;
        proposal.push((index, point), improvement);
    }

    Ok(proposal)
}
