/// Points proposed by a sampler together with their expected loss improvements.
///
/// `points` and `loss_improvements` are parallel: the improvement at index
/// `i` estimates how much evaluating `points[i]` reduces the loss. Composite
/// samplers compare these values across their children.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proposal<P> {
    pub points: Vec<P>,
    pub loss_improvements: Vec<f64>,
}

impl<P> Proposal<P> {
    /// Creates an empty proposal.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            loss_improvements: Vec::new(),
        }
    }

    /// Appends a point with its expected loss improvement.
    pub fn push(&mut self, point: P, loss_improvement: f64) {
        self.points.push(point);
        self.loss_improvements.push(loss_improvement);
    }

    /// Returns the number of proposed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points were proposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `(point, loss_improvement)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&P, f64)> {
        self.points
            .iter()
            .zip(self.loss_improvements.iter().copied())
    }
}

impl<P> Default for Proposal<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> FromIterator<(P, f64)> for Proposal<P> {
    fn from_iter<T: IntoIterator<Item = (P, f64)>>(iter: T) -> Self {
        let (points, loss_improvements) = iter.into_iter().unzip();
        Self {
            points,
            loss_improvements,
        }
    }
}

/// An adaptive sampler for an expensive function.
///
/// A sampler holds the observations made so far and decides where the
/// function should be evaluated next. Values passed to [`add_point`] are
/// either real observations (`Some(value)`) or `None`, which marks a point as
/// requested but not yet evaluated ("pending"). Pending points never count
/// toward the real loss.
///
/// [`add_point`]: Sampler::add_point
pub trait Sampler {
    type Point: Clone;
    type Value: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Adds a single observation, or marks a point as pending with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not valid for this sampler.
    fn add_point(&mut self, point: Self::Point, value: Option<Self::Value>)
    -> Result<(), Self::Error>;

    /// Adds paired sequences of points and values.
    ///
    /// Pairs are consumed in order until either sequence ends.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from [`Sampler::add_point`].
    fn add_data<P, V>(&mut self, points: P, values: V) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Self::Point>,
        V: IntoIterator<Item = Option<Self::Value>>,
        Self: Sized,
    {
        for (point, value) in points.into_iter().zip(values) {
            self.add_point(point, value)?;
        }
        Ok(())
    }

    /// Returns the current loss, `f64::INFINITY` if it cannot be estimated yet.
    ///
    /// With `real = false` the loss also accounts for pending points, using
    /// estimated values in place of the missing observations.
    fn loss(&self, real: bool) -> f64;

    /// Chooses the next `n` points to evaluate.
    ///
    /// With `add_data = true` the chosen points are recorded as pending.
    /// With `add_data = false` the sampler's observable state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the sampler cannot propose points yet.
    fn choose_points(
        &mut self,
        n: usize,
        add_data: bool,
    ) -> Result<Proposal<Self::Point>, Self::Error>;

    /// Removes every pending point, keeping only real observations.
    fn remove_unfinished(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_collects_parallel_sequences() {
        let proposal: Proposal<u32> = [(1, 0.5), (2, 0.25)].into_iter().collect();

        assert_eq!(proposal.points, vec![1, 2]);
        assert_eq!(proposal.loss_improvements, vec![0.5, 0.25]);
        assert_eq!(proposal.len(), 2);
    }

    #[test]
    fn proposal_push_keeps_sequences_aligned() {
        let mut proposal = Proposal::empty();
        assert!(proposal.is_empty());

        proposal.push("a", f64::INFINITY);
        proposal.push("b", 1.0);

        let pairs: Vec<_> = proposal.iter().collect();
        assert_eq!(pairs, vec![(&"a", f64::INFINITY), (&"b", 1.0)]);
    }
}
