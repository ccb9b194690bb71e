/// Indicates why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The real loss reached the configured goal.
    Converged,

    /// Used up the evaluation budget without converging.
    MaxPoints,

    /// Stopped early due to an observer decision.
    StoppedByObserver,

    /// The sampler had no further points to propose.
    Exhausted,
}

/// The result of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Final runner status.
    pub status: Status,

    /// Real loss of the sampler when the run finished.
    pub loss: f64,

    /// Number of successful model evaluations.
    pub evaluations: usize,
}
