/// Actions an observer can take during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the run and return the current state.
    ///
    /// Points that were requested but not yet evaluated are removed from
    /// the sampler.
    StopEarly,
}
