use thiserror::Error;

/// Errors that can occur while feeding or querying the triangle sampler.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("point must be finite, got {point:?}")]
    NonFinitePoint { point: [f64; 2] },

    #[error("non-finite value observed at {point:?}")]
    NonFiniteValue { point: [f64; 2] },

    #[error("triangulation needs at least {need} points, have {have}")]
    TooFewPoints { have: usize, need: usize },
}
