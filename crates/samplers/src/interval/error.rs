use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

/// Errors from building or evaluating the piecewise-linear interpolant.
#[derive(Error, Debug)]
pub enum InterpError {
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// Errors that can occur while feeding the interval sampler.
#[derive(Debug, Error)]
pub enum Error {
    #[error("point must be finite, got {x}")]
    NonFinitePoint { x: f64 },

    #[error("non-finite value {y} observed at x = {x}")]
    NonFiniteValue { x: f64, y: f64 },

    #[error("failed to interpolate pending points")]
    Interpolation(#[from] InterpError),
}
