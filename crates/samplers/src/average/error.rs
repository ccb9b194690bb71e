use thiserror::Error;

/// Errors that can occur while feeding the average sampler.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("non-finite value {value} observed for index {index}")]
    NonFiniteValue { index: u64, value: f64 },
}
