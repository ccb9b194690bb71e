use thiserror::Error;

/// Errors from a balancing sampler, generic over its children's error type.
#[derive(Debug, Error)]
pub enum Error<E: std::error::Error + 'static> {
    #[error("a balancing sampler needs at least one child")]
    Empty,

    #[error("child index {index} out of range for {len} samplers")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("child sampler {index} failed")]
    Sampler {
        index: usize,
        #[source]
        source: E,
    },
}
