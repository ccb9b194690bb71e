/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model error: {0}")]
    Model(Box<dyn std::error::Error + Send + Sync>),

    #[error("sampler error: {0}")]
    Sampler(Box<dyn std::error::Error + Send + Sync>),
}
