use tessel_core::Model;

/// Events emitted by the runner, one per attempted evaluation.
pub enum Event<'a, M: Model> {
    /// The model returned a value.
    Evaluated {
        /// The evaluated point.
        point: &'a M::Input,

        /// The model output at this point.
        value: &'a M::Output,

        /// Successful evaluations so far, including this one.
        evaluations: usize,
    },

    /// Model evaluation failed.
    ModelFailed {
        /// The point where evaluation failed.
        point: &'a M::Input,

        /// The model error.
        error: &'a M::Error,
    },
}

impl<M: Model> Event<'_, M> {
    /// Returns the point that was evaluated (or attempted).
    #[must_use]
    pub fn point(&self) -> &M::Input {
        match self {
            Self::Evaluated { point, .. } | Self::ModelFailed { point, .. } => point,
        }
    }
}
