/// A callable model that maps a sample point to a value.
///
/// This is the expensive function a [`Sampler`](crate::Sampler) learns.
/// Samplers never call it themselves; a driver evaluates proposed points and
/// feeds the results back through [`Sampler::add_point`](crate::Sampler::add_point).
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Square;

    impl Model for Square {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(input * input)
        }
    }

    #[test]
    fn model_maps_input_to_output() {
        assert_eq!(Square.call(&3.0), Ok(9.0));
    }
}
