use thiserror::Error;

/// Tolerances for the average sampler.
///
/// The sampler is done once the standard error of the mean is below `atol`
/// or below `rtol · |mean|`. An unset tolerance never constrains the loss.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    atol: Option<f64>,
    rtol: Option<f64>,
}

/// Errors that can occur when validating an average sampler config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one of atol and rtol must be set")]
    NoTolerance,

    #[error("atol must be finite and positive")]
    Atol,

    #[error("rtol must be finite and positive")]
    Rtol,
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if neither tolerance is set, or if a set tolerance is
    /// non-finite or not strictly positive.
    pub fn new(atol: Option<f64>, rtol: Option<f64>) -> Result<Self, ConfigError> {
        if atol.is_none() && rtol.is_none() {
            return Err(ConfigError::NoTolerance);
        }
        if atol.is_some_and(|tol| !tol.is_finite() || tol <= 0.0) {
            return Err(ConfigError::Atol);
        }
        if rtol.is_some_and(|tol| !tol.is_finite() || tol <= 0.0) {
            return Err(ConfigError::Rtol);
        }

        Ok(Self { atol, rtol })
    }

    /// Creates a config with only an absolute tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `atol` is non-finite or not strictly positive.
    pub fn absolute(atol: f64) -> Result<Self, ConfigError> {
        Self::new(Some(atol), None)
    }

    /// Creates a config with only a relative tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `rtol` is non-finite or not strictly positive.
    pub fn relative(rtol: f64) -> Result<Self, ConfigError> {
        Self::new(None, Some(rtol))
    }

    /// Returns the absolute tolerance, `f64::INFINITY` when unset.
    #[must_use]
    pub fn atol(&self) -> f64 {
        self.atol.unwrap_or(f64::INFINITY)
    }

    /// Returns the relative tolerance, `f64::INFINITY` when unset.
    #[must_use]
    pub fn rtol(&self) -> f64 {
        self.rtol.unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_tolerance() {
        assert_eq!(Config::new(None, None), Err(ConfigError::NoTolerance));
    }

    #[test]
    fn rejects_invalid_tolerances() {
        assert_eq!(Config::absolute(0.0), Err(ConfigError::Atol));
        assert_eq!(Config::absolute(f64::NAN), Err(ConfigError::Atol));
        assert_eq!(Config::relative(-1.0), Err(ConfigError::Rtol));
        assert_eq!(
            Config::new(Some(0.1), Some(f64::INFINITY)),
            Err(ConfigError::Rtol)
        );
    }

    #[test]
    fn unset_tolerance_is_infinite() {
        let config = Config::absolute(0.1).unwrap();
        assert_eq!(config.atol(), 0.1);
        assert!(config.rtol().is_infinite());
    }
}
