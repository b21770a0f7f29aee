use thiserror::Error;

/// Configuration for a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_eval_factor: usize,
}

/// Errors that can occur when validating a benchmark config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_eval_factor must be positive")]
    MaxEvalFactor,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_eval_factor: 500,
        }
    }
}

impl Config {
    /// Creates a new config with a validated evaluation budget factor.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_eval_factor` is zero.
    pub fn new(max_eval_factor: usize) -> Result<Self, ConfigError> {
        if max_eval_factor == 0 {
            return Err(ConfigError::MaxEvalFactor);
        }

        Ok(Self { max_eval_factor })
    }

    /// Returns the number of evaluations allowed per problem variable.
    #[must_use]
    pub fn max_eval_factor(&self) -> usize {
        self.max_eval_factor
    }

    /// Returns the evaluation budget of a problem with `dimension` variables.
    #[must_use]
    pub fn max_eval(&self, dimension: usize) -> usize {
        self.max_eval_factor.saturating_mul(dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget() {
        let config = Config::default();

        assert_eq!(config.max_eval_factor(), 500);
        assert_eq!(config.max_eval(3), 1500);
    }

    #[test]
    fn rejects_zero_factor() {
        assert_eq!(Config::new(0), Err(ConfigError::MaxEvalFactor));
        assert_eq!(Config::new(20).unwrap().max_eval(2), 40);
    }
}
