use std::{fmt, str::FromStr};

use crate::ConfigError;

/// The closed set of feature names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureName {
    Plain,
    Custom,
    Noisy,
    RandomizeX0,
    Regularized,
    Tough,
    Truncated,
}

impl FeatureName {
    /// Every feature name, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Plain,
        Self::Custom,
        Self::Noisy,
        Self::RandomizeX0,
        Self::Regularized,
        Self::Tough,
        Self::Truncated,
    ];

    /// Returns the lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Custom => "custom",
            Self::Noisy => "noisy",
            Self::RandomizeX0 => "randomize_x0",
            Self::Regularized => "regularized",
            Self::Tough => "tough",
            Self::Truncated => "truncated",
        }
    }

    /// Returns `true` for features whose evaluations are randomized.
    ///
    /// Benchmarks with these features also solve every problem without
    /// perturbation to find the best reachable merit.
    #[must_use]
    pub fn is_stochastic(self) -> bool {
        matches!(self, Self::Noisy | Self::Tough | Self::Truncated)
    }

    /// Returns the options accepted by this feature.
    #[must_use]
    pub fn accepts(self, option: OptionKey) -> bool {
        match option {
            OptionKey::NRuns => true,
            OptionKey::Modifier => self == Self::Custom,
            OptionKey::Distribution => matches!(self, Self::Noisy | Self::RandomizeX0),
            OptionKey::NoiseType => self == Self::Noisy,
            OptionKey::Order | OptionKey::Parameter => self == Self::Regularized,
            OptionKey::RateError | OptionKey::RateNan => self == Self::Tough,
            OptionKey::SignificantDigits => self == Self::Truncated,
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == lower)
            .ok_or(ConfigError::UnknownFeature(lower))
    }
}

/// The closed set of feature option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    NRuns,
    Modifier,
    Distribution,
    NoiseType,
    Order,
    Parameter,
    RateError,
    RateNan,
    SignificantDigits,
}

impl OptionKey {
    pub const ALL: [Self; 9] = [
        Self::NRuns,
        Self::Modifier,
        Self::Distribution,
        Self::NoiseType,
        Self::Order,
        Self::Parameter,
        Self::RateError,
        Self::RateNan,
        Self::SignificantDigits,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NRuns => "n_runs",
            Self::Modifier => "modifier",
            Self::Distribution => "distribution",
            Self::NoiseType => "type",
            Self::Order => "order",
            Self::Parameter => "parameter",
            Self::RateError => "rate_error",
            Self::RateNan => "rate_nan",
            Self::SignificantDigits => "significant_digits",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == lower)
            .ok_or(ConfigError::UnknownOption(lower))
    }
}

/// How the `noisy` feature combines a sample with the objective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoiseType {
    /// `f + sample`
    Absolute,

    /// `f · (1 + sample)`
    #[default]
    Relative,
}

impl NoiseType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }

    /// Numeric code mixed into the generator context.
    pub(crate) fn code(self) -> f64 {
        self.as_str().bytes().map(f64::from).sum()
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            _ => Err(ConfigError::InvalidOption {
                option: OptionKey::NoiseType,
                expected: "either \"absolute\" or \"relative\"",
            }),
        }
    }
}
