use std::{fmt, sync::Arc};

use rand_distr::{Distribution, StandardNormal};

use crate::ConfigError;

use super::{FeatureRng, NoiseType, OptionKey, RunSeed};

/// Draws one noise sample.
pub type NoiseFn = Arc<dyn Fn(&mut FeatureRng) -> f64 + Send + Sync>;

/// Draws a shift for a starting point of the given dimension.
pub type PointNoiseFn = Arc<dyn Fn(&mut FeatureRng, usize) -> Vec<f64> + Send + Sync>;

/// Replaces an objective value given the point, the raw value, and the seed.
pub type ModifierFn = Arc<dyn Fn(&[f64], f64, Option<RunSeed>) -> f64 + Send + Sync>;

/// A dynamically typed option value passed to [`Feature::configure`].
///
/// [`Feature::configure`]: super::Feature::configure
#[derive(Clone)]
pub enum OptionValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Noise(NoiseFn),
    PointNoise(PointNoiseFn),
    Modifier(ModifierFn),
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Noise(_) => f.write_str("Noise(..)"),
            Self::PointNoise(_) => f.write_str("PointNoise(..)"),
            Self::Modifier(_) => f.write_str("Modifier(..)"),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NoiseType> for OptionValue {
    fn from(value: NoiseType) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

impl OptionValue {
    /// Wraps a noise distribution.
    pub fn noise(distribution: impl Fn(&mut FeatureRng) -> f64 + Send + Sync + 'static) -> Self {
        Self::Noise(Arc::new(distribution))
    }

    /// Wraps a starting-point distribution.
    pub fn point_noise(
        distribution: impl Fn(&mut FeatureRng, usize) -> Vec<f64> + Send + Sync + 'static,
    ) -> Self {
        Self::PointNoise(Arc::new(distribution))
    }

    /// Wraps an objective modifier.
    pub fn modifier(
        modifier: impl Fn(&[f64], f64, Option<RunSeed>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::Modifier(Arc::new(modifier))
    }
}

fn default_noise() -> NoiseFn {
    Arc::new(|rng: &mut FeatureRng| {
        let z: f64 = StandardNormal.sample(&mut *rng);
        1e-3 * z
    })
}

fn default_point_noise() -> PointNoiseFn {
    Arc::new(|rng: &mut FeatureRng, n: usize| {
        (0..n)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut *rng);
                1e-3 * z
            })
            .collect()
    })
}

/// Options of the `plain` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainOptions {
    pub n_runs: usize,
}

impl Default for PlainOptions {
    fn default() -> Self {
        Self { n_runs: 1 }
    }
}

/// Options of the `custom` feature.
#[derive(Clone)]
pub struct CustomOptions {
    pub n_runs: usize,
    pub modifier: ModifierFn,
}

impl CustomOptions {
    /// Creates options for a single run with the given modifier.
    pub fn new(
        modifier: impl Fn(&[f64], f64, Option<RunSeed>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            n_runs: 1,
            modifier: Arc::new(modifier),
        }
    }
}

impl fmt::Debug for CustomOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOptions")
            .field("n_runs", &self.n_runs)
            .finish_non_exhaustive()
    }
}

/// Options of the `noisy` feature.
#[derive(Clone)]
pub struct NoisyOptions {
    pub n_runs: usize,
    pub distribution: NoiseFn,
    pub noise_type: NoiseType,
}

impl Default for NoisyOptions {
    fn default() -> Self {
        Self {
            n_runs: 10,
            distribution: default_noise(),
            noise_type: NoiseType::Relative,
        }
    }
}

impl fmt::Debug for NoisyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoisyOptions")
            .field("n_runs", &self.n_runs)
            .field("noise_type", &self.noise_type)
            .finish_non_exhaustive()
    }
}

/// Options of the `randomize_x0` feature.
#[derive(Clone)]
pub struct RandomizeX0Options {
    pub n_runs: usize,
    pub distribution: PointNoiseFn,
}

impl Default for RandomizeX0Options {
    fn default() -> Self {
        Self {
            n_runs: 10,
            distribution: default_point_noise(),
        }
    }
}

impl fmt::Debug for RandomizeX0Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomizeX0Options")
            .field("n_runs", &self.n_runs)
            .finish_non_exhaustive()
    }
}

/// Options of the `regularized` feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularizedOptions {
    pub n_runs: usize,
    pub order: f64,
    pub parameter: f64,
}

impl Default for RegularizedOptions {
    fn default() -> Self {
        Self {
            n_runs: 1,
            order: 2.0,
            parameter: 1.0,
        }
    }
}

/// Options of the `tough` feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToughOptions {
    pub n_runs: usize,
    pub rate_error: f64,
    pub rate_nan: f64,
}

impl Default for ToughOptions {
    fn default() -> Self {
        Self {
            n_runs: 10,
            rate_error: 0.0,
            rate_nan: 0.05,
        }
    }
}

/// Options of the `truncated` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedOptions {
    pub n_runs: usize,
    pub significant_digits: usize,
}

impl Default for TruncatedOptions {
    fn default() -> Self {
        Self {
            n_runs: 10,
            significant_digits: 6,
        }
    }
}

// --- Predicates ---
//
// Each option has exactly one predicate. The checks run both for typed option
// structs and for values arriving through `Feature::configure`.

pub(crate) fn check_positive(option: OptionKey, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(invalid(option, "a positive integer"));
    }
    Ok(value)
}

pub(crate) fn check_nonnegative(option: OptionKey, value: f64) -> Result<f64, ConfigError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(option, "a nonnegative number"))
    }
}

pub(crate) fn check_unit_interval(option: OptionKey, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(option, "a number between 0 and 1"))
    }
}

pub(crate) fn positive_integer(
    option: OptionKey,
    value: &OptionValue,
) -> Result<usize, ConfigError> {
    let integer = match *value {
        OptionValue::Integer(i) => usize::try_from(i).ok(),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        OptionValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v >= 0.0 => Some(v as usize),
        _ => None,
    };
    integer
        .ok_or_else(|| invalid(option, "a positive integer"))
        .and_then(|i| check_positive(option, i))
}

pub(crate) fn number(option: OptionKey, value: &OptionValue) -> Result<f64, ConfigError> {
    match *value {
        #[allow(clippy::cast_precision_loss)]
        OptionValue::Integer(i) => Ok(i as f64),
        OptionValue::Float(v) => Ok(v),
        _ => Err(invalid(option, "a number")),
    }
}

pub(crate) fn nonnegative_number(
    option: OptionKey,
    value: &OptionValue,
) -> Result<f64, ConfigError> {
    number(option, value)
        .map_err(|_| invalid(option, "a nonnegative number"))
        .and_then(|v| check_nonnegative(option, v))
}

pub(crate) fn unit_number(option: OptionKey, value: &OptionValue) -> Result<f64, ConfigError> {
    number(option, value)
        .map_err(|_| invalid(option, "a number between 0 and 1"))
        .and_then(|v| check_unit_interval(option, v))
}

pub(crate) fn noise_type(value: &OptionValue) -> Result<NoiseType, ConfigError> {
    match value {
        OptionValue::Text(text) => text.parse(),
        _ => Err(invalid(
            OptionKey::NoiseType,
            "either \"absolute\" or \"relative\"",
        )),
    }
}

pub(crate) fn noise(value: &OptionValue) -> Result<NoiseFn, ConfigError> {
    match value {
        OptionValue::Noise(distribution) => Ok(Arc::clone(distribution)),
        _ => Err(invalid(OptionKey::Distribution, "callable")),
    }
}

pub(crate) fn point_noise(value: &OptionValue) -> Result<PointNoiseFn, ConfigError> {
    match value {
        OptionValue::PointNoise(distribution) => Ok(Arc::clone(distribution)),
        _ => Err(invalid(OptionKey::Distribution, "callable")),
    }
}

pub(crate) fn modifier(value: &OptionValue) -> Result<ModifierFn, ConfigError> {
    match value {
        OptionValue::Modifier(modifier) => Ok(Arc::clone(modifier)),
        _ => Err(invalid(OptionKey::Modifier, "callable")),
    }
}

fn invalid(option: OptionKey, expected: &'static str) -> ConfigError {
    ConfigError::InvalidOption { option, expected }
}
