//! Perturbations applied to objective evaluations during a benchmark.
//!
//! A [`Feature`] distorts every objective value a solver sees, emulating
//! noisy, truncated, regularized, or failure-prone evaluations. Features are
//! immutable once built and every randomized variant is reproducible: the
//! random stream is derived from the run seed and the evaluation itself (see
//! [`derive_rng`]), so repeating an evaluation repeats its perturbation.
//!
//! # Variants
//!
//! | name           | effect on `f`                                           |
//! |----------------|---------------------------------------------------------|
//! | `plain`        | none                                                    |
//! | `custom`       | replaced by a user modifier                             |
//! | `noisy`        | `f + s` or `f · (1 + s)` for a sampled `s`              |
//! | `randomize_x0` | none (the starting point is shifted instead)            |
//! | `regularized`  | `f + parameter · ‖x‖_order`                             |
//! | `tough`        | random [`SimulatedFailure`] or NaN                      |
//! | `truncated`    | rounded to a number of significant digits, plus jitter  |
//!
//! Features are built either from typed options (`Feature::noisy(...)`) or
//! from a name and a bag of dynamically typed options
//! ([`Feature::configure`]). Both paths run the same checks.

mod name;
mod numeric;
mod options;
mod rng;


pub use name::{FeatureName, NoiseType, OptionKey};
pub use options::{
    CustomOptions, ModifierFn, NoiseFn, NoisyOptions, OptionValue, PlainOptions, PointNoiseFn,
    RandomizeX0Options, RegularizedOptions, ToughOptions, TruncatedOptions,
};
pub use rng::{FeatureRng, RunSeed, derive_rng};

use rand::Rng;

use crate::{ConfigError, SimulatedFailure, ValidationError};

use numeric::{truncate, vector_norm};
use options::{
    check_nonnegative, check_positive, check_unit_interval, modifier, noise, noise_type,
    nonnegative_number, number, point_noise, positive_integer, unit_number,
};

/// A configured perturbation of objective evaluations.
///
/// The only ways to build one are the typed constructors and
/// [`Feature::configure`], so every feature holds checked options.
#[derive(Debug, Clone, Default)]
pub struct Feature {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Plain(PlainOptions),
    Custom(CustomOptions),
    Noisy(NoisyOptions),
    RandomizeX0(RandomizeX0Options),
    Regularized(RegularizedOptions),
    Tough(ToughOptions),
    Truncated(TruncatedOptions),
}

impl Default for Kind {
    fn default() -> Self {
        Self::Plain(PlainOptions::default())
    }
}

impl Feature {
    /// Creates the unperturbed feature with a single run.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Creates a `plain` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero.
    pub fn plain_with(options: PlainOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        Ok(Self {
            kind: Kind::Plain(options),
        })
    }

    /// Creates a `custom` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero.
    pub fn custom(options: CustomOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        Ok(Self {
            kind: Kind::Custom(options),
        })
    }

    /// Creates a `noisy` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero.
    pub fn noisy(options: NoisyOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        Ok(Self {
            kind: Kind::Noisy(options),
        })
    }

    /// Creates a `randomize_x0` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero.
    pub fn randomize_x0(options: RandomizeX0Options) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        Ok(Self {
            kind: Kind::RandomizeX0(options),
        })
    }

    /// Creates a `regularized` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero or `parameter` is negative or NaN.
    pub fn regularized(options: RegularizedOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        check_nonnegative(OptionKey::Parameter, options.parameter)?;
        Ok(Self {
            kind: Kind::Regularized(options),
        })
    }

    /// Creates a `tough` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` is zero or either rate is outside `[0, 1]`.
    pub fn tough(options: ToughOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        check_unit_interval(OptionKey::RateError, options.rate_error)?;
        check_unit_interval(OptionKey::RateNan, options.rate_nan)?;
        Ok(Self {
            kind: Kind::Tough(options),
        })
    }

    /// Creates a `truncated` feature.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_runs` or `significant_digits` is zero.
    pub fn truncated(options: TruncatedOptions) -> Result<Self, ConfigError> {
        check_positive(OptionKey::NRuns, options.n_runs)?;
        check_positive(OptionKey::SignificantDigits, options.significant_digits)?;
        Ok(Self {
            kind: Kind::Truncated(options),
        })
    }

    /// Builds a feature from its name and dynamically typed options.
    ///
    /// Names and keys match case-insensitively. Options not given keep the
    /// defaults of the named feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or a key is unknown, if a key does not
    /// apply to the named feature, if a value fails its check, or if a
    /// `custom` feature has no modifier.
    ///
    /// # Example
    ///
    /// ```
    /// use optiprof_core::{Feature, FeatureName};
    ///
    /// let feature = Feature::configure("tough", [("rate_nan", 0.5.into())]).unwrap();
    /// assert_eq!(feature.name(), FeatureName::Tough);
    /// assert_eq!(feature.n_runs(), 10);
    /// ```
    pub fn configure<K, I>(name: &str, options: I) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, OptionValue)>,
    {
        let name: FeatureName = name.parse()?;
        let mut options_by_key = Vec::new();
        for (key, value) in options {
            let key: OptionKey = key.as_ref().parse()?;
            if !name.accepts(key) {
                return Err(ConfigError::OptionNotValid {
                    option: key,
                    feature: name,
                });
            }
            options_by_key.push((key, value));
        }

        // The last occurrence of a repeated key wins.
        let lookup = |wanted: OptionKey| {
            options_by_key
                .iter()
                .rev()
                .find(|(key, _)| *key == wanted)
                .map(|(_, value)| value)
        };
        let n_runs = lookup(OptionKey::NRuns)
            .map(|value| positive_integer(OptionKey::NRuns, value))
            .transpose()?;

        let kind = match name {
            FeatureName::Plain => {
                let mut options = PlainOptions::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                Kind::Plain(options)
            }
            FeatureName::Custom => {
                let modifier = lookup(OptionKey::Modifier)
                    .ok_or(ConfigError::MissingModifier)
                    .and_then(modifier)?;
                Kind::Custom(CustomOptions {
                    n_runs: n_runs.unwrap_or(1),
                    modifier,
                })
            }
            FeatureName::Noisy => {
                let mut options = NoisyOptions::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                if let Some(value) = lookup(OptionKey::Distribution) {
                    options.distribution = noise(value)?;
                }
                if let Some(value) = lookup(OptionKey::NoiseType) {
                    options.noise_type = noise_type(value)?;
                }
                Kind::Noisy(options)
            }
            FeatureName::RandomizeX0 => {
                let mut options = RandomizeX0Options::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                if let Some(value) = lookup(OptionKey::Distribution) {
                    options.distribution = point_noise(value)?;
                }
                Kind::RandomizeX0(options)
            }
            FeatureName::Regularized => {
                let mut options = RegularizedOptions::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                if let Some(value) = lookup(OptionKey::Order) {
                    options.order = number(OptionKey::Order, value)?;
                }
                if let Some(value) = lookup(OptionKey::Parameter) {
                    options.parameter = nonnegative_number(OptionKey::Parameter, value)?;
                }
                Kind::Regularized(options)
            }
            FeatureName::Tough => {
                let mut options = ToughOptions::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                if let Some(value) = lookup(OptionKey::RateError) {
                    options.rate_error = unit_number(OptionKey::RateError, value)?;
                }
                if let Some(value) = lookup(OptionKey::RateNan) {
                    options.rate_nan = unit_number(OptionKey::RateNan, value)?;
                }
                Kind::Tough(options)
            }
            FeatureName::Truncated => {
                let mut options = TruncatedOptions::default();
                options.n_runs = n_runs.unwrap_or(options.n_runs);
                if let Some(value) = lookup(OptionKey::SignificantDigits) {
                    options.significant_digits =
                        positive_integer(OptionKey::SignificantDigits, value)?;
                }
                Kind::Truncated(options)
            }
        };

        Ok(Self { kind })
    }

    /// Returns the feature name.
    #[must_use]
    pub fn name(&self) -> FeatureName {
        match &self.kind {
            Kind::Plain(_) => FeatureName::Plain,
            Kind::Custom(_) => FeatureName::Custom,
            Kind::Noisy(_) => FeatureName::Noisy,
            Kind::RandomizeX0(_) => FeatureName::RandomizeX0,
            Kind::Regularized(_) => FeatureName::Regularized,
            Kind::Tough(_) => FeatureName::Tough,
            Kind::Truncated(_) => FeatureName::Truncated,
        }
    }

    /// Returns how many times each solver is run on each problem.
    #[must_use]
    pub fn n_runs(&self) -> usize {
        match &self.kind {
            Kind::Plain(options) => options.n_runs,
            Kind::Custom(options) => options.n_runs,
            Kind::Noisy(options) => options.n_runs,
            Kind::RandomizeX0(options) => options.n_runs,
            Kind::Regularized(options) => options.n_runs,
            Kind::Tough(options) => options.n_runs,
            Kind::Truncated(options) => options.n_runs,
        }
    }

    /// Perturbs the objective value `f` evaluated at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatedFailure`] when a `tough` feature decides that the
    /// evaluation fails. No other variant fails.
    pub fn apply(
        &self,
        x: &[f64],
        f: f64,
        seed: Option<RunSeed>,
    ) -> Result<f64, SimulatedFailure> {
        let value = match &self.kind {
            Kind::Plain(_) | Kind::RandomizeX0(_) => f,
            Kind::Custom(options) => (options.modifier)(x, f, seed),
            Kind::Noisy(options) => {
                let mut rng = derive_rng(seed, context(&[f, options.noise_type.code()], x));
                let sample = (options.distribution)(&mut rng);
                match options.noise_type {
                    NoiseType::Absolute => f + sample,
                    NoiseType::Relative => f * (1.0 + sample),
                }
            }
            Kind::Regularized(options) => f + options.parameter * vector_norm(x, options.order),
            Kind::Tough(options) => {
                let mut rng = derive_rng(
                    seed,
                    context(&[f, options.rate_error, options.rate_nan], x),
                );
                if rng.random::<f64>() < options.rate_error {
                    return Err(SimulatedFailure);
                }
                if rng.random::<f64>() < options.rate_nan {
                    f64::NAN
                } else {
                    f
                }
            }
            Kind::Truncated(options) => {
                #[allow(clippy::cast_precision_loss)]
                let digits = options.significant_digits as f64;
                let mut rng = derive_rng(seed, context(&[f, digits], x));
                truncate(f, options.significant_digits, &mut rng)
            }
        };

        Ok(value)
    }

    /// Returns the starting point a solver should use for this run.
    ///
    /// A `randomize_x0` feature shifts `x0` by a draw of its distribution,
    /// derived from the seed and `x0`; every other feature returns `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ShapeMismatch`] if the distribution draws a
    /// shift whose length differs from that of `x0`.
    pub fn perturb_x0(
        &self,
        x0: &[f64],
        seed: Option<RunSeed>,
    ) -> Result<Vec<f64>, ValidationError> {
        match &self.kind {
            Kind::RandomizeX0(options) => {
                let mut rng = derive_rng(seed, x0.iter().copied());
                let shift = (options.distribution)(&mut rng, x0.len());
                if shift.len() != x0.len() {
                    return Err(ValidationError::ShapeMismatch {
                        left: vec![x0.len()],
                        right: vec![shift.len()],
                    });
                }
                Ok(x0.iter().zip(&shift).map(|(x, dx)| x + dx).collect())
            }
            _ => Ok(x0.to_vec()),
        }
    }
}

fn context<'a>(head: &'a [f64], x: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    head.iter().chain(x).copied()
}
