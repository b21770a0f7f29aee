use thiserror::Error;

use crate::feature::{FeatureName, OptionKey};

/// Errors raised while building a [`Feature`](crate::Feature).
///
/// These are always raised before any evaluation takes place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {option} is not valid for feature {feature}")]
    OptionNotValid {
        option: OptionKey,
        feature: FeatureName,
    },

    #[error("option {option} must be {expected}")]
    InvalidOption {
        option: OptionKey,
        expected: &'static str,
    },

    #[error("a custom feature requires the {} option", OptionKey::Modifier)]
    MissingModifier,
}

/// Errors raised when an argument is rejected at call time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("seed must be a nonnegative integer, got {0}")]
    NegativeSeed(i64),

    #[error("seed must be a nonnegative integer, got {0}")]
    InvalidSeed(f64),

    #[error("array shapes differ: {left:?} and {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
}

/// A deliberate evaluation failure produced by the `tough` feature.
///
/// Callers record it as a failed evaluation instead of aborting the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("simulated evaluation failure")]
pub struct SimulatedFailure;
