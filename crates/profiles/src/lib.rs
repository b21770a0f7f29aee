//! Reduction of benchmark merit values into comparison profiles.
//!
//! The pipeline runs leaf to root:
//!
//! 1. [`work_counts`]: for one tolerance, the number of evaluations each
//!    (problem, solver, run) needs to reach the tolerance threshold
//! 2. [`performance_profile`] and [`data_profile`]: normalized, sorted step
//!    curves of the fraction of problems solved
//! 3. [`log_ratio_profile`]: the head-to-head comparison of two solvers
//!
//! Every function is a pure transform over immutable arrays. Numeric edge
//! cases (no problems, nothing solved) produce sentinel values, never errors.

mod axes;
mod error;
mod log_ratio;
mod tolerance;
mod work;

pub use axes::{
    ProfileCurve, ProfileCurves, ProfileKind, RunBand, data_profile, performance_profile,
};
pub use error::ProfileError;
pub use log_ratio::{LogRatioProfile, log_ratio_profile};
pub use tolerance::{TOLERANCES, threshold, tolerance_label};
pub use work::{WorkCounts, work_counts};
