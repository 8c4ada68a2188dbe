//! Threshold rules and their evaluation.
//!
//! - [`config`]: the [`Threshold`] record and its JSON configuration files
//! - [`engine`]: label filtering, reduction and pairwise comparison
//! - [`verdict`]: evaluation results ([`Verdict`]) and [`EvalError`]

pub mod config;
pub mod engine;
pub mod verdict;

pub use config::{
    load_thresholds, parse_thresholds, ComparisonMethod, ComparisonObject, ComparisonUnit,
    ConfigError, Threshold,
};
pub use engine::{evaluate, evaluate_stores, filter_by_labels, reduce};
pub use verdict::{ErrorClass, EvalError, Failure, Verdict};
