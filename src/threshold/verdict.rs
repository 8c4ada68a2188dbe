//! Evaluation results and evaluation errors.

use serde::Serialize;
use thiserror::Error;
use wafdiff_types::{RunState, Value, ValueKind};

use super::config::{ComparisonMethod, ComparisonObject};

/// One failing before/after pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Position of the pair after filtering and reduction.
    pub index: usize,
    pub before: Value,
    pub after: Value,
}

/// Outcome of evaluating one threshold against a before/after pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// Every failing pair, in position order.
    pub failures: Vec<Failure>,
    /// Number of pairs that were compared.
    pub compared: usize,
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        self.passed
    }
}

/// Broad category of an evaluation error, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// Missing, empty, length- or type-mismatched data.
    Data,
    /// A method/object/value-type combination the engine does not support.
    Comparison,
}

/// Errors that abort the evaluation of a single threshold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("no {state} data for metric {metric:?}")]
    MissingData { state: RunState, metric: String },

    #[error("before data is {before} but after data is {after}")]
    TypeMismatch { before: ValueKind, after: ValueKind },

    #[error("{method} is not supported for {kind} values (only EQ and NE)")]
    UnsupportedValueType {
        method: ComparisonMethod,
        kind: ValueKind,
    },

    #[error("{method} cannot be used with comparison object {object:?} (ratios are relative to BEFORE)")]
    UnsupportedObject {
        method: ComparisonMethod,
        object: ComparisonObject,
    },

    #[error("cannot reduce {kind} values to a {unit}")]
    NonNumericReduction { unit: &'static str, kind: ValueKind },

    #[error("before has {before} items but after has {after} after filtering")]
    LengthMismatch { before: usize, after: usize },

    #[error("before value at position {index} is zero, ratio is undefined")]
    DivisionByZero { index: usize },

    #[error("collector output unavailable: {reason}")]
    SourceUnavailable { reason: String },
}

impl EvalError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EvalError::MissingData { .. }
            | EvalError::TypeMismatch { .. }
            | EvalError::LengthMismatch { .. }
            | EvalError::SourceUnavailable { .. } => ErrorClass::Data,
            EvalError::UnsupportedValueType { .. }
            | EvalError::UnsupportedObject { .. }
            | EvalError::NonNumericReduction { .. }
            | EvalError::DivisionByZero { .. } => ErrorClass::Comparison,
        }
    }

    /// Returns true for the errors raised for unsupported comparisons.
    pub fn is_unsupported_comparison(&self) -> bool {
        matches!(
            self,
            EvalError::UnsupportedValueType { .. }
                | EvalError::UnsupportedObject { .. }
                | EvalError::NonNumericReduction { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let missing = EvalError::MissingData {
            state: RunState::After,
            metric: "cpu_total".to_string(),
        };
        assert_eq!(missing.class(), ErrorClass::Data);
        assert_eq!(missing.to_string(), "no after data for metric \"cpu_total\"");

        let unsupported = EvalError::UnsupportedValueType {
            method: ComparisonMethod::Gt,
            kind: ValueKind::Text,
        };
        assert_eq!(unsupported.class(), ErrorClass::Comparison);
        assert!(unsupported.is_unsupported_comparison());
        assert!(unsupported.to_string().contains("GT"));

        assert!(!EvalError::DivisionByZero { index: 0 }.is_unsupported_comparison());
        assert_eq!(EvalError::LengthMismatch { before: 1, after: 2 }.class(), ErrorClass::Data);

        let unavailable = EvalError::SourceUnavailable {
            reason: "after_cAdvisor.json: not found".to_string(),
        };
        assert_eq!(unavailable.class(), ErrorClass::Data);
        assert!(!unavailable.is_unsupported_comparison());
    }
}
