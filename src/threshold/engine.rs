//! Threshold evaluation.
//!
//! Evaluation is a pure function of the threshold and the two item slices:
//!
//! ```text
//! preconditions ─▶ label filter ─▶ reduce (EACH/COUNT/SUM/AVERAGE) ─▶ pairwise predicate
//! ```
//!
//! Every failing pair is recorded; evaluation never stops at the first one.

use wafdiff_types::{DataItem, MetricStore, RunState, Value};

use super::config::{ComparisonMethod, ComparisonObject, ComparisonUnit, Threshold};
use super::verdict::{EvalError, Failure, Verdict};

impl Threshold {
    /// Label filter: an item is kept if it carries one of the include labels
    /// (when any are set) and none of the exclude labels.
    pub fn accepts(&self, item: &DataItem) -> bool {
        let included = self.include_labels.is_empty() || item.has_any_label(&self.include_labels);
        let excluded = !self.exclude_labels.is_empty() && item.has_any_label(&self.exclude_labels);
        included && !excluded
    }
}

/// Apply a threshold's label filter to a sequence of items.
pub fn filter_by_labels<'a, I>(threshold: &Threshold, items: I) -> Vec<&'a DataItem>
where
    I: IntoIterator<Item = &'a DataItem>,
{
    items.into_iter().filter(|item| threshold.accepts(item)).collect()
}

/// Reduce filtered items according to the comparison unit.
///
/// `EACH` keeps every value; the other units collapse the series to a single
/// value. `state` and `metric` only feed error messages.
pub fn reduce(
    unit: ComparisonUnit,
    items: &[&DataItem],
    state: RunState,
    metric: &str,
) -> Result<Vec<Value>, EvalError> {
    match unit {
        ComparisonUnit::Each => Ok(items.iter().map(|item| item.value.clone()).collect()),
        ComparisonUnit::Count => Ok(vec![Value::from(items.len())]),
        ComparisonUnit::Sum => Ok(vec![Value::Number(sum(items, "sum")?)]),
        ComparisonUnit::Average => {
            if items.is_empty() {
                return Err(EvalError::MissingData {
                    state,
                    metric: metric.to_string(),
                });
            }
            let total = sum(items, "average")?;
            Ok(vec![Value::Number(total / items.len() as f64)])
        }
    }
}

fn sum(items: &[&DataItem], unit: &'static str) -> Result<f64, EvalError> {
    items.iter().try_fold(0.0, |acc, item| {
        item.value.as_f64().map(|n| acc + n).ok_or(EvalError::NonNumericReduction {
            unit,
            kind: item.value.kind(),
        })
    })
}

/// Evaluate a threshold against the before and after items of its metric.
pub fn evaluate(
    threshold: &Threshold,
    before: &[DataItem],
    after: &[DataItem],
) -> Result<Verdict, EvalError> {
    let method = threshold.comparison_method;
    let metric = threshold.metric_name.as_str();

    let (Some(first_before), Some(first_after)) = (before.first(), after.first()) else {
        let state = if before.is_empty() {
            RunState::Before
        } else {
            RunState::After
        };
        return Err(EvalError::MissingData {
            state,
            metric: metric.to_string(),
        });
    };

    let kind = first_before.value.kind();
    if kind != first_after.value.kind() {
        return Err(EvalError::TypeMismatch {
            before: kind,
            after: first_after.value.kind(),
        });
    }
    if kind.is_equality_only() && !method.is_equality() {
        return Err(EvalError::UnsupportedValueType { method, kind });
    }
    if method.is_ratio() && threshold.comparison_object == ComparisonObject::Threshold {
        return Err(EvalError::UnsupportedObject {
            method,
            object: threshold.comparison_object,
        });
    }

    let unit = threshold.comparison_unit;
    let before_items = filter_by_labels(threshold, before);
    let after_items = filter_by_labels(threshold, after);
    let before_values = reduce(unit, &before_items, RunState::Before, metric)?;
    let after_values = reduce(unit, &after_items, RunState::After, metric)?;

    if before_values.len() != after_values.len() {
        return Err(EvalError::LengthMismatch {
            before: before_values.len(),
            after: after_values.len(),
        });
    }

    let mut failures = Vec::new();
    for (index, (b, a)) in before_values.iter().zip(&after_values).enumerate() {
        if !holds(method, threshold.threshold, index, b, a)? {
            failures.push(Failure {
                index,
                before: b.clone(),
                after: a.clone(),
            });
        }
    }

    Ok(Verdict {
        passed: failures.is_empty(),
        failures,
        compared: before_values.len(),
    })
}

/// Look the threshold's metric up in both stores and evaluate it.
///
/// A metric missing from either store is reported as missing data.
pub fn evaluate_stores(
    threshold: &Threshold,
    before: &MetricStore,
    after: &MetricStore,
) -> Result<Verdict, EvalError> {
    evaluate(
        threshold,
        before.items(&threshold.metric_name),
        after.items(&threshold.metric_name),
    )
}

/// Whether one before/after pair satisfies the comparison.
///
/// Ratio methods put the threshold on the left: `RATIO_GT` passes when
/// `threshold > after / before`.
fn holds(
    method: ComparisonMethod,
    threshold: f64,
    index: usize,
    before: &Value,
    after: &Value,
) -> Result<bool, EvalError> {
    if before.kind() != after.kind() {
        return Err(EvalError::TypeMismatch {
            before: before.kind(),
            after: after.kind(),
        });
    }

    let held = match method {
        ComparisonMethod::Eq => before == after,
        ComparisonMethod::Ne => before != after,
        ComparisonMethod::Gt => {
            let (b, a) = numbers(method, before, after)?;
            b > a
        }
        ComparisonMethod::Ge => {
            let (b, a) = numbers(method, before, after)?;
            b >= a
        }
        // LT has always been evaluated as "before <= after", same as LE.
        ComparisonMethod::Lt | ComparisonMethod::Le => {
            let (b, a) = numbers(method, before, after)?;
            b <= a
        }
        ComparisonMethod::RatioGt => threshold > ratio(method, index, before, after)?,
        ComparisonMethod::RatioLt => threshold < ratio(method, index, before, after)?,
        ComparisonMethod::RatioGe => threshold >= ratio(method, index, before, after)?,
        ComparisonMethod::RatioLe => threshold <= ratio(method, index, before, after)?,
    };
    Ok(held)
}

fn numbers(
    method: ComparisonMethod,
    before: &Value,
    after: &Value,
) -> Result<(f64, f64), EvalError> {
    match (before.as_f64(), after.as_f64()) {
        (Some(b), Some(a)) => Ok((b, a)),
        _ => Err(EvalError::UnsupportedValueType {
            method,
            kind: before.kind(),
        }),
    }
}

fn ratio(
    method: ComparisonMethod,
    index: usize,
    before: &Value,
    after: &Value,
) -> Result<f64, EvalError> {
    let (b, a) = numbers(method, before, after)?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero { index });
    }
    Ok(a / b)
}
