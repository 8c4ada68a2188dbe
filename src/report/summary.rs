//! Verdict summaries and go-ftw run summaries.

use std::fmt::Write;

use wafdiff_adapters::ftw;
use wafdiff_types::{MetricStore, Value};

use super::Theme;
use crate::threshold::{EvalError, Threshold, Verdict};

/// Render one threshold's outcome.
///
/// The first line is always `Threshold: <name> passed|failed`. A failed
/// verdict is followed by every failing pair; an evaluation error is shown as
/// a failure followed by its message.
pub fn verdict_line(
    threshold: &Threshold,
    outcome: &Result<Verdict, EvalError>,
    theme: &Theme,
) -> String {
    let passed = matches!(outcome, Ok(verdict) if verdict.passed);
    let status = if passed {
        theme.bold("passed", theme.good)
    } else {
        theme.bold("failed", theme.bad)
    };

    let mut out = format!("Threshold: {:24} {}\n", threshold.name, status);
    if passed {
        return out;
    }

    let mut detail = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(detail, "    id: {}", threshold.id);
    if !threshold.description.is_empty() {
        let _ = writeln!(detail, "    description: {}", threshold.description);
    }
    let _ = writeln!(
        detail,
        "    rule: {} {} of {:?} against {}, threshold {}",
        threshold.comparison_method,
        threshold.comparison_unit,
        threshold.metric_name,
        threshold.comparison_object,
        threshold.threshold
    );

    match outcome {
        Ok(verdict) => {
            for failure in &verdict.failures {
                let _ = writeln!(
                    detail,
                    "    [{}] before: {}  after: {}",
                    failure.index,
                    show(&failure.before),
                    show(&failure.after)
                );
            }
        }
        Err(e) => {
            let _ = writeln!(detail, "    error: {}", e);
        }
    }

    out.push_str(&theme.paint(detail, theme.bad));
    out
}

fn show(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

/// Render the outcomes of a list of thresholds, in order.
pub fn verdict_summary<'a, I>(outcomes: I, theme: &Theme) -> String
where
    I: IntoIterator<Item = (&'a Threshold, &'a Result<Verdict, EvalError>)>,
{
    outcomes
        .into_iter()
        .map(|(threshold, outcome)| verdict_line(threshold, outcome, theme))
        .collect()
}

/// Render the go-ftw run summary for one run.
pub fn ftw_run_summary(test_name: &str, store: &MetricStore) -> String {
    let number = |metric: &str| {
        store
            .first_value(metric)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    format!(
        " Test Name: {}\n       Run: {}\n   Success: {}\n    Failed: {}\n   Skipped: {}\nTotal Time: {}s\n",
        test_name,
        number(ftw::RUN),
        store.items(ftw::SUCCESS).len(),
        store.items(ftw::FAILED).len(),
        store.items(ftw::SKIPPED).len(),
        number(ftw::TOTAL_TIME),
    )
}
