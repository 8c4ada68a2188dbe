//! go-ftw rule-test results.
//!
//! go-ftw's JSON output lists the test cases that passed, failed and were
//! skipped, plus the runtime of every executed case.

use std::collections::BTreeMap;

use serde::Deserialize;
use wafdiff_types::{DataItem, MetricStore, RunState, Value};

use crate::{Adapter, AdapterError};

/// Number of test cases executed.
pub const RUN: &str = "run";
/// Identifiers of passing test cases.
pub const SUCCESS: &str = "success";
/// Identifiers of failing test cases.
pub const FAILED: &str = "failed";
/// Identifiers of skipped test cases.
pub const SKIPPED: &str = "skipped";
/// Per-case runtime.
pub const RUNTIME: &str = "runtime";
/// Total wall time of the run.
pub const TOTAL_TIME: &str = "totalTime";

/// Key used for the items of the pass/fail/skip lists.
const CASE_KEY: &str = "caseID";

#[derive(Debug, Deserialize)]
struct FtwRun {
    run: u64,
    #[serde(default)]
    success: Vec<String>,
    #[serde(default)]
    failed: Vec<String>,
    #[serde(default)]
    skipped: Vec<String>,
    #[serde(default)]
    runtime: BTreeMap<String, f64>,
    #[serde(rename = "TotalTime")]
    total_time: f64,
}

/// Adapter for `go-ftw run -o json` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FtwAdapter;

impl FtwAdapter {
    /// The rule family of a test case id (`"920100-1"` -> `"920100"`).
    pub fn rule_family(case_id: &str) -> &str {
        case_id.split('-').next().unwrap_or(case_id)
    }

    fn cases(store: &mut MetricStore, metric: &str, cases: &[String]) {
        store.ensure(metric);
        for case in cases {
            store.push(
                metric,
                DataItem::new(CASE_KEY, Value::Text(case.clone())).with_labels([case.as_str()]),
            );
        }
    }
}

impl Adapter for FtwAdapter {
    fn name(&self) -> &'static str {
        "go-ftw"
    }

    fn parse(&self, content: &str, state: RunState) -> Result<MetricStore, AdapterError> {
        let raw: FtwRun = serde_json::from_str(content)?;
        let mut store = MetricStore::new(state);

        store.push(RUN, DataItem::new(RUN, raw.run));
        Self::cases(&mut store, SUCCESS, &raw.success);
        Self::cases(&mut store, FAILED, &raw.failed);
        Self::cases(&mut store, SKIPPED, &raw.skipped);

        store.ensure(RUNTIME);
        for (case, secs) in &raw.runtime {
            store.push(
                RUNTIME,
                DataItem::new(case.as_str(), *secs)
                    .with_labels([case.as_str(), Self::rule_family(case)]),
            );
        }

        store.push(TOTAL_TIME, DataItem::new("TotalTime", raw.total_time));
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "run": 10,
            "success": ["test-1", "test-2", "test-3"],
            "failed": ["test-4"],
            "skipped": ["test-5"],
            "runtime": {
                "test-1": 0.1,
                "test-2": 0.2,
                "test-3": 0.15
            },
            "TotalTime": 1.5
        }"#
    }

    #[test]
    fn test_parse_counts() {
        let store = FtwAdapter.parse(sample_json(), RunState::Before).unwrap();

        assert_eq!(store.first_value(RUN), Some(&Value::Number(10.0)));
        assert_eq!(store.items(SUCCESS).len(), 3);
        assert_eq!(store.items(FAILED).len(), 1);
        assert_eq!(store.items(SKIPPED).len(), 1);
        assert_eq!(store.first_value(TOTAL_TIME), Some(&Value::Number(1.5)));
    }

    #[test]
    fn test_case_items_are_labelled() {
        let store = FtwAdapter.parse(sample_json(), RunState::After).unwrap();
        let failed = &store.items(FAILED)[0];
        assert_eq!(failed.key, "caseID");
        assert_eq!(failed.value, Value::from("test-4"));
        assert!(failed.has_label("test-4"));
    }

    #[test]
    fn test_runtime_labels_include_rule_family() {
        let store = FtwAdapter.parse(sample_json(), RunState::After).unwrap();
        let runtime = store.get(RUNTIME).unwrap();
        assert_eq!(runtime.len(), 3);

        let item = runtime.find("test-2").unwrap();
        assert_eq!(item.value, Value::Number(0.2));
        assert!(item.has_label("test-2"));
        assert!(item.has_label("test"));
    }

    #[test]
    fn test_empty_lists_produce_empty_series() {
        let json = r#"{"run": 0, "TotalTime": 0}"#;
        let store = FtwAdapter.parse(json, RunState::Before).unwrap();
        assert!(store.contains(SKIPPED));
        assert!(store.items(SKIPPED).is_empty());
        assert!(store.items(RUNTIME).is_empty());
    }

    #[test]
    fn test_rule_family() {
        assert_eq!(FtwAdapter::rule_family("942100-12"), "942100");
        assert_eq!(FtwAdapter::rule_family("plain"), "plain");
    }

    #[test]
    fn test_invalid_json() {
        let err = FtwAdapter.parse("not json", RunState::Before).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let store = FtwAdapter.load(file.path(), RunState::Before).unwrap();
        assert_eq!(store.state, RunState::Before);
        assert_eq!(store.items(SUCCESS).len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FtwAdapter
            .load(std::path::Path::new("/nonexistent/before_ftw.json"), RunState::Before)
            .unwrap_err();
        assert!(matches!(err, AdapterError::Io { .. }));
        assert!(err.to_string().contains("before_ftw.json"));
    }
}
