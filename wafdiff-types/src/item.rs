//! A single normalized observation.

use std::collections::BTreeSet;

use crate::Value;

/// One observation produced by a parser.
///
/// The `key` is the item's coordinate within its series: a timestamp for
/// resource samples, a rule/case identifier for rule-test results, or a
/// request name for load-test statistics. Labels are opaque tags used by
/// threshold include/exclude filters.
///
/// Items are built once and only handed out by shared reference afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataItem {
    pub key: String,
    pub value: Value,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeSet::is_empty"))]
    pub labels: BTreeSet<String>,
}

impl DataItem {
    /// Create an unlabelled item.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            labels: BTreeSet::new(),
        }
    }

    /// Attach labels to the item.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Returns true if the item carries the given label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Returns true if the item carries at least one of `labels`.
    pub fn has_any_label(&self, labels: &BTreeSet<String>) -> bool {
        // Iterate the smaller side; label sets are usually tiny.
        if self.labels.len() <= labels.len() {
            self.labels.iter().any(|l| labels.contains(l))
        } else {
            labels.iter().any(|l| self.labels.contains(l))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_labels() {
        let item = DataItem::new("920100-1", 0.12).with_labels(["920100-1", "920100"]);
        assert!(item.has_label("920100"));
        assert!(!item.has_label("942100"));
        assert!(item.has_any_label(&set(&["942100", "920100"])));
        assert!(!item.has_any_label(&set(&["942100"])));
        assert!(!item.has_any_label(&BTreeSet::new()));
    }

    #[test]
    fn test_duplicate_labels_collapse() {
        let item = DataItem::new("k", 1.0).with_labels(["a", "a", "b"]);
        assert_eq!(item.labels.len(), 2);
    }
}
