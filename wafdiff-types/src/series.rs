//! Metric series and the per-run metric store.

use std::collections::BTreeMap;

use crate::{DataItem, RunState, Value, ValueKind};

/// An ordered sequence of items for one metric in one run-state.
///
/// Insertion order is meaningful: chronological for time series, collection
/// order for everything else.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSeries {
    pub name: String,
    pub state: RunState,
    items: Vec<DataItem>,
}

impl MetricSeries {
    /// Create an empty series.
    pub fn new(name: impl Into<String>, state: RunState) -> Self {
        Self {
            name: name.into(),
            state,
            items: Vec::new(),
        }
    }

    /// Append an item. Only parsers call this while building a store.
    pub fn push(&mut self, item: DataItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Value kind of the first item, or `None` for an empty series.
    pub fn value_kind(&self) -> Option<ValueKind> {
        self.items.first().map(|i| i.value.kind())
    }

    /// Look up the first item with the given key.
    pub fn find(&self, key: &str) -> Option<&DataItem> {
        self.items.iter().find(|i| i.key == key)
    }
}

/// All metric series collected for one run-state, keyed by metric name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricStore {
    pub state: RunState,
    series: BTreeMap<String, MetricSeries>,
}

impl MetricStore {
    /// Create an empty store.
    pub fn new(state: RunState) -> Self {
        Self {
            state,
            series: BTreeMap::new(),
        }
    }

    /// Create a builder for constructing stores.
    pub fn builder(state: RunState) -> MetricStoreBuilder {
        MetricStoreBuilder::new(state)
    }

    /// Append an item to the named metric, creating the series if needed.
    pub fn push(&mut self, metric: &str, item: DataItem) {
        let state = self.state;
        self.series
            .entry(metric.to_string())
            .or_insert_with(|| MetricSeries::new(metric, state))
            .push(item);
    }

    /// Ensure a (possibly empty) series exists for the metric.
    pub fn ensure(&mut self, metric: &str) {
        let state = self.state;
        self.series.entry(metric.to_string()).or_insert_with(|| MetricSeries::new(metric, state));
    }

    /// Get the series for a metric.
    pub fn get(&self, metric: &str) -> Option<&MetricSeries> {
        self.series.get(metric)
    }

    /// Items of a metric, or an empty slice if the metric was never recorded.
    pub fn items(&self, metric: &str) -> &[DataItem] {
        self.series.get(metric).map(MetricSeries::items).unwrap_or(&[])
    }

    /// Convenience accessor for single-valued metrics.
    pub fn first_value(&self, metric: &str) -> Option<&Value> {
        self.series.get(metric)?.items().first().map(|i| &i.value)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.series.contains_key(metric)
    }

    /// Metric names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricSeries)> {
        self.series.iter()
    }

    /// Number of metrics in the store.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for `MetricStore`.
#[derive(Debug)]
pub struct MetricStoreBuilder {
    store: MetricStore,
}

impl MetricStoreBuilder {
    /// Create a new builder.
    pub fn new(state: RunState) -> Self {
        Self {
            store: MetricStore::new(state),
        }
    }

    /// Add a series built using a closure.
    pub fn series<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(SeriesBuilder) -> SeriesBuilder,
    {
        self.store.ensure(name);
        for item in f(SeriesBuilder::new()).items {
            self.store.push(name, item);
        }
        self
    }

    /// Add a single item to a series.
    pub fn item(mut self, name: &str, item: DataItem) -> Self {
        self.store.push(name, item);
        self
    }

    /// Build the store.
    pub fn build(self) -> MetricStore {
        self.store
    }
}

/// Builder for the items of one series.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    items: Vec<DataItem>,
}

impl SeriesBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numeric item.
    pub fn number(self, key: impl Into<String>, value: f64) -> Self {
        self.item(DataItem::new(key, value))
    }

    /// Append a string item.
    pub fn text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.item(DataItem::new(key, Value::Text(value.into())))
    }

    /// Append a prebuilt item.
    pub fn item(mut self, item: DataItem) -> Self {
        self.items.push(item);
        self
    }

    /// Attach labels to the most recently appended item.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(last) = self.items.pop() {
            self.items.push(last.with_labels(labels));
        }
        self
    }
}
