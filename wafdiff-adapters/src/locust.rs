//! Locust load-test statistics.
//!
//! `locust --csv=<prefix>` writes `<prefix>_stats.csv`: one row per request
//! entry followed by an aggregate row. Every statistic column becomes its own
//! metric whose items are keyed by the row's `Type` cell (the request method),
//! so a before/after pair of stores lines up column by column in a diff table.
//! A row whose type was already seen is keyed `"<type> <name>"` instead, and
//! the final row is always keyed [`AGGREGATED`].

use std::collections::HashSet;

use wafdiff_types::{DataItem, MetricStore, RunState};

use crate::{Adapter, AdapterError};

/// Statistic columns, in file order after the `Type` and `Name` columns.
pub const STATS: [&str; 20] = [
    "req_cnt",
    "req_fail_cnt",
    "median_resp_time",
    "avg_resp_time",
    "min_resp_time",
    "max_resp_time",
    "avg_content_size",
    "req/sec",
    "fail/sec",
    "p50",
    "p66",
    "p75",
    "p80",
    "p90",
    "p95",
    "p98",
    "p99",
    "p99.9",
    "p99.99",
    "p100",
];

/// Key of the aggregate row.
pub const AGGREGATED: &str = "Aggregated";

/// Number of leading identity columns (`Type`, `Name`).
const ID_COLUMNS: usize = 2;

/// Adapter for Locust `*_stats.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocustAdapter;

impl Adapter for LocustAdapter {
    fn name(&self) -> &'static str {
        "locust"
    }

    fn parse(&self, content: &str, state: RunState) -> Result<MetricStore, AdapterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.len() < ID_COLUMNS + STATS.len() {
            return Err(AdapterError::MissingField(format!(
                "expected {} columns, header has {}",
                ID_COLUMNS + STATS.len(),
                headers.len()
            )));
        }

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        let mut store = MetricStore::new(state);
        for stat in STATS {
            store.ensure(stat);
        }

        let mut seen = HashSet::new();
        for (row, record) in records.iter().enumerate() {
            let req_type = record.get(0).unwrap_or_default();
            let name = record.get(1).unwrap_or_default();

            // The final row is always the aggregate, whatever its Type cell says
            let (key, labels) = if row == records.len() - 1 {
                (AGGREGATED.to_string(), vec![AGGREGATED.to_string()])
            } else {
                let key = if seen.contains(req_type) {
                    tracing::warn!(
                        "locust: duplicate request type {:?}, keying row by {:?}",
                        req_type,
                        name
                    );
                    format!("{} {}", req_type, name)
                } else {
                    req_type.to_string()
                };
                (key, vec![req_type.to_string(), name.to_string()])
            };
            seen.insert(key.clone());

            for (col, stat) in STATS.iter().enumerate() {
                let cell = record.get(ID_COLUMNS + col).unwrap_or_default().trim();
                match cell.parse::<f64>() {
                    Ok(value) => store.push(
                        stat,
                        DataItem::new(key.as_str(), value).with_labels(labels.iter().cloned()),
                    ),
                    Err(_) => {
                        tracing::debug!("locust: skipping {} for {:?}: {:?}", stat, key, cell);
                    }
                }
            }
        }

        Ok(store)
    }
}
