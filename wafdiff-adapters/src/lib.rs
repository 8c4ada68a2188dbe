//! # wafdiff-adapters
//!
//! Parsers that turn the raw output of WAF test collectors into normalized
//! [`MetricStore`]s.
//!
//! Collection itself (launching go-ftw, driving Locust, scraping cAdvisor)
//! happens elsewhere; these adapters only read the files those tools leave
//! behind.
//!
//! ## Supported Collectors
//!
//! - **go-ftw** (`ftw` feature) - Rule-test pass/fail identifiers and per-rule
//!   runtimes from `go-ftw run -o json`
//! - **Locust** (`locust` feature) - Per-request load-test statistics from
//!   `locust --csv`
//! - **cAdvisor** (`cadvisor` feature) - CPU and memory time series for the WAF
//!   container
//!
//! ## Quick Start
//!
//! ```rust
//! use wafdiff_adapters::{ftw::FtwAdapter, Adapter};
//! use wafdiff_types::RunState;
//!
//! let json = r#"{"run": 2, "success": ["920100-1"], "failed": ["942100-1"],
//!                "skipped": [], "runtime": {"920100-1": 0.1, "942100-1": 0.3},
//!                "TotalTime": 0.4}"#;
//!
//! let store = FtwAdapter.parse(json, RunState::Before)?;
//! assert_eq!(store.items("failed").len(), 1);
//! # Ok::<(), wafdiff_adapters::AdapterError>(())
//! ```

use std::fs;
use std::path::Path;

use wafdiff_types::{MetricStore, RunState};

pub mod error;

#[cfg(feature = "ftw")]
pub mod ftw;

#[cfg(feature = "locust")]
pub mod locust;

#[cfg(feature = "cadvisor")]
pub mod cadvisor;

pub use error::AdapterError;

// Re-export types for convenience
pub use wafdiff_types::{DataItem, MetricSeries, Value};

/// A parser for one collector's output format.
pub trait Adapter {
    /// Short human-readable name of the collector.
    fn name(&self) -> &'static str;

    /// Parse a collector document captured in the given run-state.
    fn parse(&self, content: &str, state: RunState) -> Result<MetricStore, AdapterError>;

    /// Read and parse a collector output file.
    fn load(&self, path: &Path, state: RunState) -> Result<MetricStore, AdapterError> {
        let content = fs::read_to_string(path).map_err(|source| AdapterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = self.parse(&content, state)?;
        tracing::debug!(
            "{}: parsed {} metrics from {}",
            self.name(),
            store.len(),
            path.display()
        );
        Ok(store)
    }
}
