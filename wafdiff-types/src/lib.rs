//! # wafdiff-types
//!
//! Normalized data model shared by every wafdiff component. Collector output
//! (rule-test results, load-test statistics, container resource samples) is
//! parsed into these types once, and everything downstream - threshold
//! evaluation, diff tables, plots - only ever reads them.
//!
//! ## Model
//!
//! - [`DataItem`]: one immutable observation (key, [`Value`], labels)
//! - [`MetricSeries`]: ordered items for one metric in one [`RunState`]
//! - [`MetricStore`]: all series collected for one run-state
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use wafdiff_types::{MetricStore, RunState, Value};
//!
//! let store = MetricStore::builder(RunState::Before)
//!     .series("cpu_total", |s| {
//!         s.number("2024-01-01T00:00:00Z", 1200.0)
//!          .number("2024-01-01T00:00:10Z", 1350.0)
//!     })
//!     .series("failed", |s| s.text("caseID", "942100-1").labels(["942100-1"]))
//!     .build();
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.get("cpu_total").unwrap().len(), 2);
//! assert_eq!(store.get("failed").unwrap().items()[0].value, Value::from("942100-1"));
//! ```

mod item;
mod series;
mod state;
mod value;

pub use item::*;
pub use series::*;
pub use state::*;
pub use value::*;
