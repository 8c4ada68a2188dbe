//! # wafdiff
//!
//! Before/after reports for changes to a rule-driven filtering service such
//! as a WAF running a rule set.
//!
//! Collector output captured before and after a change is parsed into two
//! [`MetricStore`]s. Declarative [`Threshold`] rules then decide whether the
//! change regressed any tracked metric, and the stores and verdicts are
//! rendered as text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                              app                                 │
//! │  ┌──────────┐    ┌────────────┐    ┌───────────┐    ┌─────────┐  │
//! │  │  source  │───▶│ MetricStore│───▶│ threshold │───▶│ report  │  │
//! │  │ (files)  │    │  (types)   │    │ (engine)  │    │ (text)  │  │
//! │  └──────────┘    └────────────┘    └───────────┘    └─────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the supported collectors ([`Tool`]) and where their output
//!   lives on disk
//! - **[`threshold`]**: threshold configuration and the evaluation engine
//! - **[`report`]**: diff tables, sparkline plots and verdict summaries
//! - **[`app`]**: a whole report run, from files to verdicts and JSON export
//! - **[`settings`]**: layered settings for the binary
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Compare go-ftw and Locust output under ./data/nightly
//! wafdiff --test-name nightly --utils ftw,locust --threshold-conf ./thresholds
//!
//! # Write every threshold outcome to a JSON file as well
//! wafdiff --test-name nightly --utils cAdvisor --export outcomes.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use wafdiff::threshold::{evaluate_stores, parse_thresholds};
//! use wafdiff::{MetricStore, RunState};
//!
//! let before = MetricStore::builder(RunState::Before)
//!     .series("cpu_total", |s| s.number("t0", 10.0))
//!     .build();
//! let after = MetricStore::builder(RunState::After)
//!     .series("cpu_total", |s| s.number("t0", 20.0))
//!     .build();
//!
//! let thresholds = parse_thresholds(
//!     r#"[{"id": 1, "threshold_name": "cpu", "threshold_desc": "",
//!          "comparison_unit": "EACH", "comparison_method": "ratioGt",
//!          "comparison_object": "BEFORE", "metric_name": "cpu_total",
//!          "threshold": 1.0}]"#,
//!     std::path::Path::new("inline"),
//! )?;
//!
//! // after / before = 2.0, and 1.0 > 2.0 does not hold
//! let verdict = evaluate_stores(&thresholds[0], &before, &after)?;
//! assert!(!verdict.passed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod report;
pub mod settings;
pub mod source;
pub mod threshold;

// Re-export main types for convenience
pub use app::{run_report, ReportFormat, ReportOptions, ReportRun, Status, ThresholdOutcome};
pub use report::{ColorMode, Diagnostics, RenderError, Surface, Theme};
pub use settings::Settings;
pub use source::{RunData, RunDir, Tool};
pub use threshold::{evaluate, evaluate_stores, EvalError, Threshold, Verdict};
pub use wafdiff_types::{DataItem, MetricSeries, MetricStore, RunState, Value};
