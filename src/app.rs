//! The report command.
//!
//! A report run loads every requested tool's thresholds, then for each tool
//! loads the before/after collector output once, renders its section and
//! evaluates its thresholds:
//!
//! ```text
//! thresholds (all tools) ─▶ per tool: RunDir::load ─▶ render section
//!                                                  └▶ evaluate_stores ─▶ verdicts
//! ```
//!
//! Configuration errors stop the run before anything is evaluated. A tool
//! whose collector output cannot be loaded gets a skip line and an error
//! outcome for each of its thresholds; the other tools still run. Render
//! errors only drop the affected piece of output; evaluation errors only
//! affect their own threshold.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use wafdiff_adapters::{cadvisor, locust};
use wafdiff_types::{MetricStore, RunState};

use crate::report::{
    diff_table, ftw_run_summary, render_plot, verdict_line, Diagnostics, Direction, Surface,
    Theme,
};
use crate::source::{RunData, RunDir, Tool};
use crate::threshold::{
    evaluate_stores, load_thresholds, EvalError, ErrorClass, Failure, Threshold, Verdict,
};

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain or coloured text on stdout.
    #[default]
    Text,
    /// Image figures. Not implemented.
    Img,
}

/// Everything a report run needs to know.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub test_name: String,
    pub tools: Vec<Tool>,
    pub raw_output: PathBuf,
    /// Directory of `<tool>.threshold.json` files; no thresholds when unset.
    pub threshold_conf: Option<PathBuf>,
    pub format: ReportFormat,
    pub surface: Surface,
    pub minimum: Surface,
}

/// Result classification of one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Error,
}

/// One evaluated threshold.
#[derive(Debug, Clone)]
pub struct ThresholdOutcome {
    pub tool: Tool,
    pub threshold: Threshold,
    pub result: Result<Verdict, EvalError>,
}

impl ThresholdOutcome {
    pub fn status(&self) -> Status {
        match &self.result {
            Ok(verdict) if verdict.passed => Status::Passed,
            Ok(_) => Status::Failed,
            Err(_) => Status::Error,
        }
    }
}

/// Rendered output of one tool.
#[derive(Debug, Clone)]
pub struct Section {
    pub tool: Tool,
    pub text: String,
}

/// The outcome of a whole report run.
#[derive(Debug)]
pub struct ReportRun {
    pub test_name: String,
    pub sections: Vec<Section>,
    pub outcomes: Vec<ThresholdOutcome>,
    pub diagnostics: Diagnostics,
}

impl ReportRun {
    /// The full text report.
    pub fn text(&self) -> String {
        self.sections.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status() == status).count()
    }

    /// True when no threshold failed or errored.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.status() == Status::Passed)
    }

    /// The JSON export document.
    pub fn to_json(&self) -> Result<String> {
        let document = ExportDocument {
            test_name: &self.test_name,
            thresholds: self.outcomes.iter().map(ExportEntry::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write the JSON export document to `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write export file {}", path.display()))?;
        tracing::info!("exported {} threshold outcomes to {}", self.outcomes.len(), path.display());
        Ok(())
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    test_name: &'a str,
    thresholds: Vec<ExportEntry<'a>>,
}

#[derive(Serialize)]
struct ExportEntry<'a> {
    tool: &'static str,
    id: i64,
    name: &'a str,
    metric: &'a str,
    status: Status,
    failures: &'a [Failure],
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<ErrorClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a ThresholdOutcome> for ExportEntry<'a> {
    fn from(outcome: &'a ThresholdOutcome) -> Self {
        let (failures, error_class, error) = match &outcome.result {
            Ok(verdict) => (verdict.failures.as_slice(), None, None),
            Err(e) => (&[][..], Some(e.class()), Some(e.to_string())),
        };
        Self {
            tool: outcome.tool.name(),
            id: outcome.threshold.id,
            name: &outcome.threshold.name,
            metric: &outcome.threshold.metric_name,
            status: outcome.status(),
            failures,
            error_class,
            error,
        }
    }
}

/// Run a report.
pub fn run_report(options: &ReportOptions, theme: &Theme) -> Result<ReportRun> {
    if options.format == ReportFormat::Img {
        bail!("image reports are not implemented, use --format text");
    }

    // Every threshold file is read before any data is touched.
    let mut thresholds = Vec::with_capacity(options.tools.len());
    for tool in &options.tools {
        thresholds.push((*tool, tool_thresholds(*tool, options.threshold_conf.as_deref())?));
    }

    let run_dir = RunDir::new(&options.raw_output, &options.test_name);
    let mut run = ReportRun {
        test_name: options.test_name.clone(),
        sections: Vec::new(),
        outcomes: Vec::new(),
        diagnostics: Diagnostics::new(),
    };

    for (tool, rules) in thresholds {
        let mut text = theme.bold(format!("[{}]", tool), theme.title);
        text.push('\n');

        let data = match run_dir.load(tool) {
            Ok(data) => data,
            Err(e) => {
                let message = format!("{}: cannot load collector output: {}", tool, e);
                run.diagnostics.warn(message.clone());
                text.push_str(&message);
                text.push('\n');
                for threshold in rules {
                    let result = Err(EvalError::SourceUnavailable {
                        reason: e.to_string(),
                    });
                    text.push_str(&verdict_line(&threshold, &result, theme));
                    run.outcomes.push(ThresholdOutcome {
                        tool,
                        threshold,
                        result,
                    });
                }
                run.sections.push(Section { tool, text });
                continue;
            }
        };

        text.push_str(&render_section(tool, &data, options, theme, &mut run.diagnostics));

        match &data {
            RunData::Pair { before, after } => {
                for threshold in rules {
                    let result = evaluate_stores(&threshold, before, after);
                    if let Err(e) = &result {
                        tracing::warn!(
                            "{}: threshold {} ({}): {}",
                            tool,
                            threshold.id,
                            threshold.name,
                            e
                        );
                    }
                    text.push_str(&verdict_line(&threshold, &result, theme));
                    run.outcomes.push(ThresholdOutcome {
                        tool,
                        threshold,
                        result,
                    });
                }
            }
            RunData::Legacy(_) if !rules.is_empty() => {
                run.diagnostics.warn(format!(
                    "{}: only state-less output found in {}, skipping {} thresholds",
                    tool,
                    run_dir.path().display(),
                    rules.len()
                ));
            }
            RunData::Legacy(_) => {}
        }

        run.sections.push(Section { tool, text });
    }

    tracing::info!(
        "{}: {} passed, {} failed, {} errors",
        options.test_name,
        run.count(Status::Passed),
        run.count(Status::Failed),
        run.count(Status::Error)
    );
    Ok(run)
}

fn tool_thresholds(tool: Tool, dir: Option<&Path>) -> Result<Vec<Threshold>> {
    let Some(dir) = dir else {
        return Ok(Vec::new());
    };
    let path = dir.join(tool.threshold_file());
    Ok(load_thresholds(&path)?)
}

fn render_section(
    tool: Tool,
    data: &RunData,
    options: &ReportOptions,
    theme: &Theme,
    diagnostics: &mut Diagnostics,
) -> String {
    match (tool, data) {
        (Tool::Ftw, RunData::Legacy(store)) => ftw_run_summary(&options.test_name, store),
        (Tool::Ftw, RunData::Pair { before, after }) => [before, after]
            .iter()
            .map(|store| {
                format!(
                    "{}\n{}",
                    theme.bold(store.state, theme.title),
                    ftw_run_summary(&options.test_name, store)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        (Tool::Locust, RunData::Pair { before, after }) => {
            let rows = &locust::STATS;
            match diff_table(before, after, rows, Direction::LowerIsBetter, theme, diagnostics) {
                Ok(table) => table,
                Err(e) => skipped(tool, "diff table", &e, diagnostics),
            }
        }
        (Tool::CAdvisor, RunData::Pair { before, after }) => {
            let mut text = String::new();
            for metric in cadvisor::METRICS {
                for store in [before, after] {
                    match plot(metric, store, options, theme) {
                        Ok(plot) => text.push_str(&plot),
                        Err(e) => text.push_str(&skipped(tool, metric, &e, diagnostics)),
                    }
                }
            }
            text
        }
        (Tool::Locust | Tool::CAdvisor, RunData::Legacy(_)) => String::new(),
    }
}

fn plot(
    metric: &str,
    store: &MetricStore,
    options: &ReportOptions,
    theme: &Theme,
) -> Result<String, crate::report::RenderError> {
    let title = match store.state {
        RunState::Before => format!("{} (before)", metric),
        RunState::After => format!("{} (after)", metric),
    };
    render_plot(&title, store.items(metric), theme, options.surface, options.minimum)
}

fn skipped(
    tool: Tool,
    what: &str,
    error: &dyn std::fmt::Display,
    diagnostics: &mut Diagnostics,
) -> String {
    let message = format!("{}: cannot render {}: {}", tool, what, error);
    diagnostics.warn(message.clone());
    format!("{}\n", message)
}
