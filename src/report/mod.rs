//! Text rendering of metric stores and threshold verdicts.
//!
//! Renderers return `String`s and never print; the caller decides where the
//! report goes. Warnings that do not abort a render step are recorded on a
//! [`Diagnostics`] handle owned by the caller.
//!
//! - [`table`]: before/after diff tables
//! - [`plot`]: bucketed sparkline plots of time series
//! - [`summary`]: threshold verdicts and go-ftw run summaries
//! - [`theme`]: colours, with light/dark terminal detection

pub mod plot;
pub mod summary;
pub mod table;
pub mod theme;

use thiserror::Error;
use wafdiff_types::RunState;

pub use plot::{bucketize, forward_fill, render_plot, BUCKETS};
pub use summary::{ftw_run_summary, verdict_line, verdict_summary};
pub use table::{diff_table, Direction};
pub use theme::{ColorMode, Theme};

/// Errors that abort a single render step.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(
        "terminal is too small: {columns}x{lines}, plots need at least {min_columns}x{min_lines}"
    )]
    TerminalTooSmall {
        columns: u16,
        lines: u16,
        min_columns: u16,
        min_lines: u16,
    },

    #[error("metric {metric:?} is missing from the {state} data")]
    MissingRow { metric: String, state: RunState },

    #[error("metric {metric:?} has no items to plot")]
    EmptySeries { metric: String },

    #[error("cannot plot key {key:?}: {reason}")]
    InvalidTimestamp { key: String, reason: String },

    #[error("metric {metric:?} has a non-numeric value at {key:?}")]
    NonNumeric { metric: String, key: String },
}

/// The character grid a report is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub columns: u16,
    pub lines: u16,
}

impl Surface {
    /// Smallest surface a plot is rendered on.
    pub const MINIMUM: Surface = Surface {
        columns: 120,
        lines: 12,
    };

    /// Assumed when the output is not a terminal.
    pub const FALLBACK: Surface = Surface {
        columns: 80,
        lines: 20,
    };

    pub fn new(columns: u16, lines: u16) -> Self {
        Self { columns, lines }
    }

    /// Check this surface against a minimum size.
    pub fn require(&self, minimum: Surface) -> Result<(), RenderError> {
        if self.columns < minimum.columns || self.lines < minimum.lines {
            return Err(RenderError::TerminalTooSmall {
                columns: self.columns,
                lines: self.lines,
                min_columns: minimum.columns,
                min_lines: minimum.lines,
            });
        }
        Ok(())
    }
}

/// Non-fatal warnings raised while rendering.
///
/// Every warning is also emitted through `tracing` at warn level.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_minimum() {
        assert!(Surface::new(120, 12).require(Surface::MINIMUM).is_ok());
        assert!(Surface::new(200, 50).require(Surface::MINIMUM).is_ok());

        let err = Surface::new(119, 40).require(Surface::MINIMUM).unwrap_err();
        assert!(matches!(err, RenderError::TerminalTooSmall { columns: 119, .. }));
        assert!(Surface::new(160, 11).require(Surface::MINIMUM).is_err());
        assert!(Surface::FALLBACK.require(Surface::MINIMUM).is_err());
    }

    #[test]
    fn test_diagnostics_collects_warnings() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.warn("key GET only in before data");
        diagnostics.warn(String::from("second"));
        assert_eq!(diagnostics.warnings().len(), 2);
        assert_eq!(diagnostics.warnings()[0], "key GET only in before data");
    }
}
