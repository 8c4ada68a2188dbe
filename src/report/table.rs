//! Before/after diff tables.
//!
//! Rows are metrics, columns are item keys. Each cell shows the before value
//! and the change `after - before`, coloured by whether the change is an
//! improvement:
//!
//! ```text
//! metric          GET                Aggregated
//! --------------  -----------------  -----------------
//! avg_resp_time   6.5000 (+0.7500)   7.2000 (-0.2000)
//! ```

use std::collections::BTreeSet;

use wafdiff_types::{MetricSeries, MetricStore, RunState};

use super::{Diagnostics, RenderError, Theme};

/// Which sign of change counts as an improvement for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Latencies, failure counts: a decrease is good.
    #[default]
    LowerIsBetter,
    /// Throughput: an increase is good.
    HigherIsBetter,
}

const ROW_HEADER: &str = "metric";
const GAP: &str = "  ";

struct Cell {
    /// Unpainted text, used for width calculation.
    plain: String,
    painted: String,
}

impl Cell {
    fn text(text: impl Into<String>) -> Self {
        let plain = text.into();
        Self {
            painted: plain.clone(),
            plain,
        }
    }

    fn width(&self) -> usize {
        self.plain.chars().count()
    }
}

/// Render a diff table for the given row metrics.
///
/// Column keys present in only one store are left out, with a warning on
/// `diagnostics`. A row metric missing from either store is an error. Cells
/// whose key is absent from a row on either side render as `-`.
pub fn diff_table(
    before: &MetricStore,
    after: &MetricStore,
    rows: &[&str],
    direction: Direction,
    theme: &Theme,
    diagnostics: &mut Diagnostics,
) -> Result<String, RenderError> {
    let mut pairs = Vec::with_capacity(rows.len());
    for metric in rows {
        let b = lookup(before, metric)?;
        let a = lookup(after, metric)?;
        pairs.push((*metric, b, a));
    }

    let before_keys = ordered_keys(pairs.iter().map(|(_, b, _)| *b));
    let after_keys = ordered_keys(pairs.iter().map(|(_, _, a)| *a));
    let columns = shared_columns(&before_keys, &after_keys, diagnostics);

    let higher_is_better = direction == Direction::HigherIsBetter;
    let mut grid: Vec<Vec<Cell>> = Vec::with_capacity(pairs.len() + 1);
    let mut header = vec![Cell::text(ROW_HEADER)];
    header.extend(columns.iter().map(|key| Cell::text(*key)));
    grid.push(header);

    for (metric, b, a) in &pairs {
        let mut line = vec![Cell::text(*metric)];
        for key in &columns {
            let cell = match (b.find(key), a.find(key)) {
                (Some(bi), Some(ai)) => {
                    let non_numeric = || RenderError::NonNumeric {
                        metric: metric.to_string(),
                        key: key.to_string(),
                    };
                    let bv = bi.value.as_f64().ok_or_else(non_numeric)?;
                    let av = ai.value.as_f64().ok_or_else(non_numeric)?;
                    change_cell(bv, av - bv, higher_is_better, theme)
                }
                _ => Cell::text("-"),
            };
            line.push(cell);
        }
        grid.push(line);
    }

    Ok(layout(grid, theme))
}

fn lookup<'a>(store: &'a MetricStore, metric: &str) -> Result<&'a MetricSeries, RenderError> {
    store.get(metric).ok_or_else(|| RenderError::MissingRow {
        metric: metric.to_string(),
        state: store.state,
    })
}

/// Unique item keys across all series, in first-seen order.
fn ordered_keys<'a>(series: impl Iterator<Item = &'a MetricSeries>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    let mut keys = Vec::new();
    for s in series {
        for item in s.iter() {
            if seen.insert(item.key.as_str()) {
                keys.push(item.key.as_str());
            }
        }
    }
    keys
}

fn shared_columns<'a>(
    before: &[&'a str],
    after: &[&'a str],
    diagnostics: &mut Diagnostics,
) -> Vec<&'a str> {
    let after_set: BTreeSet<&str> = after.iter().copied().collect();
    let before_set: BTreeSet<&str> = before.iter().copied().collect();

    for key in before.iter().filter(|k| !after_set.contains(*k)) {
        diagnostics.warn(format!(
            "column {:?} only exists in the {} data, leaving it out",
            key,
            RunState::Before
        ));
    }
    for key in after.iter().filter(|k| !before_set.contains(*k)) {
        diagnostics.warn(format!(
            "column {:?} only exists in the {} data, leaving it out",
            key,
            RunState::After
        ));
    }

    before.iter().copied().filter(|k| after_set.contains(k)).collect()
}

fn change_cell(before: f64, change: f64, higher_is_better: bool, theme: &Theme) -> Cell {
    let base = format!("{:.4}", before);
    let delta = if change == 0.0 {
        format!("{:.4}", 0.0)
    } else {
        format!("{:+.4}", change)
    };
    let color = theme.change_color(change, higher_is_better);
    Cell {
        plain: format!("{} ({})", base, delta),
        painted: format!("{} ({})", base, theme.bold(&delta, color)),
    }
}

fn layout(grid: Vec<Vec<Cell>>, theme: &Theme) -> String {
    let columns = grid.first().map(Vec::len).unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| grid.iter().map(|row| row[c].width()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (r, row) in grid.iter().enumerate() {
        let mut line = String::new();
        for (c, cell) in row.iter().enumerate() {
            if c > 0 {
                line.push_str(GAP);
            }
            let pad = " ".repeat(widths[c] - cell.width());
            if r == 0 {
                let title = theme.bold(&cell.plain, theme.title);
                if c == 0 {
                    line.push_str(&title);
                    line.push_str(&pad);
                } else {
                    line.push_str(&pad);
                    line.push_str(&title);
                }
            } else if c == 0 {
                line.push_str(&cell.painted);
                line.push_str(&pad);
            } else {
                line.push_str(&pad);
                line.push_str(&cell.painted);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');

        if r == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join(GAP));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stores() -> (MetricStore, MetricStore) {
        let before = MetricStore::builder(RunState::Before)
            .series("avg_resp_time", |s| s.number("GET", 6.5).number("Aggregated", 7.2))
            .series("req_cnt", |s| s.number("GET", 120.0).number("Aggregated", 200.0))
            .build();
        let after = MetricStore::builder(RunState::After)
            .series("avg_resp_time", |s| s.number("GET", 7.25).number("Aggregated", 7.0))
            .series("req_cnt", |s| s.number("GET", 120.0).number("Aggregated", 210.0))
            .build();
        (before, after)
    }

    #[test]
    fn test_cells_show_after_minus_before() {
        let (before, after) = stores();
        let mut diagnostics = Diagnostics::new();
        let table = diff_table(
            &before,
            &after,
            &["avg_resp_time", "req_cnt"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut diagnostics,
        )
        .unwrap();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("metric"));
        assert!(lines[0].contains("GET"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("6.5000 (+0.7500)"));
        assert!(lines[2].contains("7.2000 (-0.2000)"));
        assert!(lines[3].contains("120.0000 (0.0000)"));
        assert!(lines[3].contains("200.0000 (+10.0000)"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_columns_are_aligned() {
        let (before, after) = stores();
        let table = diff_table(
            &before,
            &after,
            &["avg_resp_time", "req_cnt"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut Diagnostics::new(),
        )
        .unwrap();
        let lengths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(lengths.iter().all(|l| *l == lengths[1]));
    }

    #[test]
    fn test_mismatched_keys_warn_and_keep_shared() {
        let before = MetricStore::builder(RunState::Before)
            .series("req_cnt", |s| s.number("GET", 1.0).number("PUT", 2.0).number("Aggregated", 3.0))
            .build();
        let after = MetricStore::builder(RunState::After)
            .series("req_cnt", |s| s.number("GET", 1.0).number("POST", 5.0).number("Aggregated", 6.0))
            .build();

        let mut diagnostics = Diagnostics::new();
        let table = diff_table(
            &before,
            &after,
            &["req_cnt"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut diagnostics,
        )
        .unwrap();

        assert!(table.contains("GET"));
        assert!(table.contains("Aggregated"));
        assert!(!table.contains("PUT"));
        assert!(!table.contains("POST"));
        assert_eq!(diagnostics.warnings().len(), 2);
        assert!(diagnostics.warnings()[0].contains("PUT"));
        assert!(diagnostics.warnings()[1].contains("POST"));
    }

    #[test]
    fn test_missing_row_metric() {
        let (before, _) = stores();
        let after = MetricStore::builder(RunState::After)
            .series("req_cnt", |s| s.number("GET", 1.0))
            .build();
        let err = diff_table(
            &before,
            &after,
            &["avg_resp_time"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingRow { state: RunState::After, .. }));
    }

    #[test]
    fn test_cell_missing_on_one_side() {
        let before = MetricStore::builder(RunState::Before)
            .series("p50", |s| s.number("GET", 5.0))
            .series("req_cnt", |s| s.number("GET", 1.0).number("POST", 1.0))
            .build();
        let after = MetricStore::builder(RunState::After)
            .series("p50", |s| s)
            .series("req_cnt", |s| s.number("GET", 1.0).number("POST", 1.0))
            .build();
        let table = diff_table(
            &before,
            &after,
            &["p50", "req_cnt"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut Diagnostics::new(),
        )
        .unwrap();
        let p50 = table.lines().nth(2).unwrap();
        assert!(p50.starts_with("p50"));
        assert!(p50.trim_end().ends_with('-'));
    }

    #[test]
    fn test_non_numeric_cell() {
        let before = MetricStore::builder(RunState::Before)
            .series("failed", |s| s.text("caseID", "942100-1"))
            .build();
        let after = MetricStore::builder(RunState::After)
            .series("failed", |s| s.text("caseID", "942100-1"))
            .build();
        let err = diff_table(
            &before,
            &after,
            &["failed"],
            Direction::LowerIsBetter,
            &Theme::plain(),
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NonNumeric { .. }));
    }

    #[test]
    fn test_sources_are_untouched() {
        let (before, after) = stores();
        let snapshot = (before.clone(), after.clone());
        let _ = diff_table(
            &before,
            &after,
            &["req_cnt"],
            Direction::HigherIsBetter,
            &Theme::dark(),
            &mut Diagnostics::new(),
        );
        assert_eq!((before, after), snapshot);
    }
}
