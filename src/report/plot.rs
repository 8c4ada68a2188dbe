//! Sparkline plots of time series.
//!
//! Items are keyed by RFC 3339 timestamps. The span between the first and
//! last item is mapped linearly onto [`BUCKETS`] buckets, empty buckets are
//! forward-filled, and the result is drawn as a ratatui [`Sparkline`] into an
//! off-screen buffer which is then read back as text.

use chrono::{DateTime, FixedOffset};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Sparkline, Widget};
use wafdiff_types::DataItem;

use super::{RenderError, Surface, Theme};

/// Number of buckets a series is compressed into (positions 0 through 100).
pub const BUCKETS: usize = 101;

/// Lines taken by everything around the plot body.
const CHROME_LINES: u16 = 7;

/// Resolution of the sparkline bars.
const LEVELS: u64 = 1000;

/// Map items to buckets by their timestamp keys.
///
/// When several items land in one bucket the last one wins. A series whose
/// timestamps are all equal lands entirely in bucket 0.
pub fn bucketize(metric: &str, items: &[DataItem]) -> Result<Vec<Option<f64>>, RenderError> {
    let mut buckets = vec![None; BUCKETS];
    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return Ok(buckets);
    };

    let start = parse_timestamp(&first.key)?;
    let span = (parse_timestamp(&last.key)? - start).num_milliseconds() as f64;

    for item in items {
        let value = item.value.as_f64().ok_or_else(|| RenderError::NonNumeric {
            metric: metric.to_string(),
            key: item.key.clone(),
        })?;
        let offset = (parse_timestamp(&item.key)? - start).num_milliseconds() as f64;
        let position = if span > 0.0 {
            (offset / span * (BUCKETS - 1) as f64).round().clamp(0.0, (BUCKETS - 1) as f64)
        } else {
            0.0
        };
        buckets[position as usize] = Some(value);
    }
    Ok(buckets)
}

/// Fill empty buckets with the previous value.
///
/// Leading empty buckets take the first available value; an all-empty input
/// yields an empty output.
pub fn forward_fill(buckets: &[Option<f64>]) -> Vec<f64> {
    let mut last = buckets.iter().flatten().next().copied();
    buckets
        .iter()
        .filter_map(|bucket| {
            if bucket.is_some() {
                last = *bucket;
            }
            last
        })
        .collect()
}

fn parse_timestamp(key: &str) -> Result<DateTime<FixedOffset>, RenderError> {
    DateTime::parse_from_rfc3339(key).map_err(|e| RenderError::InvalidTimestamp {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Render a titled plot of one series.
///
/// The surface is checked against `minimum` before anything is drawn; the
/// plot body is `surface.lines - 7` lines tall.
pub fn render_plot(
    title: &str,
    items: &[DataItem],
    theme: &Theme,
    surface: Surface,
    minimum: Surface,
) -> Result<String, RenderError> {
    surface.require(minimum)?;

    let values = forward_fill(&bucketize(title, items)?);
    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return Err(RenderError::EmptySeries {
            metric: title.to_string(),
        });
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let height = surface.lines.saturating_sub(CHROME_LINES).max(1);
    let rows = draw(&levels(&values, min, max), height);

    let top = format!("{:.2}", max);
    let bottom = format!("{:.2}", min);
    let label_width = top.len().max(bottom.len());

    let mut out = String::new();
    out.push_str(&theme.bold(title_line(title, surface.columns), theme.title));
    out.push('\n');
    out.push_str(&theme.paint(
        "Note: the text plot is a coarse view of the series and hides short spikes.",
        theme.warning,
    ));
    out.push_str("\n\n");

    let last_row = rows.len().saturating_sub(1);
    for (i, row) in rows.iter().enumerate() {
        let label = match i {
            0 => top.as_str(),
            i if i == last_row => bottom.as_str(),
            _ => "",
        };
        let tick = if i == 0 || i == last_row { '┤' } else { '│' };
        out.push_str(&format!("{:>width$} {}", label, tick, width = label_width));
        out.push_str(&theme.paint(row.trim_end(), theme.accent));
        out.push('\n');
    }

    out.push_str(&format!("{:>width$} └{}\n", "", "─".repeat(BUCKETS), width = label_width));
    let range = format!("{} .. {}", first.key, last.key);
    out.push_str(&format!("{:>width$}  {}\n", "", range, width = label_width));
    Ok(out)
}

fn title_line(title: &str, columns: u16) -> String {
    let spacer = (columns as usize).saturating_sub(title.chars().count() + 4) / 2;
    format!("{}  {}  {}", "=".repeat(spacer), title, "=".repeat(spacer))
}

/// Scale values onto `0..=LEVELS`. A flat series sits at half height.
fn levels(values: &[f64], min: f64, max: f64) -> Vec<u64> {
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span > 0.0 {
                ((v - min) / span * LEVELS as f64).round() as u64
            } else {
                LEVELS / 2
            }
        })
        .collect()
}

/// Draw the bars into an off-screen buffer and read the rows back.
fn draw(levels: &[u64], height: u16) -> Vec<String> {
    let area = Rect::new(0, 0, BUCKETS as u16, height);
    let mut buffer = Buffer::empty(area);
    Sparkline::default().data(levels).max(LEVELS).render(area, &mut buffer);

    (0..height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()).unwrap_or(" "))
                .collect()
        })
        .collect()
}
