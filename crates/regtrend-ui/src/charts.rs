//! Line and bar charts for the trend and growth widgets.
//!
//! Months are plotted on a linear axis (`year * 12 + month0`) so gaps in the
//! data stay visible as gaps.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use regtrend_core::formatting::{format_count, format_growth};
use regtrend_data::aggregator::{CategorySeries, GrowthRow, SeriesPoint};

use crate::themes::Theme;

// ── Axis helpers ──────────────────────────────────────────────────────────────

/// Position of a month on the x axis.
pub fn month_index(date: NaiveDate) -> f64 {
    (date.year() * 12 + date.month0() as i32) as f64
}

/// `YYYY-MM` label for an x position.
pub fn month_label(index: f64) -> String {
    let i = index.round() as i32;
    format!("{}-{:02}", i.div_euclid(12), i.rem_euclid(12) + 1)
}

fn to_points(points: &[SeriesPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (month_index(p.date), p.registrations as f64))
        .collect()
}

/// x and y bounds over several series; y starts at zero.
fn bounds(series: &[Vec<(f64, f64)>]) -> ([f64; 2], [f64; 2]) {
    let all = series.iter().flatten();
    let (mut x_min, mut x_max, mut y_max) = (f64::MAX, f64::MIN, 0.0_f64);
    for &(x, y) in all {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }
    if x_min > x_max {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    if x_min == x_max {
        x_max += 1.0;
    }
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    ([x_min, x_max], [0.0, y_top])
}

fn x_labels(x: [f64; 2]) -> Vec<String> {
    vec![
        month_label(x[0]),
        month_label((x[0] + x[1]) / 2.0),
        month_label(x[1]),
    ]
}

fn y_labels(y: [f64; 2]) -> Vec<String> {
    vec![
        "0".to_string(),
        format_count((y[1] / 2.0).round() as i64),
        format_count(y[1].round() as i64),
    ]
}

// ── Line charts ───────────────────────────────────────────────────────────────

struct Series {
    name: String,
    style: Style,
    points: Vec<(f64, f64)>,
}

fn render_lines(frame: &mut Frame, area: Rect, title: &str, series: &[Series], theme: &Theme) {
    let raw: Vec<Vec<(f64, f64)>> = series.iter().map(|s| s.points.clone()).collect();
    let (x, y) = bounds(&raw);

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(s.style)
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .x_axis(
            Axis::default()
                .title("Month")
                .style(theme.label)
                .bounds(x)
                .labels(x_labels(x)),
        )
        .y_axis(
            Axis::default()
                .title("Registrations")
                .style(theme.label)
                .bounds(y)
                .labels(y_labels(y)),
        );

    frame.render_widget(chart, area);
}

/// Total registrations per month.
pub fn render_total_trend(frame: &mut Frame, area: Rect, points: &[SeriesPoint], theme: &Theme) {
    let series = [Series {
        name: "Total".to_string(),
        style: theme.total_series,
        points: to_points(points),
    }];
    render_lines(frame, area, "Total Registrations Trend", &series, theme);
}

/// One line per category.
pub fn render_category_trend(
    frame: &mut Frame,
    area: Rect,
    series: &[CategorySeries],
    theme: &Theme,
) {
    let series: Vec<Series> = series
        .iter()
        .map(|s| Series {
            name: s.category.to_string(),
            style: theme.category_style(s.category),
            points: to_points(&s.points),
        })
        .collect();
    render_lines(frame, area, "Registrations by Category", &series, theme);
}

// ── Growth bars ───────────────────────────────────────────────────────────────

/// Bar per period with height `|growth|`.
///
/// The signed value is printed on the bar; declines use the decline colour.
pub fn render_growth_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[GrowthRow],
    theme: &Theme,
) {
    let bars: Vec<Bar> = rows.iter().map(|row| growth_bar(row, theme)).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .bar_width(bar_width(area, rows.len()))
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn growth_bar<'a>(row: &GrowthRow, theme: &Theme) -> Bar<'a> {
    let style = theme.growth_style(row.growth);
    Bar::default()
        .value(row.growth.map_or(0, |g| g.abs().round() as u64))
        .text_value(format_growth(row.growth))
        .label(Line::from(row.period.clone()))
        .style(style)
        .value_style(style.add_modifier(Modifier::REVERSED))
}

/// Widest bar that fits every period, capped at 12 columns.
fn bar_width(area: Rect, bars: usize) -> u16 {
    let inner = area.width.saturating_sub(2);
    let per_bar = inner / (bars.max(1) as u16);
    per_bar.saturating_sub(1).clamp(1, 12)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
