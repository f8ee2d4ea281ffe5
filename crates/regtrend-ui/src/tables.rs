//! Growth and pivot tables for the dashboard.
//!
//! Renders bordered [`ratatui::widgets::Table`]s: period totals with their
//! growth column, and category/maker by year pivots with a trailing growth
//! column.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use regtrend_core::formatting::{format_count, format_growth};
use regtrend_data::aggregator::{GrowthRow, YearPivot};

use crate::themes::Theme;

/// Widest key column, in terminal cells.
const MAX_KEY_WIDTH: usize = 32;

/// Cut `s` to at most `max` display cells, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn stripe(theme: &Theme, i: usize) -> ratatui::style::Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

fn block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {title} "))
}

/// Period totals with a growth column and a totals row.
///
/// `period_header` is `"Year"` or `"Quarter"`, `growth_header` the label of
/// the percentage column.
pub fn render_growth_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    headers: (&str, &str),
    rows: &[GrowthRow],
    theme: &Theme,
) {
    let (period_header, growth_header) = headers;
    let header = Row::new(
        [period_header, "Registrations", growth_header]
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    );

    let mut body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.period.clone()),
                Cell::from(format_count(row.registrations)),
                Cell::from(format_growth(row.growth)).style(theme.growth_style(row.growth)),
            ])
            .style(stripe(theme, i))
        })
        .collect();

    let total: i64 = rows.iter().map(|r| r.registrations).sum();
    body.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format_count(total)),
            Cell::from(format!("{} periods", rows.len())),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(14),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(block(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Key x year pivot with a trailing growth column.
///
/// The first `skip` rows are scrolled off the top.
pub fn render_pivot_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    key_header: &str,
    pivot: &YearPivot,
    skip: usize,
    theme: &Theme,
) {
    let mut header_cells = vec![Cell::from(key_header.to_string()).style(theme.table_header)];
    header_cells.extend(
        pivot
            .years
            .iter()
            .map(|y| Cell::from(y.to_string()).style(theme.table_header)),
    );
    header_cells.push(Cell::from("YoY Growth").style(theme.table_header));

    let key_width = pivot
        .rows
        .iter()
        .map(|r| r.key.width())
        .max()
        .unwrap_or(0)
        .max(key_header.width())
        .min(MAX_KEY_WIDTH);

    let body: Vec<Row> = pivot
        .rows
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, row)| {
            let mut cells = vec![Cell::from(truncate_to_width(&row.key, key_width))];
            cells.extend(row.values.iter().map(|v| Cell::from(format_count(*v))));
            cells.push(Cell::from(format_growth(row.growth)).style(theme.growth_style(row.growth)));
            Row::new(cells).style(stripe(theme, i))
        })
        .collect();

    let mut widths = vec![Constraint::Length(key_width as u16)];
    widths.extend(pivot.years.iter().map(|_| Constraint::Length(12)));
    widths.push(Constraint::Length(12));

    let table = Table::new(body, widths)
        .header(Row::new(header_cells))
        .block(block(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Placeholder shown when the current filters leave no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No registrations match the current filters", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Toggle categories with 2/3/4, clear makers with 'c' or press 'r' to reset.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(block("Vehicle Registrations", theme)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
