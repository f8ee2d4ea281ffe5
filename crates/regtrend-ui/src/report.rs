//! Plain-text rendition of the dashboard for non-interactive use.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;

use regtrend_core::formatting::{format_count, format_growth};
use regtrend_data::aggregator::{CategorySeries, GrowthRow, SeriesPoint, YearPivot};
use regtrend_data::filter::FilterSelection;
use regtrend_runtime::session::DashboardView;
use unicode_width::UnicodeWidthStr;

use crate::tables::truncate_to_width;

const KEY_WIDTH: usize = 32;

/// Render every table of `view` as text.
pub fn render_report(view: &DashboardView, selection: &FilterSelection) -> String {
    let mut out = String::new();
    let categories: Vec<String> = selection.categories.iter().map(|c| c.to_string()).collect();
    let makers = if selection.makers.is_empty() {
        "all".to_string()
    } else {
        selection.makers.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    let _ = writeln!(out, "VEHICLE REGISTRATION REPORT");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Categories: {}", categories.join(", "));
    let _ = writeln!(out, "Makers:     {makers}");
    let _ = writeln!(
        out,
        "Range:      {} .. {}",
        selection.start.format("%Y-%m"),
        selection.end.format("%Y-%m")
    );
    let _ = writeln!(
        out,
        "Rows:       {} ({} registrations)",
        view.row_count,
        format_count(view.total_registrations)
    );

    if view.is_empty() {
        let _ = writeln!(out, "\nNo registrations match the current filters.");
        return out;
    }

    section(&mut out, "Total Registrations by Month");
    monthly(&mut out, &view.total_by_date);

    section(&mut out, "Registrations by Category and Month");
    category_monthly(&mut out, &view.by_category);

    section(&mut out, "YoY Growth (%)");
    growth(&mut out, "Year", "YoY Growth", &view.yearly);

    section(&mut out, "Registrations by Category and Year");
    pivot(&mut out, "Category", &view.category_pivot);

    section(&mut out, "Registrations by Maker and Year");
    pivot(&mut out, "Maker", &view.maker_pivot);

    section(&mut out, "QoQ Growth (%)");
    growth(&mut out, "Quarter", "QoQ Growth", &view.quarterly);

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.len()));
}

fn monthly(out: &mut String, points: &[SeriesPoint]) {
    let _ = writeln!(out, "{:<10}{:>14}", "Month", "Registrations");
    for p in points {
        let _ = writeln!(
            out,
            "{:<10}{:>14}",
            p.date.format("%Y-%m").to_string(),
            format_count(p.registrations)
        );
    }
}

/// One column per category; a month a category has no rows in reads 0.
fn category_monthly(out: &mut String, series: &[CategorySeries]) {
    let mut months: BTreeMap<NaiveDate, Vec<i64>> = BTreeMap::new();
    for (i, s) in series.iter().enumerate() {
        for p in &s.points {
            months.entry(p.date).or_insert_with(|| vec![0; series.len()])[i] += p.registrations;
        }
    }

    let _ = write!(out, "{:<10}", "Month");
    for s in series {
        let _ = write!(out, "{:>14}", s.category.to_string());
    }
    let _ = writeln!(out);
    for (date, values) in &months {
        let _ = write!(out, "{:<10}", date.format("%Y-%m").to_string());
        for v in values {
            let _ = write!(out, "{:>14}", format_count(*v));
        }
        let _ = writeln!(out);
    }
}

fn growth(out: &mut String, period_header: &str, growth_header: &str, rows: &[GrowthRow]) {
    let _ = writeln!(out, "{period_header:<10}{:>14}{growth_header:>14}", "Registrations");
    for row in rows {
        let _ = writeln!(
            out,
            "{:<10}{:>14}{:>14}",
            row.period,
            format_count(row.registrations),
            format_growth(row.growth)
        );
    }
}

fn pivot(out: &mut String, key_header: &str, pivot: &YearPivot) {
    let _ = write!(out, "{}", pad(key_header, KEY_WIDTH));
    for year in &pivot.years {
        let _ = write!(out, "{year:>12}");
    }
    let _ = writeln!(out, "{:>12}", "YoY Growth");

    for row in &pivot.rows {
        let _ = write!(out, "{}", pad(&truncate_to_width(&row.key, KEY_WIDTH), KEY_WIDTH));
        for v in &row.values {
            let _ = write!(out, "{:>12}", format_count(*v));
        }
        let _ = writeln!(out, "{:>12}", format_growth(row.growth));
    }
}

/// Left-align by display width; `{:<n}` counts chars, not cells.
fn pad(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(s.width())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrend_core::models::{Category, Month, RegistrationRecord};
    use regtrend_data::dataset::Dataset;

    fn dataset() -> Dataset {
        let rec = |maker: &str, cat, year, month, n| RegistrationRecord {
            maker: String::from(maker),
            month,
            registrations: Some(n),
            year,
            category: Some(cat),
        };
        Dataset::from_records(vec![
            rec("ABZO MOTORS PVT LTD", Category::TwoWheeler, 2023, Month::Jan, 100),
            rec("KIA", Category::FourWheeler, 2023, Month::Apr, 50),
            rec("ABZO MOTORS PVT LTD", Category::TwoWheeler, 2024, Month::Jan, 120),
            rec("KIA", Category::FourWheeler, 2024, Month::Feb, 0),
        ])
    }

    #[test]
    fn test_report_contains_every_section() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds);
        let view = DashboardView::compute(&sel.apply(&ds));
        let text = render_report(&view, &sel);

        assert!(text.starts_with("VEHICLE REGISTRATION REPORT\n"));
        assert!(text.contains("Categories: 2W, 4W"));
        assert!(text.contains("Makers:     all"));
        assert!(text.contains("Range:      2023-01 .. 2024-02"));
        for heading in [
            "Total Registrations by Month",
            "Registrations by Category and Month",
            "YoY Growth (%)",
            "Registrations by Category and Year",
            "Registrations by Maker and Year",
            "QoQ Growth (%)",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        // 150 -> 120
        assert!(text.contains("-20.00%"));
        // KIA 50 -> 0
        assert!(text.contains("-100.00%"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_category_monthly_zero_fills() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds);
        let view = DashboardView::compute(&sel.apply(&ds));
        let mut out = String::new();
        category_monthly(&mut out, &view.by_category);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("{:<10}{:>14}{:>14}", "Month", "2W", "4W"));
        assert_eq!(lines.len(), 5, "header plus four months");
        assert!(lines.contains(&format!("{:<10}{:>14}{:>14}", "2023-04", "0", "50").as_str()));
        assert!(lines.contains(&format!("{:<10}{:>14}{:>14}", "2024-01", "120", "0").as_str()));
    }

    #[test]
    fn test_report_empty_selection() {
        let ds = dataset();
        let mut sel = FilterSelection::defaults_for(&ds);
        sel.start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let view = DashboardView::compute(&sel.apply(&ds));
        let text = render_report(&view, &sel);
        assert!(text.contains("No registrations match the current filters."));
        assert!(!text.contains("YoY Growth"));
    }

    #[test]
    fn test_pivot_rows_align() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds).with_makers(["KIA".to_string()]);
        let view = DashboardView::compute(&sel.apply(&ds));
        let mut out = String::new();
        pivot(&mut out, "Maker", &view.maker_pivot);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width(), lines[1].width());
        assert!(lines[1].starts_with("KIA "));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("KIA", 5), "KIA  ");
        assert_eq!(pad("TOO LONG", 3), "TOO LONG");
    }
}
