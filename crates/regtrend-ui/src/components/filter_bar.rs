use ratatui::text::{Line, Span};
use regtrend_core::models::Category;
use regtrend_data::filter::FilterSelection;

use crate::themes::Theme;

/// One-line summary of the active filters.
///
/// `2W [x]  3W [ ]  4W [x]   Makers: all   Range: 2023-01 .. 2024-03`
pub struct FilterBar<'a> {
    pub selection: &'a FilterSelection,
    pub theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(selection: &'a FilterSelection, theme: &'a Theme) -> Self {
        Self { selection, theme }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for category in Category::ALL {
            let on = self.selection.categories.contains(&category);
            let style = if on {
                self.theme.category_style(category)
            } else {
                self.theme.dim
            };
            spans.push(Span::styled(
                format!("{category} [{}]  ", if on { "x" } else { " " }),
                style,
            ));
        }

        let makers = match self.selection.makers.len() {
            0 => "all".to_string(),
            1 => self
                .selection
                .makers
                .iter()
                .next()
                .cloned()
                .unwrap_or_default(),
            n => format!("{n} selected"),
        };
        spans.push(Span::styled(" Makers: ", self.theme.label));
        spans.push(Span::styled(makers, self.theme.value));

        spans.push(Span::styled("   Range: ", self.theme.label));
        spans.push(Span::styled(
            format!(
                "{} .. {}",
                self.selection.start.format("%Y-%m"),
                self.selection.end.format("%Y-%m")
            ),
            self.theme.value,
        ));

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn selection(makers: &[&str]) -> FilterSelection {
        FilterSelection {
            categories: [Category::TwoWheeler, Category::FourWheeler].into_iter().collect(),
            makers: makers.iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_filter_bar_text() {
        let theme = Theme::dark();
        let sel = selection(&[]);
        let line = FilterBar::new(&sel, &theme).to_line();
        assert_eq!(
            text(&line),
            "2W [x]  3W [ ]  4W [x]   Makers: all   Range: 2023-01 .. 2024-03"
        );
    }

    #[test]
    fn test_filter_bar_maker_count() {
        let theme = Theme::dark();
        let sel = selection(&["KIA"]);
        assert!(text(&FilterBar::new(&sel, &theme).to_line()).contains("Makers: KIA"));
        let sel = selection(&["KIA", "TATA MOTORS"]);
        assert!(text(&FilterBar::new(&sel, &theme).to_line()).contains("Makers: 2 selected"));
    }

    #[test]
    fn test_unselected_category_is_dim() {
        let theme = Theme::dark();
        let sel = selection(&[]);
        let line = FilterBar::new(&sel, &theme).to_line();
        assert_eq!(line.spans[1].style, theme.dim);
        assert_eq!(line.spans[0].style, theme.two_wheeler);
    }
}
