use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header rendering three lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. `[ N rows | M registrations ]` for the current selection.
pub struct Header<'a> {
    /// Rows that passed the filter.
    pub rows: usize,
    /// Sum of registrations over those rows, already formatted.
    pub registrations: String,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(rows: usize, registrations: String, theme: &'a Theme) -> Self {
        Self {
            rows,
            registrations,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" VEHICLE REGISTRATION DASHBOARD ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(format!("{} rows", self.rows), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} registrations", self.registrations),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}
