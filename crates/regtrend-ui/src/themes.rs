use ratatui::style::{Color, Modifier, Style};
use regtrend_core::models::Category;

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Anything else reads as dark.
pub fn detect_background() -> BackgroundType {
    background_from(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from(colorfgbg: Option<&str>) -> BackgroundType {
    match colorfgbg
        .and_then(|v| v.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok())
    {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Every style the dashboard widgets use.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── Tabs and selection ───────────────────────────────────────────────────
    pub tab: Style,
    pub tab_active: Style,
    pub highlight: Style,

    // ── Series ───────────────────────────────────────────────────────────────
    pub total_series: Style,
    pub two_wheeler: Style,
    pub three_wheeler: Style,
    pub four_wheeler: Style,
    pub growth_up: Style,
    pub growth_down: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            tab: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),

            total_series: Style::default().fg(Color::Cyan),
            two_wheeler: Style::default().fg(Color::Green),
            three_wheeler: Style::default().fg(Color::Yellow),
            four_wheeler: Style::default().fg(Color::Magenta),
            growth_up: Style::default().fg(Color::Green),
            growth_down: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Red),

            tab: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            highlight: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),

            total_series: Style::default().fg(Color::Blue),
            two_wheeler: Style::default().fg(Color::Green),
            three_wheeler: Style::default().fg(Color::Red),
            four_wheeler: Style::default().fg(Color::Magenta),
            growth_up: Style::default().fg(Color::Green),
            growth_down: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names auto-detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Line colour for a category series.
    pub fn category_style(&self, category: Category) -> Style {
        match category {
            Category::TwoWheeler => self.two_wheeler,
            Category::ThreeWheeler => self.three_wheeler,
            Category::FourWheeler => self.four_wheeler,
        }
    }

    /// Green for growth, red for decline, dim when undefined.
    pub fn growth_style(&self, growth: Option<f64>) -> Style {
        match growth {
            Some(g) if g < 0.0 => self.growth_down,
            Some(_) => self.growth_up,
            None => self.dim,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.growth_up.fg, Some(Color::Green));
        assert_eq!(t.growth_down.fg, Some(Color::Red));
        assert_eq!(t.table_total.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(Theme::from_name("auto").header.fg.is_some());
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from(Some("15;0")), BackgroundType::Dark);
        assert_eq!(background_from(Some("0;15")), BackgroundType::Light);
        assert_eq!(background_from(Some("garbage")), BackgroundType::Dark);
        assert_eq!(background_from(None), BackgroundType::Dark);
    }

    #[test]
    fn test_category_styles_are_distinct() {
        let t = Theme::dark();
        let colours: Vec<_> = Category::ALL
            .iter()
            .map(|c| t.category_style(*c).fg)
            .collect();
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
        assert_ne!(colours[0], colours[2]);
    }

    #[test]
    fn test_growth_style() {
        let t = Theme::dark();
        assert_eq!(t.growth_style(Some(12.0)).fg, Some(Color::Green));
        assert_eq!(t.growth_style(Some(0.0)).fg, Some(Color::Green));
        assert_eq!(t.growth_style(Some(-3.5)).fg, Some(Color::Red));
        assert_eq!(t.growth_style(None).fg, Some(Color::DarkGray));
    }
}
