//! Main application state and TUI event loop for the registration dashboard.
//!
//! [`App`] owns the theme, the active tab, the maker picker cursor and the
//! [`DashboardSession`]. Key presses are translated into session
//! interactions; every interaction recomputes the view before the next draw.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};

use regtrend_core::formatting::format_count;
use regtrend_core::models::Category;
use regtrend_runtime::session::DashboardSession;

use crate::charts;
use crate::components::filter_bar::FilterBar;
use crate::components::header::Header;
use crate::tables;
use crate::themes::Theme;

const HELP: &str = " Tab switch view · 2/3/4 categories · ↑↓ Space makers · c clear makers · [ ] start · { } end · r reset · R reload · q quit";

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which group of widgets is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Total and per-category trend lines.
    Trends,
    /// Yearly totals, YoY bars and the category pivot.
    Yearly,
    /// Quarterly totals and QoQ bars.
    Quarterly,
    /// Maker picker and the maker pivot.
    Makers,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Trends, Tab::Yearly, Tab::Quarterly, Tab::Makers];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Trends => "Trends",
            Tab::Yearly => "Yearly",
            Tab::Quarterly => "Quarterly",
            Tab::Makers => "Makers",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    /// Highlighted entry of the maker picker.
    pub maker_cursor: usize,
    /// Rows of the maker pivot scrolled off the top.
    pub pivot_scroll: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// One-line message for the footer, e.g. a failed reload.
    pub status: Option<String>,
    session: DashboardSession,
}

impl App {
    pub fn new(theme_name: &str, session: DashboardSession) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::Trends,
            maker_cursor: 0,
            pivot_scroll: 0,
            should_quit: false,
            status: None,
            session,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q` / `Ctrl+C`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the session and UI state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,

            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),

            KeyCode::Char('2') => self.session.toggle_category(Category::TwoWheeler),
            KeyCode::Char('3') => self.session.toggle_category(Category::ThreeWheeler),
            KeyCode::Char('4') => self.session.toggle_category(Category::FourWheeler),

            KeyCode::Up => self.maker_cursor = self.maker_cursor.saturating_sub(1),
            KeyCode::Down => {
                let last = self.session.makers().len().saturating_sub(1);
                self.maker_cursor = (self.maker_cursor + 1).min(last);
            }
            KeyCode::Char(' ') => {
                if let Some(maker) = self.session.makers().get(self.maker_cursor).cloned() {
                    self.session.toggle_maker(&maker);
                    self.pivot_scroll = 0;
                }
            }
            KeyCode::Char('c') => {
                self.session.clear_makers();
                self.pivot_scroll = 0;
            }
            KeyCode::PageDown => {
                let rows = self.session.view().maker_pivot.rows.len();
                self.pivot_scroll = (self.pivot_scroll + 10).min(rows.saturating_sub(1));
            }
            KeyCode::PageUp => self.pivot_scroll = self.pivot_scroll.saturating_sub(10),

            KeyCode::Char('[') => self.session.shift_start(-1),
            KeyCode::Char(']') => self.session.shift_start(1),
            KeyCode::Char('{') => self.session.shift_end(-1),
            KeyCode::Char('}') => self.session.shift_end(1),

            KeyCode::Char('r') => {
                self.session.reset();
                self.pivot_scroll = 0;
                self.status = None;
            }
            KeyCode::Char('R') => self.reload(),
            _ => {}
        }
    }

    fn reload(&mut self) {
        self.status = match self.session.reload() {
            Ok(true) => Some("Reloaded changed data file".to_string()),
            Ok(false) => Some("Data file unchanged".to_string()),
            Err(e) => Some(format!("Reload failed: {e}")),
        };
        let last = self.session.makers().len().saturating_sub(1);
        self.maker_cursor = self.maker_cursor.min(last);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let view = self.session.view();
        let header = Header::new(
            view.row_count,
            format_count(view.total_registrations),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);
        frame.render_widget(
            Paragraph::new(FilterBar::new(self.session.selection(), &self.theme).to_line()),
            chunks[1],
        );

        let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(self.tab.index())
                .style(self.theme.tab)
                .highlight_style(self.theme.tab_active)
                .divider(" | "),
            chunks[2],
        );

        let body = chunks[3];
        match self.tab {
            Tab::Makers => self.render_makers(frame, body),
            _ if view.is_empty() => tables::render_no_data(frame, body, &self.theme),
            Tab::Trends => self.render_trends(frame, body),
            Tab::Yearly => self.render_yearly(frame, body),
            Tab::Quarterly => self.render_quarterly(frame, body),
        }

        let footer = match &self.status {
            Some(msg) => Span::styled(format!(" {msg}"), self.theme.warning),
            None => Span::styled(HELP, self.theme.dim),
        };
        frame.render_widget(Paragraph::new(Line::from(footer)), chunks[4]);
    }

    fn render_trends(&self, frame: &mut Frame, area: Rect) {
        let view = self.session.view();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        charts::render_total_trend(frame, rows[0], &view.total_by_date, &self.theme);
        charts::render_category_trend(frame, rows[1], &view.by_category, &self.theme);
    }

    fn render_yearly(&self, frame: &mut Frame, area: Rect) {
        let view = self.session.view();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(0)])
            .split(rows[0]);

        tables::render_growth_table(
            frame,
            top[0],
            "YoY Growth (%)",
            ("Year", "YoY Growth"),
            &view.yearly,
            &self.theme,
        );
        charts::render_growth_bars(frame, top[1], "Total YoY Growth %", &view.yearly, &self.theme);
        tables::render_pivot_table(
            frame,
            rows[1],
            "Registrations by Category and Year",
            "Category",
            &view.category_pivot,
            0,
            &self.theme,
        );
    }

    fn render_quarterly(&self, frame: &mut Frame, area: Rect) {
        let view = self.session.view();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(0)])
            .split(area);
        tables::render_growth_table(
            frame,
            cols[0],
            "QoQ Growth (%)",
            ("Quarter", "QoQ Growth"),
            &view.quarterly,
            &self.theme,
        );
        charts::render_growth_bars(frame, cols[1], "Total QoQ Growth %", &view.quarterly, &self.theme);
    }

    fn render_makers(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        let selected = &self.session.selection().makers;
        let items: Vec<ListItem> = self
            .session
            .makers()
            .iter()
            .map(|m| {
                let mark = if selected.contains(m) { "[x]" } else { "[ ]" };
                ListItem::new(format!(
                    "{mark} {}",
                    tables::truncate_to_width(m, cols[0].width.saturating_sub(8) as usize)
                ))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Manufacturers "),
            )
            .style(self.theme.text)
            .highlight_style(self.theme.highlight);
        let mut state = ListState::default().with_selected(Some(self.maker_cursor));
        frame.render_stateful_widget(list, cols[0], &mut state);

        let view = self.session.view();
        if view.is_empty() {
            tables::render_no_data(frame, cols[1], &self.theme);
        } else {
            tables::render_pivot_table(
                frame,
                cols[1],
                "Registrations by Maker and Year",
                "Maker",
                &view.maker_pivot,
                self.pivot_scroll,
                &self.theme,
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
