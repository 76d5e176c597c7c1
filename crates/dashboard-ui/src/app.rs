//! Main application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the theme, the view mode, the region picker state and the
//! current [`DashboardView`].  Every region change goes through the injected
//! [`RegionChangeHandler`]; the app never aggregates anything itself.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};

use dashboard_core::region::RegionFilter;
use dashboard_runtime::data::view_model::DashboardView;
use dashboard_runtime::service::RegionChangeHandler;

use crate::chart_view;
use crate::components::header::Header;
use crate::components::kpi_card::KpiCard;
use crate::components::region_picker::RegionPicker;
use crate::table_view;
use crate::themes::Theme;

// ── Terminal guard ────────────────────────────────────────────────────────────

/// Raw mode plus the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which main panel is shown below the KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Sales and quantity line charts.
    Dashboard,
    /// Daily aggregate table.
    Table,
}

impl ViewMode {
    pub fn from_name(name: &str) -> Self {
        match name {
            "table" => ViewMode::Table,
            _ => ViewMode::Dashboard,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Dashboard => ViewMode::Table,
            ViewMode::Table => ViewMode::Dashboard,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App<H: RegionChangeHandler> {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub should_quit: bool,
    handler: H,
    /// Picker options, `"all"` first.
    options: Vec<String>,
    selected: usize,
    view: DashboardView,
}

impl<H: RegionChangeHandler> App<H> {
    /// Build the app and compute the view for `initial`.
    ///
    /// A region absent from the data is still selectable; it is appended to
    /// the picker and shows an empty dashboard.
    pub fn new(theme_name: &str, view_mode: ViewMode, handler: H, initial: RegionFilter) -> Self {
        let view = handler.region_changed(initial.clone());
        let mut options = view.region_options();

        let wanted = initial.to_string();
        let selected = match options.iter().position(|o| *o == wanted) {
            Some(i) => i,
            None => {
                options.push(wanted);
                options.len() - 1
            }
        };

        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            should_quit: false,
            handler,
            options,
            selected,
            view,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_region(&self) -> &str {
        &self.options[self.selected]
    }

    // ── Region selection ──────────────────────────────────────────────────────

    /// Select option `index` and recompute the view.  Re-selecting the
    /// current option or an out-of-range index does nothing.
    pub fn select(&mut self, index: usize) {
        if index == self.selected || index >= self.options.len() {
            return;
        }
        self.selected = index;
        let filter = RegionFilter::parse(&self.options[index]);
        self.view = self.handler.region_changed(filter);
    }

    pub fn next_region(&mut self) {
        let next = (self.selected + 1) % self.options.len();
        self.select(next);
    }

    pub fn prev_region(&mut self) {
        let len = self.options.len();
        self.select((self.selected + len - 1) % len);
    }

    pub fn select_all(&mut self) {
        self.select(0);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next_region(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.prev_region(),
            KeyCode::Char('a') => self.select_all(),
            KeyCode::Char('t') => self.view_mode = self.view_mode.toggled(),
            _ => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// responsive, and yields to the runtime after every tick.  The terminal
    /// is restored when this future finishes or is dropped.
    pub async fn run(mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let tick_rate = Duration::from_millis(250);

        self.pump(|app| {
            terminal.draw(|frame| app.render(frame))?;
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    app.handle_key(key);
                }
            }
            Ok(())
        })
        .await
    }

    /// Call `step` until the app wants to quit.
    async fn pump<F>(&mut self, mut step: F) -> io::Result<()>
    where
        F: FnMut(&mut Self) -> io::Result<()>,
    {
        while !self.should_quit {
            step(self)?;
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the full screen: header, picker, KPI cards, then the main panel.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(6),
            ])
            .split(frame.area());

        let header = Header::new(self.selected_region(), self.view.threshold, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        let picker = RegionPicker::new(&self.options, self.selected, &self.theme);
        frame.render_widget(Paragraph::new(picker.to_line()), chunks[1]);

        self.render_kpis(frame, chunks[2]);

        match self.view_mode {
            ViewMode::Dashboard => chart_view::render_charts(frame, chunks[3], &self.view, &self.theme),
            ViewMode::Table => table_view::render_table_view(frame, chunks[3], &self.view, &self.theme),
        }
    }

    fn render_kpis(&self, frame: &mut Frame, area: Rect) {
        let kpis = &self.view.kpis;
        let sales = self.view.sales_split;
        let qty = self.view.quantity_split;
        let theme = &self.theme;

        let cards = [
            KpiCard::new("Total Sales", &kpis.total_sales, theme),
            KpiCard::new("Sales Before", &kpis.before_sales, theme),
            KpiCard::new("Sales After", &kpis.after_sales, theme)
                .with_value_style(theme.trend_style(sales.before, sales.after)),
            KpiCard::new("Total Quantity", &kpis.total_quantity, theme),
            KpiCard::new("Qty Before", &kpis.before_quantity, theme),
            KpiCard::new("Qty After", &kpis.after_quantity, theme)
                .with_value_style(theme.trend_style(qty.before as f64, qty.after as f64)),
        ];

        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 6); 6])
            .split(area);

        for (card, slot) in cards.iter().zip(slots.iter()) {
            card.render(frame, *slot);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
