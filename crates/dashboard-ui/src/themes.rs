use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    let bg = value
        .and_then(|v| v.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok());
    match bg {
        Some(n) if n <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Dark,
    }
}

/// Every style used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── KPI cards ────────────────────────────────────────────────────────────
    pub kpi_border: Style,
    pub kpi_title: Style,
    pub kpi_value: Style,
    /// After-period value that went up relative to before.
    pub trend_up: Style,
    /// After-period value that went down relative to before.
    pub trend_down: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_sales: Style,
    pub chart_quantity: Style,
    pub threshold_marker: Style,
    pub axis: Style,

    // ── Region picker ────────────────────────────────────────────────────────
    pub region_selected: Style,
    pub region_idle: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            kpi_border: Style::default().fg(Color::DarkGray),
            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),

            chart_sales: Style::default().fg(Color::Magenta),
            chart_quantity: Style::default().fg(Color::Cyan),
            threshold_marker: Style::default().fg(Color::Yellow),
            axis: Style::default().fg(Color::Gray),

            region_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            region_idle: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
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
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            kpi_border: Style::default().fg(Color::Gray),
            kpi_title: Style::default().fg(Color::DarkGray),
            kpi_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),

            chart_sales: Style::default().fg(Color::Magenta),
            chart_quantity: Style::default().fg(Color::Blue),
            threshold_marker: Style::default().fg(Color::Red),
            axis: Style::default().fg(Color::DarkGray),

            region_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            region_idle: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            kpi_border: Style::default().fg(Color::DarkGray),
            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default().fg(Color::White),
            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),

            chart_sales: Style::default().fg(Color::Magenta),
            chart_quantity: Style::default().fg(Color::Cyan),
            threshold_marker: Style::default().fg(Color::Yellow),
            axis: Style::default().fg(Color::White),

            region_selected: Style::default().fg(Color::Black).bg(Color::White),
            region_idle: Style::default().fg(Color::Gray),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour for an after-period figure compared with its before-period
    /// counterpart.  Unchanged values use the plain KPI style.
    pub fn trend_style(&self, before: f64, after: f64) -> Style {
        if after > before {
            self.trend_up
        } else if after < before {
            self.trend_down
        } else {
            self.kpi_value
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
