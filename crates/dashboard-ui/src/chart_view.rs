//! Daily sales and quantity line charts.
//!
//! Dates are plotted as day offsets from the first date shown.  A vertical
//! marker is drawn at the price-change date whenever it falls inside the
//! visible range.

use chrono::{Duration, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use dashboard_core::dates::format_date;
use dashboard_core::formatting::format_number;
use dashboard_runtime::data::view_model::DashboardView;

use crate::themes::Theme;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Plot-ready data for one line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub origin: NaiveDate,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Two points forming the threshold marker, if it is inside `x_bounds`.
    pub marker: Option<[(f64, f64); 2]>,
}

impl ChartGeometry {
    /// Lay out `series` against `threshold`.  Returns `None` for an empty
    /// series.
    pub fn build(series: &[(NaiveDate, f64)], threshold: NaiveDate) -> Option<Self> {
        let first = series.first()?.0;
        let last = series.last()?.0;
        let origin = first;

        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|(date, value)| (day_offset(origin, *date), *value))
            .collect();

        let x_max = day_offset(origin, last).max(1.0);
        let y_max = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let tx = day_offset(origin, threshold);
        let marker = (0.0..=x_max)
            .contains(&tx)
            .then_some([(tx, 0.0), (tx, y_max)]);

        Some(Self {
            origin,
            points,
            x_bounds: [0.0, x_max],
            y_bounds: [0.0, y_max],
            marker,
        })
    }

    /// Date labels for the start, middle and end of the x axis.
    pub fn x_labels(&self) -> Vec<String> {
        let span = self.x_bounds[1] as i64;
        [0, span / 2, span]
            .iter()
            .map(|d| format_date(self.origin + Duration::days(*d)))
            .collect()
    }

    /// Value labels for zero, half and the top of the y axis.
    pub fn y_labels(&self) -> Vec<String> {
        let top = self.y_bounds[1];
        [0.0, top / 2.0, top]
            .iter()
            .map(|v| format_number(*v, 0))
            .collect()
    }
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Sales chart on top, quantity chart below.
pub fn render_charts(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let quantity: Vec<(NaiveDate, f64)> = view
        .quantity_series
        .iter()
        .map(|(d, q)| (*d, *q as f64))
        .collect();

    render_line_chart(
        frame,
        chunks[0],
        "Daily Sales ($)",
        &view.sales_series,
        view.threshold,
        theme.chart_sales,
        theme,
    );
    render_line_chart(
        frame,
        chunks[1],
        "Daily Quantity",
        &quantity,
        view.threshold,
        theme.chart_quantity,
        theme,
    );
}

/// One bordered line chart, or a placeholder when `series` is empty.
pub fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &[(NaiveDate, f64)],
    threshold: NaiveDate,
    line_style: Style,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));

    let Some(geometry) = ChartGeometry::build(series, threshold) else {
        render_no_data(frame, area, block, theme);
        return;
    };

    let mut datasets = vec![Dataset::default()
        .name(title.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(line_style)
        .data(&geometry.points)];

    let marker_points = geometry.marker;
    if let Some(marker) = marker_points.as_ref() {
        datasets.push(
            Dataset::default()
                .name(format!("Price change {}", format_date(threshold)))
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(theme.threshold_marker)
                .data(marker),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds(geometry.x_bounds)
                .labels(geometry.x_labels()),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds(geometry.y_bounds)
                .labels(geometry.y_labels()),
        );

    frame.render_widget(chart, area);
}

fn render_no_data(frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales for this region", theme.warning)),
    ];
    frame.render_widget(Paragraph::new(Text::from(text)).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
