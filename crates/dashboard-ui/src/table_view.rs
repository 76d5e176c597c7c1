//! Daily aggregate table for the sales dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per date plus
//! a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::dates::format_date;
use dashboard_core::formatting::{format_currency, format_quantity};
use dashboard_core::partition::{PartitionRule, Period};
use dashboard_runtime::data::view_model::DashboardView;

use crate::themes::Theme;

/// Display strings for one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowData {
    pub date: String,
    pub period: &'static str,
    pub sales: String,
    pub quantity: String,
}

/// Build the table rows from a view, labelling each date's period.
pub fn build_rows(view: &DashboardView) -> Vec<TableRowData> {
    let rule = PartitionRule::new(view.threshold);
    view.daily
        .iter()
        .map(|day| TableRowData {
            date: format_date(day.date),
            period: match rule.period_of(day.date) {
                Period::Before => "before",
                Period::After => "after",
            },
            sales: format_currency(day.total_sales),
            quantity: format_quantity(day.total_quantity),
        })
        .collect()
}

/// Render the daily table for `view` into `area`.
pub fn render_table_view(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    if view.is_empty() {
        render_no_data(frame, area, theme);
        return;
    }

    let header_cells = ["Date", "Period", "Sales", "Quantity"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = build_rows(view)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.date),
                Cell::from(row.period),
                Cell::from(row.sales),
                Cell::from(row.quantity),
            ])
            .style(style)
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format!("{} days", view.daily.len())),
            Cell::from(view.total_sales_exact.clone()),
            Cell::from(view.kpis.total_quantity.clone()),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Daily Sales · {} ", view.region)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when the selected region has no sales.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales for this region", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'a' to show all regions", theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
