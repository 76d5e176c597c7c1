use chrono::NaiveDate;
use ratatui::text::{Line, Span};

use dashboard_core::dates::format_date;

use crate::themes::Theme;

pub const TITLE: &str = "PINK MORSEL SALES DASHBOARD";

/// Dashboard header, rendered as four lines:
///
/// 1. Title.
/// 2. A 60-column `=` separator.
/// 3. `[ region | price change YYYY-MM-DD ]`.
/// 4. An empty line.
pub struct Header<'a> {
    pub region: &'a str,
    pub threshold: NaiveDate,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(region: &'a str, threshold: NaiveDate, theme: &'a Theme) -> Self {
        Self {
            region,
            threshold,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled("◆ ", self.theme.header_accent),
                Span::styled(TITLE, self.theme.header),
                Span::styled(" ◆", self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.region.to_lowercase(), self.theme.value),
                Span::styled(" | price change ", self.theme.label),
                Span::styled(format_date(self.threshold), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}
